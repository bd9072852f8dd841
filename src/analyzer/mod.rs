/* Copyright (C) 2022 Antmicro
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     https://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::collections::HashMap;

pub mod device_data;
pub mod tree;
pub mod join;
pub mod longest_path;
pub mod print;
#[cfg(test)]
mod tests;

pub type NodeIdx = u32;

/// What a node in the wirelength graph represents: either a net's
/// belPin-rooted source, an interior node with no detailed segment
/// retained (join edges don't keep one), or a leaf segment (site pin or
/// bel pin).
#[derive(Clone, Copy)]
pub enum Segment {
    BelPin { site: u32, bel: u32, pin: u32 },
    SitePin { site: u32, pin: u32 },
}

pub struct AnalyzerNode {
    pub net_index: Option<u32>,
    pub segment: Segment,
}

/// Forest-then-DAG used by the wirelength analyzer. Trees are built per-net
/// by `tree::add_all_nets_to_graph`; `join::join_nets` adds zero-length
/// edges through combinatorial cells, turning the forest into a DAG.
#[derive(Default)]
pub struct AnalyzerGraph {
    pub nodes: Vec<AnalyzerNode>,
    pub out_edges: Vec<Vec<(NodeIdx, u32)>>,
    pub in_edges: Vec<Vec<(NodeIdx, u32)>>,
    pub roots: Vec<NodeIdx>,
    pub leaves: Vec<NodeIdx>,
}

impl AnalyzerGraph {
    pub fn add_node(&mut self, node: AnalyzerNode) -> NodeIdx {
        let id = self.nodes.len() as NodeIdx;
        self.nodes.push(node);
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        id
    }

    pub fn add_edge(&mut self, from: NodeIdx, to: NodeIdx, wirelength: u32) {
        self.out_edges[from as usize].push((to, wirelength));
        self.in_edges[to as usize].push((from, wirelength));
    }
}

/// One placed cell: `(site, bel)` keys the placement exactly the way
/// `(c.site, c.bel)` does in the reference implementation.
#[derive(Clone, Copy)]
pub struct Placement {
    pub cell_type: u32,
    pub cell_name: u32,
}

pub struct PlacementMap(pub HashMap<(u32, u32), Placement>);

impl PlacementMap {
    pub fn build(netlist: &crate::ic_loader::phys_netlist::Root<'_>) -> Result<Self, crate::error::AnalyzerError> {
        let mut map = HashMap::new();
        for p in netlist.get_placements()?.iter() {
            map.insert((p.get_site(), p.get_bel()), Placement {
                cell_type: p.get_type(),
                cell_name: p.get_cell_name(),
            });
        }
        Ok(Self(map))
    }
}

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

use std::collections::{HashMap, VecDeque};

pub mod builder;
pub mod prepare;
pub mod route;
pub mod write;
#[cfg(test)]
mod tests;

/// A routing-graph node. Device nodes are already a dense index space
/// (`0..device.get_nodes().len()`), so a graph node id is just the index of
/// the device node it represents; no separate interning step is needed.
pub type NodeId = u32;

/// A single PIP, recorded once per distinct `(wire0, wire1, forward)` triple
/// and referenced by index from every edge that uses it. Device files name
/// the same PIP on thousands of tiles; deduplicating the wire-name pair
/// keeps the per-edge cost down to two small integers.
#[derive(Clone, Copy)]
pub struct PipData {
    pub wire0: u32,
    pub wire1: u32,
    pub forward: bool,
}

/// Edge attribute: which tile this PIP instance sits in, plus the index into
/// the shared `pip_data` table for the wire pair it connects.
#[derive(Clone, Copy)]
pub struct EdgeAttr {
    pub tile: u32,
    pub pip_data_index: u32,
}

struct Edge {
    to: NodeId,
    attr: EdgeAttr,
}

/// Per-node bookkeeping that accumulates during net preparation and routing.
/// Kept in a side table rather than inline in the node-id space because only
/// a small fraction of nodes (sink site pins, nodes actually used by a net)
/// ever need it — the Python reference makes the same lazy-dict tradeoff
/// with its `CustomNodeAttribute`.
#[derive(Default)]
pub struct NodeAttrs {
    /// Present if this node is a sink site pin: `(site, pin)` string-table indices.
    pub sink_pin: Option<(u32, u32)>,
    /// Net name -> set of next nodes used by that net's routing tree rooted here.
    pub next_nodes: HashMap<u32, Vec<NodeId>>,
}

/// A compact, array-backed representation of the device's unweighted routing
/// graph: one row of outgoing/incoming edges per node, plus the dense PIP
/// table every edge points into. Nodes and edges are only ever removed
/// (never added after `builder::build` finishes, except for the sanctioned
/// hide/restore dance during multi-sink routing in `route`), so plain `Vec`s
/// with tombstones outperform a hashmap-of-hashmaps graph at this scale.
pub struct RoutingGraph {
    present: Vec<bool>,
    out_edges: Vec<Vec<Edge>>,
    in_edges: Vec<Vec<Edge>>,
    pub pip_data: Vec<PipData>,
    pub attrs: HashMap<NodeId, NodeAttrs>,

    /// Dropped once net preparation is done (mirrors the Python reference's
    /// `del self.G.tile2wire2node` etc. at the end of `parse()`).
    ///
    /// Device and netlist files each intern their own strings at unrelated
    /// numeric indices, so every key here that has to be resolved from BOTH
    /// a device-native index (building this table) and a netlist-native
    /// index (looking a site/pin/tile/wire up while preparing nets) has to
    /// be the string content itself, not either file's raw index. Only
    /// `tile_type`/`site_type` indices stay as device-native `u32`: they are
    /// produced by `builder::build` and consumed by `node_from_site_pin`
    /// without ever being read off a netlist.
    pub tile2wire2node: Option<HashMap<String, HashMap<String, NodeId>>>,
    pub site2tile_and_types: Option<HashMap<String, (String, u32, u32)>>,
    pub tiletype2sitetype_pinname2wire: Option<HashMap<u32, HashMap<(u32, String), String>>>,
}

impl RoutingGraph {
    pub fn with_capacity(num_nodes: usize) -> Self {
        Self {
            present: vec![false; num_nodes],
            out_edges: (0..num_nodes).map(|_| Vec::new()).collect(),
            in_edges: (0..num_nodes).map(|_| Vec::new()).collect(),
            pip_data: Vec::new(),
            attrs: HashMap::new(),
            tile2wire2node: Some(HashMap::new()),
            site2tile_and_types: Some(HashMap::new()),
            tiletype2sitetype_pinname2wire: Some(HashMap::new()),
        }
    }

    pub fn add_node(&mut self, n: NodeId) {
        self.present[n as usize] = true;
    }

    pub fn contains(&self, n: NodeId) -> bool {
        self.present.get(n as usize).copied().unwrap_or(false)
    }

    pub fn num_nodes(&self) -> usize {
        self.present.iter().filter(|p| **p).count()
    }

    pub fn num_edges(&self) -> usize {
        self.out_edges.iter().map(|v| v.len()).sum()
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId, attr: EdgeAttr) {
        self.out_edges[from as usize].push(Edge { to, attr });
        self.in_edges[to as usize].push(Edge { to: from, attr });
    }

    pub fn out_edges(&self, n: NodeId) -> impl Iterator<Item = (NodeId, EdgeAttr)> + '_ {
        self.out_edges[n as usize].iter().map(|e| (e.to, e.attr))
    }

    pub fn in_edges(&self, n: NodeId) -> impl Iterator<Item = (NodeId, EdgeAttr)> + '_ {
        self.in_edges[n as usize].iter().map(|e| (e.to, e.attr))
    }

    /// Look up the attribute of the edge `from -> to`, if it still exists.
    pub fn edge_attr(&self, from: NodeId, to: NodeId) -> Option<EdgeAttr> {
        self.out_edges[from as usize]
            .iter()
            .find(|e| e.to == to)
            .map(|e| e.attr)
    }

    /// Remove a node entirely: mark it absent and drop all edges touching
    /// it. Used when a sink has no driving net, or when a pre-routed net's
    /// occupied resources are blocked off from the unrouted pool.
    pub fn remove_node(&mut self, n: NodeId) {
        self.present[n as usize] = false;
        let outs = std::mem::take(&mut self.out_edges[n as usize]);
        for e in &outs {
            self.in_edges[e.to as usize].retain(|ie| ie.to != n);
        }
        let ins = std::mem::take(&mut self.in_edges[n as usize]);
        for e in &ins {
            self.out_edges[e.to as usize].retain(|oe| oe.to != n);
        }
    }

    /// Remove every outgoing edge of `n`, returning what was removed so a
    /// caller (routing's multi-sink discipline) can restore it later.
    pub fn take_out_edges(&mut self, n: NodeId) -> Vec<(NodeId, EdgeAttr)> {
        let removed: Vec<(NodeId, EdgeAttr)> = std::mem::take(&mut self.out_edges[n as usize])
            .into_iter()
            .map(|e| (e.to, e.attr))
            .collect();
        for &(to, _) in &removed {
            self.in_edges[to as usize].retain(|ie| ie.to != n);
        }
        removed
    }

    /// Remove every incoming edge of `n` except the one driven by `keep_from`,
    /// returning the removed `(from, to=n, attr)` triples so they can be
    /// restored once the current net finishes routing.
    pub fn take_in_edges_except(&mut self, n: NodeId, keep_from: NodeId) -> Vec<(NodeId, NodeId, EdgeAttr)> {
        let (kept, removed): (Vec<_>, Vec<_>) = std::mem::take(&mut self.in_edges[n as usize])
            .into_iter()
            .partition(|e| e.to == keep_from);
        self.in_edges[n as usize] = kept;
        let removed: Vec<(NodeId, NodeId, EdgeAttr)> = removed
            .into_iter()
            .map(|e| (e.to, n, e.attr))
            .collect();
        for &(from, _, _) in &removed {
            self.out_edges[from as usize].retain(|oe| oe.to != n);
        }
        removed
    }

    pub fn restore_edge(&mut self, from: NodeId, to: NodeId, attr: EdgeAttr) {
        self.add_edge(from, to, attr);
    }

    /// Unweighted BFS shortest path from `src` to `dst`, following only
    /// edges that currently exist. Returns the node sequence including both
    /// endpoints, or `None` if `dst` is unreachable.
    pub fn shortest_path(&self, src: NodeId, dst: NodeId) -> Option<Vec<NodeId>> {
        if src == dst {
            return Some(vec![src]);
        }
        let mut visited = vec![false; self.present.len()];
        let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
        let mut queue = VecDeque::new();
        visited[src as usize] = true;
        queue.push_back(src);
        while let Some(u) = queue.pop_front() {
            for (v, _) in self.out_edges(u) {
                if visited[v as usize] {
                    continue;
                }
                visited[v as usize] = true;
                parent.insert(v, u);
                if v == dst {
                    let mut path = vec![dst];
                    let mut cur = dst;
                    while cur != src {
                        cur = parent[&cur];
                        path.push(cur);
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(v);
            }
        }
        None
    }
}

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
use std::time::Instant;

use crate::ic_loader::archdef::Root as Device;
use crate::error::RouterError;

use super::{EdgeAttr, NodeId, PipData, RoutingGraph};

/// The routing graph is only ever built for one clock region at a time; the
/// full device graph needs on the order of 50GB of resident memory, far
/// beyond what a single unweighted-BFS router needs to demonstrate
/// correctness on a benchmark net. Clock Region X2Y1 is the region the
/// benchmark harness this tool targets always uses.
pub struct RegionBounds {
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl Default for RegionBounds {
    fn default() -> Self {
        Self { min_x: 36, max_x: 56, min_y: 60, max_y: 119 }
    }
}

/// Parse a tile name of the form `PREFIX_X<digits>Y<digits>`, taking the
/// rightmost such suffix (mirrors the greedy-then-backtrack behavior of the
/// `[A-Z0-9_]+_X(\d+)Y(\d+)` pattern this is ported from, without pulling in
/// a regex dependency for a single anchored pattern).
fn parse_tile_xy(name: &str) -> Option<(u32, u32)> {
    let bytes = name.as_bytes();
    for i in (0..bytes.len().saturating_sub(1)).rev() {
        if bytes[i] == b'_' && bytes[i + 1] == b'X' {
            if let Some(xy) = try_parse_xy(&name[i + 2..]) {
                return Some(xy);
            }
        }
    }
    None
}

fn try_parse_xy(rest: &str) -> Option<(u32, u32)> {
    let y_pos = rest.find('Y')?;
    let (x_part, y_and_rest) = rest.split_at(y_pos);
    if x_part.is_empty() || !x_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let y_part: String = y_and_rest[1..].chars().take_while(|c| c.is_ascii_digit()).collect();
    if y_part.is_empty() {
        return None;
    }
    Some((x_part.parse().ok()?, y_part.parse().ok()?))
}

/// Build the routing graph for `bounds` from a parsed DeviceResources file.
/// Grounded on `NxRoutingGraph.build()`: graph nodes are device nodes whose
/// base wire sits in an in-bounds tile, graph edges are PIPs whose two wires
/// both resolve to an in-bounds node.
pub fn build(device: &Device<'_>, bounds: &RegionBounds) -> Result<RoutingGraph, RouterError> {
    println!("Building routing graph...");
    let strs = device.get_str_list()?;
    let str_at = |i: u32| strs.get(i).unwrap();

    let t0 = Instant::now();
    let tile_list = device.get_tile_list()?;
    let mut in_bounds_tile_names: std::collections::HashSet<u32> = std::collections::HashSet::new();
    let mut tiles = Vec::new();
    for tile in tile_list.iter() {
        let name = tile.get_name();
        let (x, y) = match parse_tile_xy(str_at(name)) {
            Some(xy) => xy,
            None => continue,
        };
        if x < bounds.min_x || x > bounds.max_x || y < bounds.min_y || y > bounds.max_y {
            continue;
        }
        in_bounds_tile_names.insert(name);
        tiles.push(tile);
    }

    let wires = device.get_wires()?;
    let nodes = device.get_nodes()?;
    let mut graph = RoutingGraph::with_capacity(nodes.len() as usize);
    let mut tile2wire2node: HashMap<String, HashMap<String, NodeId>> = HashMap::new();

    for (node_idx, node) in nodes.iter().enumerate() {
        let node_idx = node_idx as NodeId;
        let node_wires = node.get_wires()?;
        if node_wires.len() == 0 {
            continue;
        }
        let base_wire = wires.get(node_wires.get(0));
        if !in_bounds_tile_names.contains(&base_wire.get_tile()) {
            continue;
        }
        graph.add_node(node_idx);
        for wire_idx in node_wires.iter() {
            let wire = wires.get(wire_idx);
            tile2wire2node
                .entry(str_at(wire.get_tile()).to_string())
                .or_default()
                .insert(str_at(wire.get_wire()).to_string(), node_idx);
        }
    }
    println!("\tBuild {} graph nodes: {:.1}s", graph.num_nodes(), t0.elapsed().as_secs_f64());

    let t1 = Instant::now();
    let tile_type_list = device.get_tile_type_list()?;
    let mut pip_data_index: HashMap<(u32, u32, bool), u32> = HashMap::new();
    for tile in &tiles {
        let tile_name_str = str_at(tile.get_name());
        let wire2node = match tile2wire2node.get(tile_name_str) {
            Some(m) => m,
            None => continue,
        };
        let is_cle_or_rclk = tile_name_str.starts_with("CLE") || tile_name_str.starts_with("RCLK");
        let tile_type = tile_type_list.get(tile.get_type());
        let tile_wires = tile_type.get_wires()?;
        for pip in tile_type.get_pips()?.iter() {
            let is_conventional = matches!(
                pip.which()?,
                crate::ic_loader::DeviceResources_capnp::device::pip::Which::Conventional(_)
            );
            if is_cle_or_rclk && !is_conventional {
                continue;
            }
            let wire0_name = tile_wires.get(pip.get_wire0());
            let node0 = match wire2node.get(str_at(wire0_name)) {
                Some(n) => *n,
                None => continue,
            };
            let wire1_name = tile_wires.get(pip.get_wire1());
            let node1 = match wire2node.get(str_at(wire1_name)) {
                Some(n) => *n,
                None => continue,
            };

            let idx = *pip_data_index
                .entry((wire0_name, wire1_name, true))
                .or_insert_with(|| {
                    graph.pip_data.push(PipData { wire0: wire0_name, wire1: wire1_name, forward: true });
                    (graph.pip_data.len() - 1) as u32
                });
            graph.add_edge(node0, node1, EdgeAttr { tile: tile.get_name(), pip_data_index: idx });

            if !pip.get_directional() {
                let idx = *pip_data_index
                    .entry((wire0_name, wire1_name, false))
                    .or_insert_with(|| {
                        graph.pip_data.push(PipData { wire0: wire0_name, wire1: wire1_name, forward: false });
                        (graph.pip_data.len() - 1) as u32
                    });
                graph.add_edge(node1, node0, EdgeAttr { tile: tile.get_name(), pip_data_index: idx });
            }
        }
    }
    println!("\tBuild {} graph edges: {:.1}s", graph.num_edges(), t1.elapsed().as_secs_f64());

    let t2 = Instant::now();
    let site_type_list = device.get_site_type_list()?;
    let mut site_type_pin_names: HashMap<u32, Vec<String>> = HashMap::new();
    for (st_idx, site_type) in site_type_list.iter().enumerate() {
        let names = site_type.get_pins()?.iter().map(|p| str_at(p.get_name()).to_string()).collect();
        site_type_pin_names.insert(st_idx as u32, names);
    }

    /* Pin names have to match names read off a netlist's own string table,
     * so both the key and the value here are resolved to string content. */
    let mut tiletype2sitetype_pinname2wire: HashMap<u32, HashMap<(u32, String), String>> = HashMap::new();
    for (tt_idx, tile_type) in tile_type_list.iter().enumerate() {
        for (st_idx, stitt) in tile_type.get_site_types()?.iter().enumerate() {
            let pin_names = &site_type_pin_names[&stitt.get_primary_type()];
            for (pin_index, wire_name) in stitt.get_primary_pins_to_tile_wires()?.iter().enumerate() {
                let pin_name = pin_names[pin_index].clone();
                tiletype2sitetype_pinname2wire
                    .entry(tt_idx as u32)
                    .or_default()
                    .insert((st_idx as u32, pin_name), str_at(wire_name).to_string());
            }
        }
    }

    let mut site2tile_and_types: HashMap<String, (String, u32, u32)> = HashMap::new();
    for tile in &tiles {
        let tile_name = str_at(tile.get_name()).to_string();
        for site in tile.get_sites()?.iter() {
            site2tile_and_types.insert(
                str_at(site.get_name()).to_string(),
                (tile_name.clone(), tile.get_type(), site.get_type()),
            );
        }
    }
    println!("\tBuild lookups: {:.1}s", t2.elapsed().as_secs_f64());

    graph.tile2wire2node = Some(tile2wire2node);
    graph.site2tile_and_types = Some(site2tile_and_types);
    graph.tiletype2sitetype_pinname2wire = Some(tiletype2sitetype_pinname2wire);
    Ok(graph)
}

/// Resolve a site/pin pair to the graph node it connects to, or `None` if
/// the site is out of the built region. `site` and `pin` are string content,
/// not a raw string-table index: the netlist that names them interns its
/// strings independently of the device this graph was built from, so the
/// caller must resolve its own indices to names before calling this.
pub fn node_from_site_pin(graph: &RoutingGraph, site: &str, pin: &str) -> Option<NodeId> {
    let (tile, tile_type, site_type) = graph.site2tile_and_types.as_ref().unwrap().get(site)?.clone();
    let wire = graph
        .tiletype2sitetype_pinname2wire
        .as_ref()
        .unwrap()
        .get(&tile_type)?
        .get(&(site_type, pin.to_string()))?;
    graph.tile2wire2node.as_ref().unwrap().get(&tile)?.get(wire).copied()
}

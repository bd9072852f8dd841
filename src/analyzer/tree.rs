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

use crate::error::AnalyzerError;
use crate::ic_loader::phys_netlist::{Root as Netlist, RouteBranchReader};
use crate::ic_loader::PhysicalNetlist_capnp::route_branch;
use crate::strtab::StringTable;

use super::device_data;
use super::{AnalyzerGraph, AnalyzerNode, Segment};

/// Wirelength contributed by a single routeSegment: zero for anything that
/// is not a PIP, the device-data-driven value for a PIP inside an INT tile,
/// and zero for a PIP anywhere else (switchbox-external PIPs never appear
/// on the timing-critical backbone this tool estimates).
pub fn segment_to_wirelength(
    seg: &route_branch::route_segment::Reader,
    strs: &StringTable,
) -> Result<u32, AnalyzerError> {
    if let route_branch::route_segment::Which::Pip(pip) = seg.which()? {
        let pip = pip?;
        let tile_name = strs.get(pip.get_tile());
        let wire1_name = strs.get(pip.get_wire1());
        if tile_name.starts_with("INT_") {
            return device_data::pip_wirelength(wire1_name)
                .ok_or_else(|| AnalyzerError::UnknownPipPattern(wire1_name.to_string()));
        }
        let root = device_data::tile_root_name(tile_name).unwrap_or(tile_name);
        if !device_data::TILE_TYPES.contains(&root) {
            return Err(AnalyzerError::UnknownTile {
                tile: tile_name.to_string(),
                wire0: strs.get(pip.get_wire0()).to_string(),
                wire1: wire1_name.to_string(),
            });
        }
        return Ok(0);
    }
    Ok(0)
}

/// Depth-first walk of one net's routing tree, accumulating wirelength
/// along each path from `source` to every leaf (a site pin or bel pin with
/// no further branches). Grounded on `add_net_to_graph`.
fn add_net_to_graph(
    graph: &mut AnalyzerGraph,
    strs: &StringTable,
    source: super::NodeIdx,
    route_branch: RouteBranchReader<'_>,
) -> Result<(), AnalyzerError> {
    let mut stack: Vec<(RouteBranchReader<'_>, u32)> = route_branch
        .get_branches()?
        .iter()
        .map(|b| (b, 0))
        .collect();

    while let Some((rb, mut wirelength)) = stack.pop() {
        let seg = rb.get_route_segment();
        wirelength += segment_to_wirelength(&seg, strs)?;
        let branches = rb.get_branches()?;
        if branches.len() == 0 {
            let segment = match seg.which()? {
                route_branch::route_segment::Which::SitePin(sp) => {
                    let sp = sp?;
                    Segment::SitePin { site: sp.get_site(), pin: sp.get_pin() }
                }
                route_branch::route_segment::Which::BelPin(bp) => {
                    let bp = bp?;
                    Segment::BelPin { site: bp.get_site(), bel: bp.get_bel(), pin: bp.get_pin() }
                }
                _ => return Err(AnalyzerError::MalformedNetlist(
                    "leaf routeSegment is not a sitePin or belPin".into(),
                )),
            };
            let is_bel_pin = matches!(segment, Segment::BelPin { .. });
            let sink = graph.add_node(AnalyzerNode { net_index: None, segment });
            graph.add_edge(source, sink, wirelength);
            if is_bel_pin {
                graph.leaves.push(sink);
            }
        } else {
            for b in branches.iter() {
                stack.push((b, wirelength));
            }
        }
    }
    Ok(())
}

/// Add every physical signal net's routing tree to the graph, skipping
/// global (clock/reset) nets and nets with no source or no fanout. Returns
/// counts of stubbed/multi-source nets seen, so the caller can emit the
/// reference implementation's summary warnings.
pub fn add_all_nets_to_graph(
    netlist: &Netlist<'_>,
    strs: &StringTable,
) -> Result<(AnalyzerGraph, usize, usize), AnalyzerError> {
    let mut graph = AnalyzerGraph::default();
    let mut nets_with_stubs = 0usize;
    let mut nets_with_multiple_sources = 0usize;

    for (net_index, net) in netlist.get_phys_nets()?.iter().enumerate() {
        let net_index = net_index as u32;
        let this_net = strs.get(net.get_name());
        use crate::ic_loader::PhysicalNetlist_capnp::phys_net::NetType;
        match net.get_type()? {
            NetType::Signal => {}
            NetType::Gnd | NetType::Vcc => continue,
        }
        if this_net == "GLOBAL_USEDNET" {
            continue;
        }
        let stubs = net.get_stubs()?;
        let sources = net.get_sources()?;
        if stubs.len() != 0 {
            if sources.len() == 0 {
                continue;
            }
            nets_with_stubs += 1;
        }
        if sources.len() > 1 {
            nets_with_multiple_sources += 1;
        }
        for branch in sources.iter() {
            let seg = branch.get_route_segment();
            let bp = match seg.which()? {
                route_branch::route_segment::Which::BelPin(bp) => bp?,
                other => {
                    return Err(AnalyzerError::MalformedNetlist(format!(
                        "root routeSegment on net {:?} is not a belPin ({:?})",
                        this_net,
                        std::mem::discriminant(&other)
                    )))
                }
            };
            if branch.get_branches()?.len() == 0 {
                continue;
            }
            if device_data::GLOBAL_NET_DRIVERS.contains(&strs.get(bp.get_bel())) {
                continue;
            }
            let source = graph.add_node(AnalyzerNode {
                net_index: Some(net_index),
                segment: Segment::BelPin { site: bp.get_site(), bel: bp.get_bel(), pin: bp.get_pin() },
            });
            graph.roots.push(source);
            add_net_to_graph(&mut graph, strs, source, branch)?;
        }
    }
    Ok((graph, nets_with_stubs, nets_with_multiple_sources))
}

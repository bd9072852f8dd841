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

use crate::error::RouterError;
use crate::ic_loader::phys_netlist::{Root as Netlist, RouteBranchReader};
use crate::ic_loader::PhysicalNetlist_capnp::{phys_net, route_branch, site_pin};
use crate::strtab::StringTable;

use super::builder::node_from_site_pin;
use super::{NodeId, RoutingGraph};

/// Everything the router needs to know about one signal net before routing:
/// its candidate source nodes (keyed by site/pin for diagnostics) and the
/// sink nodes still needing a path.
pub struct NetToRoute {
    pub source_pin2node: HashMap<(u32, u32), NodeId>,
    pub sink_nodes: Vec<NodeId>,
}

fn extract_site_pins<'a>(branches: impl Iterator<Item = RouteBranchReader<'a>>) -> Result<Vec<site_pin::Reader<'a>>, capnp::Error> {
    let mut out = Vec::new();
    let mut queue: Vec<RouteBranchReader<'a>> = branches.collect();
    while let Some(rb) = queue.pop() {
        let seg = rb.get_route_segment();
        if let route_branch::route_segment::Which::SitePin(sp) = seg.which()? {
            out.push(sp?);
        }
        queue.extend(rb.get_branches()?.iter());
    }
    Ok(out)
}

/// Walk a pre-routed (or unroutable) net's tree and block off every
/// resource it occupies, so the unrouted pool never overlaps it. Grounded
/// on the "else" branch of `NxRouter.parse()`.
///
/// `pip.get_tile()`/`get_wire0()`/`get_wire1()` are indices into the
/// netlist's own string table, not the device's, so they have to be
/// resolved to names via `netlist_strs` before touching `tile2wire2node`
/// (which is keyed by device-resolved names, see `builder::build`).
fn block_used_resources<'a>(
    graph: &mut RoutingGraph,
    netlist_strs: &StringTable,
    sources: impl Iterator<Item = RouteBranchReader<'a>>,
) -> Result<(), RouterError> {
    let mut queue: Vec<_> = sources.collect();
    while let Some(rb) = queue.pop() {
        let seg = rb.get_route_segment();
        if let route_branch::route_segment::Which::Pip(pip) = seg.which()? {
            let pip = pip?;
            let tile = netlist_strs.get(pip.get_tile());
            let driven_wire_idx = if pip.get_forward() { pip.get_wire1() } else { pip.get_wire0() };
            let driven_wire = netlist_strs.get(driven_wire_idx);
            let blocked = graph
                .tile2wire2node
                .as_ref()
                .unwrap()
                .get(tile)
                .and_then(|wire2node| wire2node.get(driven_wire))
                .copied();
            if let Some(blocked) = blocked {
                graph.remove_node(blocked);
            }
        }
        queue.extend(rb.get_branches()?.iter());
    }
    Ok(())
}

/// Parse the unrouted netlist: classify every net as either a signal net
/// with stub pins to route, or an already-resolved net whose resources must
/// be blocked off. Drops the graph's site-pin/tile-wire lookup tables once
/// done, matching the reference's `del self.G.tile2wire2node` et al.
///
/// `netlist_strs` resolves the netlist's own site/pin/tile/wire indices to
/// names before any lookup into `graph`'s device-built tables; see
/// `node_from_site_pin` and `block_used_resources`.
pub fn prepare(
    graph: &mut RoutingGraph,
    netlist: &Netlist<'_>,
    netlist_strs: &StringTable,
) -> Result<Vec<(u32, NetToRoute)>, RouterError> {
    let t0 = Instant::now();
    let mut net2pin2node = Vec::new();

    for net in netlist.get_phys_nets()?.iter() {
        if net.get_stub_nodes()?.len() != 0 {
            return Err(RouterError::MalformedNetlist(
                "net has pre-existing stub nodes; expected fully-stubbed or fully-routed input".into(),
            ));
        }
        let is_signal = matches!(net.get_type()?, phys_net::NetType::Signal);
        let stubs = net.get_stubs()?;
        if is_signal && stubs.len() > 0 {
            let sink_pins = extract_site_pins(stubs.iter())?;
            if sink_pins.is_empty() {
                continue;
            }

            let mut source_pin2node = HashMap::new();
            for sp in extract_site_pins(net.get_sources()?.iter())? {
                let (site, pin) = (sp.get_site(), sp.get_pin());
                let (site_name, pin_name) = (netlist_strs.get(site), netlist_strs.get(pin));
                if let Some(n) = node_from_site_pin(graph, site_name, pin_name) {
                    source_pin2node.insert((site, pin), n);
                }
            }

            let mut sink_nodes = Vec::new();
            for sp in sink_pins {
                let (site, pin) = (sp.get_site(), sp.get_pin());
                let (site_name, pin_name) = (netlist_strs.get(site), netlist_strs.get(pin));
                let sink_node = match node_from_site_pin(graph, site_name, pin_name) {
                    Some(n) => n,
                    None => continue,
                };
                if source_pin2node.is_empty() {
                    /* unrouteable: no source on this net, block the sink too */
                    graph.remove_node(sink_node);
                } else {
                    sink_nodes.push(sink_node);
                    let attrs = graph.attrs.entry(sink_node).or_default();
                    if attrs.sink_pin.is_some() {
                        return Err(RouterError::MalformedNetlist(format!(
                            "node {} claimed as a sink pin by more than one net",
                            sink_node
                        )));
                    }
                    attrs.sink_pin = Some((site, pin));
                    graph.take_out_edges(sink_node);
                }
            }

            if sink_nodes.is_empty() {
                continue;
            }
            net2pin2node.push((net.get_name(), NetToRoute { source_pin2node, sink_nodes }));
        } else {
            block_used_resources(graph, netlist_strs, net.get_sources()?.iter())?;
        }
    }

    graph.tile2wire2node = None;
    graph.site2tile_and_types = None;
    graph.tiletype2sitetype_pinname2wire = None;
    println!("\tPrepare site pins: {:.1}s", t0.elapsed().as_secs_f64());
    Ok(net2pin2node)
}

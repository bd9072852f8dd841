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

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Instant;

use crate::error::RouterError;
use crate::ic_loader::phys_netlist::{self, Root as Netlist};
use crate::ic_loader::PhysicalNetlist_capnp::{phys_net, route_branch};
use crate::strtab::StringTable;

use super::prepare::NetToRoute;
use super::{NodeId, RoutingGraph};

/// Rebuild the netlist's string table on write: existing strings keep their
/// index (so unmodified parts of the message stay valid), new tile/wire
/// names pulled in from routing get appended. Mirrors `NxRouter.write()`'s
/// `self.strings` dict.
pub(super) struct NetlistStrings {
    value_to_index: HashMap<String, u32>,
    values: Vec<String>,
}

impl NetlistStrings {
    pub(super) fn from_existing(netlist_strs: &StringTable) -> Self {
        let mut value_to_index = HashMap::new();
        let mut values = Vec::with_capacity(netlist_strs.len());
        for i in 0..netlist_strs.len() as u32 {
            let s = netlist_strs.get(i).to_owned();
            value_to_index.insert(s.clone(), i);
            values.push(s);
        }
        Self { value_to_index, values }
    }

    fn index_of(&mut self, s: &str) -> u32 {
        if let Some(&i) = self.value_to_index.get(s) {
            return i;
        }
        let i = self.values.len() as u32;
        self.values.push(s.to_owned());
        self.value_to_index.insert(s.to_owned(), i);
        i
    }
}

/// Write the routed netlist. Every net that has an entry in `nets` had at
/// least one sink routed; for such nets, every declared source is written
/// back as a `sitePin`-rooted branch, with a chain of PIP children for any
/// source that was actually used, ending at the matching stub's site-pin
/// leaf. Stubs with no routed sink stay in the (possibly shrunk) stub list.
pub fn write(
    graph: &RoutingGraph,
    netlist: Netlist<'_>,
    nets: &[(u32, NetToRoute)],
    device_strs: &StringTable,
    compression_level: u32,
    out_path: &Path,
) -> Result<(), RouterError> {
    println!("Writing design...");
    let t0 = Instant::now();

    let netlist_strs_src = StringTable::new(netlist.get_str_list()?);
    let mut strings = NetlistStrings::from_existing(&netlist_strs_src);

    let net_lookup: HashMap<u32, &NetToRoute> = nets.iter().map(|(n, r)| (*n, r)).collect();

    let mut builder = phys_netlist::make_builder(netlist.clone());
    let mut num_pips = 0usize;

    {
        let root = builder.get_root().map_err(RouterError::Capnp)?;
        let phys_nets = root.get_phys_nets().map_err(RouterError::Capnp)?;
        for net_idx in 0..phys_nets.len() {
            let net = phys_nets.reborrow().get(net_idx);
            let net_name = net.get_name();
            let to_route = match net_lookup.get(&net_name) {
                Some(r) => *r,
                None => continue,
            };

            num_pips += rewrite_net(net, to_route, graph, device_strs, &mut strings)?;
        }
    }

    /* Append every newly-interned string, then swap in the grown table. */
    let new_str_count = strings.values.len();
    {
        let root = builder.get_root().map_err(RouterError::Capnp)?;
        let mut new_list = root.init_str_list(new_str_count as u32);
        for (i, s) in strings.values.iter().enumerate() {
            new_list.set(i as u32, s.as_str().into());
        }
    }

    println!(
        "\tInserting {} PIPs and {} strings: {:.1}s",
        num_pips,
        new_str_count.saturating_sub(netlist_strs_src.len()),
        t0.elapsed().as_secs_f64()
    );

    let t1 = Instant::now();
    phys_netlist::write(out_path, builder, compression_level)
        .map_err(RouterError::WriteNetlist)?;
    println!("\tWrite PhysicalNetlist: {:.1}s", t1.elapsed().as_secs_f64());
    Ok(())
}

/// Rewrite one net's `sources`/`stubs` in place. Every declared source pin
/// gets a fresh top-level `sitePin` branch (mirrors `NxRouter.write()`
/// walking `net.sources` and rebuilding each entry); sources the router
/// actually used get a PIP chain grafted under them, walking
/// `attrs[node].next_nodes[net_name]`, with the matching stub's site pin
/// re-attached as the final leaf once a routed sink is reached. Stubs
/// claimed this way are removed from `stubs`; anything left over is
/// unrouted and is written back unchanged. Returns the number of PIP
/// branches written.
pub(super) fn rewrite_net(
    mut net: phys_net::Builder<'_>,
    to_route: &NetToRoute,
    graph: &RoutingGraph,
    device_strs: &StringTable,
    strings: &mut NetlistStrings,
) -> Result<usize, RouterError> {
    /* The reference asserts every stub's routeSegment is a bare sitePin leaf
     * before grafting it back onto a routed chain; check the same thing up
     * front so a malformed input fails loudly instead of silently dropping
     * a sink. */
    let mut stub_by_sink: HashSet<(u32, u32)> = HashSet::new();
    {
        let stubs = net.reborrow().get_stubs().map_err(RouterError::Capnp)?;
        for i in 0..stubs.len() {
            let mut stub = stubs.reborrow().get(i);
            let sp = match stub.reborrow().get_route_segment().which().map_err(RouterError::Capnp)? {
                route_branch::route_segment::Which::SitePin(sp) => sp.map_err(RouterError::Capnp)?,
                _ => return Err(RouterError::MalformedNetlist("stub routeSegment is not a sitePin".into())),
            };
            if stub.get_branches().map_err(RouterError::Capnp)?.len() != 0 {
                return Err(RouterError::MalformedNetlist("unrouted stub has unexpected sub-branches".into()));
            }
            stub_by_sink.insert((sp.get_site(), sp.get_pin()));
        }
    }

    let net_name = net.reborrow().get_name();
    let mut source_site_pins: Vec<(u32, u32)> = to_route.source_pin2node.keys().copied().collect();
    source_site_pins.sort_unstable();

    let mut num_pips = 0usize;
    let total_sources = source_site_pins.len() as u32;
    let mut sources = net.reborrow().init_sources(total_sources);
    for (idx, &pins) in source_site_pins.iter().enumerate() {
        let mut branch = sources.reborrow().get(idx as u32);
        {
            let mut sp = branch.reborrow().get_route_segment().init_site_pin();
            sp.set_site(pins.0);
            sp.set_pin(pins.1);
        }

        let source_node = to_route.source_pin2node[&pins];
        let used = graph
            .attrs
            .get(&source_node)
            .map(|a| a.next_nodes.contains_key(&net_name))
            .unwrap_or(false);
        if used {
            num_pips += write_pip_chain(branch, source_node, net_name, graph, device_strs, strings, &mut stub_by_sink)?;
        }
    }

    let remaining: Vec<(u32, u32)> = stub_by_sink.into_iter().collect();
    let mut new_stubs = net.init_stubs(remaining.len() as u32);
    for (i, &(site, pin)) in remaining.iter().enumerate() {
        let b = new_stubs.reborrow().get(i as u32);
        let mut sp = b.get_route_segment().init_site_pin();
        sp.set_site(site);
        sp.set_pin(pin);
    }

    Ok(num_pips)
}

/// Recursively materialize `node`'s outgoing routing tree for `net_name`
/// under `branch`'s `branches` list: one child per PIP edge, grafting the
/// claimed stub's site-pin leaf wherever `node` is itself a routed sink.
/// Returns the number of PIP branches written below `branch`.
fn write_pip_chain(
    branch: route_branch::Builder<'_>,
    node: NodeId,
    net_name: u32,
    graph: &RoutingGraph,
    device_strs: &StringTable,
    strings: &mut NetlistStrings,
    stub_by_sink: &mut HashSet<(u32, u32)>,
) -> Result<usize, RouterError> {
    let next_nodes = graph
        .attrs
        .get(&node)
        .map(|a| a.next_nodes.get(&net_name).cloned().unwrap_or_default())
        .unwrap_or_default();
    let sink_pin = graph
        .attrs
        .get(&node)
        .and_then(|a| a.sink_pin)
        .filter(|p| stub_by_sink.contains(p));

    let extra = if sink_pin.is_some() { 1 } else { 0 };
    let mut children = branch.init_branches((next_nodes.len() + extra) as u32);

    let mut num_pips = 0usize;
    for (i, &next) in next_nodes.iter().enumerate() {
        let attr = graph.edge_attr(node, next).expect("routed edge must still exist");
        let pip_data = graph.pip_data[attr.pip_data_index as usize];
        let tile = strings.index_of(device_strs.get(attr.tile));
        let wire0 = strings.index_of(device_strs.get(pip_data.wire0));
        let wire1 = strings.index_of(device_strs.get(pip_data.wire1));

        let mut child = children.reborrow().get(i as u32);
        {
            let mut pip = child.reborrow().get_route_segment().init_pip();
            pip.set_tile(tile);
            pip.set_wire0(wire0);
            pip.set_wire1(wire1);
            pip.set_forward(pip_data.forward);
        }
        num_pips += 1;
        num_pips += write_pip_chain(child, next, net_name, graph, device_strs, strings, stub_by_sink)?;
    }

    if let Some(sink) = sink_pin {
        let leaf = children.reborrow().get(next_nodes.len() as u32);
        let mut sp = leaf.get_route_segment().init_site_pin();
        sp.set_site(sink.0);
        sp.set_pin(sink.1);
        stub_by_sink.remove(&sink);
    }

    Ok(num_pips)
}

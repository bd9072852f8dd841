use std::collections::HashMap;

use crate::ic_loader::PhysicalNetlist_capnp::{phys_net, phys_netlist, route_branch};
use crate::strtab::StringTable;

use super::builder::node_from_site_pin;
use super::prepare::{prepare, NetToRoute};
use super::write::{rewrite_net, NetlistStrings};
use super::*;

fn attr(tile: u32) -> EdgeAttr {
    EdgeAttr { tile, pip_data_index: 0 }
}

/// Build a minimal `RoutingGraph` with one site/pin resolving to one node,
/// exercising the same device-resolved lookup chain `builder::build`
/// populates: site -> (tile, tile_type, site_type) -> wire name -> node.
fn graph_with_one_site_pin(site: &str, tile: &str, pin: &str, wire: &str, node: NodeId) -> RoutingGraph {
    let mut g = RoutingGraph::with_capacity((node + 1) as usize);
    g.add_node(node);
    g.site2tile_and_types = Some(HashMap::from([(site.to_string(), (tile.to_string(), 0, 0))]));
    g.tiletype2sitetype_pinname2wire =
        Some(HashMap::from([(0, HashMap::from([((0, pin.to_string()), wire.to_string())]))]));
    g.tile2wire2node = Some(HashMap::from([(tile.to_string(), HashMap::from([(wire.to_string(), node)]))]));
    g
}

#[test]
fn node_from_site_pin_resolves_across_independently_indexed_tables() {
    let g = graph_with_one_site_pin("SITE_A", "TILE_A", "O", "WIRE_O", 5);
    assert_eq!(node_from_site_pin(&g, "SITE_A", "O"), Some(5));
}

#[test]
fn node_from_site_pin_does_not_confuse_same_numeric_index_across_files() {
    /* The device and netlist each intern "SITE_A"/"O" at whatever index their
     * own string table happens to assign; resolution must go through string
     * content the whole way, never through either file's raw index, or a
     * netlist that happens to reuse a device's numeric index for an unrelated
     * string would silently resolve to the wrong node. */
    let g = graph_with_one_site_pin("SITE_A", "TILE_A", "O", "WIRE_O", 5);
    assert_eq!(node_from_site_pin(&g, "SITE_B", "O"), None);
    assert_eq!(node_from_site_pin(&g, "SITE_A", "I"), None);
}

#[test]
fn node_from_site_pin_returns_none_outside_built_region() {
    let g = RoutingGraph::with_capacity(1);
    assert_eq!(node_from_site_pin(&g, "SITE_A", "O"), None);
}

/// A `phys_netlist`-shaped message, used in tests purely as a way to host a
/// `strList` for `StringTable::new` without a disk round-trip.
fn string_table_of(strs: &[&str]) -> capnp::message::TypedBuilder<phys_netlist::Owned> {
    let mut msg = capnp::message::TypedBuilder::<phys_netlist::Owned>::new_default();
    {
        let root: phys_netlist::Builder = msg.get_root().unwrap();
        let mut list = root.init_str_list(strs.len() as u32);
        for (i, s) in strs.iter().enumerate() {
            list.set(i as u32, (*s).into());
        }
    }
    msg
}

#[test]
fn prepare_resolves_site_pins_through_each_files_own_string_table() {
    /* The netlist names "SITE_A"/"O"/"SITE_B"/"I" at indices 0..3, unrelated
     * to whatever indices the device assigned them while building `graph`. */
    let mut graph = graph_with_one_site_pin("SITE_A", "TILE_A", "O", "WIRE_O", 5);
    graph.add_node(6);
    graph.site2tile_and_types.as_mut().unwrap().insert("SITE_B".to_string(), ("TILE_B".to_string(), 1, 1));
    graph
        .tiletype2sitetype_pinname2wire
        .as_mut()
        .unwrap()
        .insert(1, HashMap::from([((1, "I".to_string()), "WIRE_I".to_string())]));
    graph.tile2wire2node.as_mut().unwrap().insert("TILE_B".to_string(), HashMap::from([("WIRE_I".to_string(), 6)]));

    let netlist_msg = string_table_of(&["SITE_A", "O", "SITE_B", "I"]);

    let mut phys_msg = capnp::message::TypedBuilder::<phys_netlist::Owned>::new_default();
    {
        let root: phys_netlist::Builder = phys_msg.get_root().unwrap();
        let mut nets = root.init_phys_nets(1);
        let mut net = nets.reborrow().get(0);
        net.set_name(100);
        net.set_type(phys_net::NetType::Signal);
        {
            let mut sources = net.reborrow().init_sources(1);
            let mut sp = sources.reborrow().get(0).get_route_segment().init_site_pin();
            sp.set_site(0);
            sp.set_pin(1);
        }
        {
            let mut stubs = net.reborrow().init_stubs(1);
            let mut sp = stubs.reborrow().get(0).get_route_segment().init_site_pin();
            sp.set_site(2);
            sp.set_pin(3);
        }
    }

    let netlist_strs_reader: phys_netlist::Reader = netlist_msg.get_root_as_reader().unwrap();
    let netlist_strs = StringTable::new(netlist_strs_reader.get_str_list().unwrap());
    let phys_reader: phys_netlist::Reader = phys_msg.get_root_as_reader().unwrap();

    let nets = prepare(&mut graph, &phys_reader, &netlist_strs).unwrap();

    assert_eq!(nets.len(), 1);
    let (name, to_route) = &nets[0];
    assert_eq!(*name, 100);
    assert_eq!(to_route.source_pin2node.get(&(0, 1)), Some(&5));
    assert_eq!(to_route.sink_nodes, vec![6]);
    assert_eq!(graph.attrs[&6].sink_pin, Some((2, 3)));
    assert!(graph.tile2wire2node.is_none());
}

#[test]
fn rewrite_net_grafts_pip_chain_and_consumes_matching_stub() {
    let mut graph = RoutingGraph::with_capacity(2);
    graph.add_node(0);
    graph.add_node(1);
    graph.add_edge(0, 1, attr(7));
    graph.pip_data.push(PipData { wire0: 8, wire1: 9, forward: true });
    graph.attrs.entry(0).or_default().next_nodes.insert(100, vec![1]);
    graph.attrs.entry(1).or_default().sink_pin = Some((10, 20));

    let mut dev_msg = capnp::message::TypedBuilder::<phys_netlist::Owned>::new_default();
    {
        let root: phys_netlist::Builder = dev_msg.get_root().unwrap();
        let mut list = root.init_str_list(10);
        list.set(7, "TILE_A".into());
        list.set(8, "WIRE0".into());
        list.set(9, "WIRE1".into());
    }
    let dev_reader: phys_netlist::Reader = dev_msg.get_root_as_reader().unwrap();
    let device_strs = StringTable::new(dev_reader.get_str_list().unwrap());

    let empty_strs_msg = string_table_of(&[]);
    let empty_strs_reader: phys_netlist::Reader = empty_strs_msg.get_root_as_reader().unwrap();
    let netlist_strs_src = StringTable::new(empty_strs_reader.get_str_list().unwrap());
    let mut strings = NetlistStrings::from_existing(&netlist_strs_src);

    let mut net_msg = capnp::message::TypedBuilder::<phys_net::Owned>::new_default();
    {
        let mut net: phys_net::Builder = net_msg.get_root().unwrap();
        net.set_name(100);
        net.set_type(phys_net::NetType::Signal);
        let mut stubs = net.reborrow().init_stubs(1);
        let mut sp = stubs.reborrow().get(0).get_route_segment().init_site_pin();
        sp.set_site(10);
        sp.set_pin(20);
    }

    let mut source_pin2node = HashMap::new();
    source_pin2node.insert((1u32, 2u32), 0u32);
    let to_route = NetToRoute { source_pin2node, sink_nodes: vec![1] };

    let net: phys_net::Builder = net_msg.get_root().unwrap();
    let num_pips = rewrite_net(net, &to_route, &graph, &device_strs, &mut strings).unwrap();
    assert_eq!(num_pips, 1);

    let check: phys_net::Reader = net_msg.get_root_as_reader().unwrap();
    let sources = check.get_sources().unwrap();
    assert_eq!(sources.len(), 1);
    let src0 = sources.get(0);
    match src0.get_route_segment().which().unwrap() {
        route_branch::route_segment::Which::SitePin(sp) => {
            let sp = sp.unwrap();
            assert_eq!((sp.get_site(), sp.get_pin()), (1, 2));
        }
        _ => panic!("expected sitePin root"),
    }

    let branches = src0.get_branches().unwrap();
    assert_eq!(branches.len(), 1);
    let pip_branch = branches.get(0);
    match pip_branch.get_route_segment().which().unwrap() {
        route_branch::route_segment::Which::Pip(pip) => {
            let pip = pip.unwrap();
            assert_eq!(pip.get_tile(), 0);
            assert_eq!(pip.get_wire0(), 1);
            assert_eq!(pip.get_wire1(), 2);
            assert!(pip.get_forward());
        }
        _ => panic!("expected pip branch"),
    }

    let leaves = pip_branch.get_branches().unwrap();
    assert_eq!(leaves.len(), 1);
    match leaves.get(0).get_route_segment().which().unwrap() {
        route_branch::route_segment::Which::SitePin(sp) => {
            let sp = sp.unwrap();
            assert_eq!((sp.get_site(), sp.get_pin()), (10, 20));
        }
        _ => panic!("expected sitePin leaf"),
    }

    assert_eq!(check.get_stubs().unwrap().len(), 0);
}

#[test]
fn rewrite_net_leaves_unused_source_stub_free_of_pips() {
    let mut graph = RoutingGraph::with_capacity(1);
    graph.add_node(0);
    /* node 0 has no next_nodes entry for this net: it was never routed to. */

    let strs_msg = string_table_of(&["TILE_A"]);
    let strs_reader: phys_netlist::Reader = strs_msg.get_root_as_reader().unwrap();
    let device_strs = StringTable::new(strs_reader.get_str_list().unwrap());
    let mut strings = NetlistStrings::from_existing(&device_strs);

    let mut net_msg = capnp::message::TypedBuilder::<phys_net::Owned>::new_default();
    {
        let mut net: phys_net::Builder = net_msg.get_root().unwrap();
        net.set_name(42);
        net.set_type(phys_net::NetType::Signal);
        net.init_stubs(0);
    }

    let mut source_pin2node = HashMap::new();
    source_pin2node.insert((1u32, 2u32), 0u32);
    let to_route = NetToRoute { source_pin2node, sink_nodes: vec![] };

    let net: phys_net::Builder = net_msg.get_root().unwrap();
    let num_pips = rewrite_net(net, &to_route, &graph, &device_strs, &mut strings).unwrap();
    assert_eq!(num_pips, 0);

    let check: phys_net::Reader = net_msg.get_root_as_reader().unwrap();
    let src0 = check.get_sources().unwrap().get(0);
    assert_eq!(src0.get_branches().unwrap().len(), 0);
}

#[test]
fn shortest_path_finds_direct_edge() {
    let mut g = RoutingGraph::with_capacity(3);
    g.add_node(0);
    g.add_node(1);
    g.add_node(2);
    g.add_edge(0, 1, attr(0));
    g.add_edge(1, 2, attr(0));
    assert_eq!(g.shortest_path(0, 2), Some(vec![0, 1, 2]));
}

#[test]
fn shortest_path_returns_none_when_unreachable() {
    let mut g = RoutingGraph::with_capacity(2);
    g.add_node(0);
    g.add_node(1);
    assert_eq!(g.shortest_path(0, 1), None);
}

#[test]
fn remove_node_severs_all_incident_edges() {
    let mut g = RoutingGraph::with_capacity(3);
    for n in 0..3 {
        g.add_node(n);
    }
    g.add_edge(0, 1, attr(0));
    g.add_edge(1, 2, attr(0));
    g.remove_node(1);
    assert!(!g.contains(1));
    assert_eq!(g.out_edges(0).count(), 0);
    assert_eq!(g.in_edges(2).count(), 0);
}

#[test]
fn take_in_edges_except_keeps_only_named_driver() {
    let mut g = RoutingGraph::with_capacity(3);
    for n in 0..3 {
        g.add_node(n);
    }
    g.add_edge(0, 2, attr(0));
    g.add_edge(1, 2, attr(1));
    let removed = g.take_in_edges_except(2, 0);
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].0, 1);
    assert_eq!(g.in_edges(2).count(), 1);
    assert_eq!(g.in_edges(2).next().unwrap().0, 0);
}

#[test]
fn restore_edge_reinstates_a_hidden_edge() {
    let mut g = RoutingGraph::with_capacity(2);
    g.add_node(0);
    g.add_node(1);
    g.add_edge(0, 1, attr(5));
    let removed = g.take_out_edges(0);
    assert_eq!(g.out_edges(0).count(), 0);
    for (to, a) in removed {
        g.restore_edge(0, to, a);
    }
    assert_eq!(g.out_edges(0).count(), 1);
}

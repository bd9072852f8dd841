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

use std::time::Instant;

use crate::strtab::StringTable;

use super::prepare::NetToRoute;
use super::{EdgeAttr, NodeId, RoutingGraph};

/// Route every sink of every net in `nets`, recording on each node which
/// next-node(s) each net's tree uses from it. Unweighted BFS per sink,
/// trying each candidate source in turn (grounded on `NxRouter.route()`).
///
/// For nets with more than one sink, the reference discipline is: after
/// committing a path, temporarily hide every other incoming edge of each
/// node the path touches so a later sink on the *same* net cannot branch
/// the tree through an already-claimed driver from a different node. The
/// hidden edges are restored once the whole net is done. This enforces the
/// per-net tree property without any global rip-up.
pub fn route(graph: &mut RoutingGraph, nets: &[(u32, NetToRoute)], strs: &StringTable) {
    let t0 = Instant::now();
    let total_pins: usize = nets.iter().map(|(_, n)| n.sink_nodes.len()).sum();
    println!("Routing {} pins...", total_pins);

    let mut num_pins_routed = 0usize;
    let mut hidden_edges: Vec<(NodeId, NodeId, EdgeAttr)> = Vec::new();

    for (net_name, net) in nets {
        let source_nodes: Vec<NodeId> = net.source_pin2node.values().copied().collect();
        let multi_sink = net.sink_nodes.len() > 1;

        for &sink_node in &net.sink_nodes {
            let mut path = None;
            for &source_node in &source_nodes {
                if let Some(p) = graph.shortest_path(source_node, sink_node) {
                    path = Some(p);
                    break;
                }
            }
            let path = match path {
                Some(p) => p,
                None => {
                    let sp = graph.attrs.get(&sink_node).and_then(|a| a.sink_pin);
                    let pin_desc = sp
                        .map(|(s, p)| format!("({}, {})", strs.get(s), strs.get(p)))
                        .unwrap_or_else(|| "?".into());
                    println!("Unable to route sink pin {} on net {}", pin_desc, strs.get(*net_name));
                    continue;
                }
            };

            for w in path.windows(2) {
                let (u, v) = (w[0], w[1]);
                graph.attrs.entry(u).or_default().next_nodes.entry(*net_name).or_default().push(v);
                if multi_sink {
                    /* Hide every other driver of `v` so a later sink on this net
                     * cannot branch the tree through a node claimed by a
                     * different upstream node; restored once the net is done. */
                    hidden_edges.extend(graph.take_in_edges_except(v, u));
                }
            }

            num_pins_routed += 1;
            if num_pins_routed % 10000 == 0 {
                println!("\tRouted {} pins: {:.1}s", num_pins_routed, t0.elapsed().as_secs_f64());
            }
        }
        for (from, to, attr) in hidden_edges.drain(..) {
            graph.restore_edge(from, to, attr);
        }
    }
    println!("\tRouted {} pins: {:.1}s", num_pins_routed, t0.elapsed().as_secs_f64());
}

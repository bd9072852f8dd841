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

use crate::ic_loader::phys_netlist::Root as Netlist;
use crate::strtab::StringTable;

use super::{AnalyzerGraph, NodeIdx, PlacementMap, Segment};

fn segment_label(seg: &Segment, strs: &StringTable) -> String {
    match *seg {
        Segment::BelPin { site, bel, pin } => {
            format!("belPin  {} {} {}", strs.get(site), strs.get(bel), strs.get(pin))
        }
        Segment::SitePin { site, pin } => format!("sitePin {} {}", strs.get(site), strs.get(pin)),
    }
}

pub fn net_name_for(graph: &AnalyzerGraph, netlist: &Netlist<'_>, strs: &StringTable, node: NodeIdx) -> String {
    if let Some(idx) = graph.nodes[node as usize].net_index {
        let nets = netlist.get_phys_nets().unwrap();
        return strs.get(nets.get(idx).get_name()).to_string();
    }
    "NULL".to_string()
}

/// Render `path` (an alternating sequence of net-source, net-sink, joined
/// cell, net-source, ...) the way `pretty_print_path` does, returning the
/// total wirelength and, at `verbosity >= 1`, the formatted table plus the
/// list of cells traversed (fed to `vivado_timing_commands` by the caller).
pub fn pretty_print_path(
    graph: &AnalyzerGraph,
    placements: &PlacementMap,
    netlist: &Netlist<'_>,
    strs: &StringTable,
    path: &[NodeIdx],
    path_name: &str,
    verbosity: u32,
) -> (u32, Vec<String>) {
    let mut length = 0u32;
    let mut lines = Vec::new();
    let mut cells_on_path = Vec::new();

    let first_seg = &graph.nodes[path[0] as usize].segment;
    if let Segment::BelPin { site, bel, .. } = first_seg {
        if let Some(p) = placements.0.get(&(*site, *bel)) {
            let cell = strs.get(p.cell_name).to_string();
            lines.push(format!("        |         | cell    {}", cell));
            cells_on_path.push(cell);
        }
    }

    let mut i = 0;
    while i + 1 < path.len() {
        let (u, v) = (path[i], path[i + 1]);
        let wl = graph.out_edges[u as usize]
            .iter()
            .find(|(to, _)| *to == v)
            .map(|(_, w)| *w)
            .unwrap_or(0);
        length += wl;

        if verbosity >= 1 {
            let net_name = net_name_for(graph, netlist, strs, u);
            let source = segment_label(&graph.nodes[u as usize].segment, strs);
            let sink = segment_label(&graph.nodes[v as usize].segment, strs);
            lines.push(format!("   {:>5}|         | {} (start of net: {})", "", source, net_name));
            lines.push(format!("   {:>5}|         | ...", wl));
            lines.push(format!("   {:>5}|         | {}", "", sink));

            if let Segment::BelPin { site, bel, .. } = graph.nodes[v as usize].segment {
                if let Some(p) = placements.0.get(&(site, bel)) {
                    let cell = strs.get(p.cell_name).to_string();
                    lines.push(format!("        |{:>8} | cell    {}", length, cell));
                    cells_on_path.push(cell);
                }
            }
        }
        i += 2;
    }

    if verbosity < 1 {
        println!("{} Wirelength: {}", path_name, length);
        return (length, cells_on_path);
    }

    println!("============================================================");
    println!("Routing path for {}", path_name);
    println!("Wirelength: {}", length);
    println!("Segment | Running |");
    println!("Length  |  Total  | Segment Name");
    println!("--------+---------+-----------------------------------------");
    for l in &lines {
        println!("{}", l);
    }
    println!();
    println!("============================================================");

    (length, cells_on_path)
}

/// Vivado Tcl commands reporting timing through, and selecting, every cell
/// on the printed path. Ported from `vivado_timing_commands`.
pub fn vivado_timing_commands(cells_on_path: &[String]) -> Vec<String> {
    if cells_on_path.is_empty() {
        return Vec::new();
    }
    let mut report = format!("report_timing -from {{{}}} ", cells_on_path[0]);
    for cell in &cells_on_path[1..] {
        report.push_str(&format!("-through {{{}}} ", cell));
    }
    report.push_str("-delay_type min_max -max_paths 10 -sort_by group -input_pins -routable_nets -name timing_1");

    let mut select = String::from("select_objects [get_cells {");
    for cell in cells_on_path {
        select.push_str(cell);
        select.push(' ');
    }
    select.push_str("}]");

    vec![report, select]
}

/// Wirelength-only summary line used by `--mode lsn`/`cp` at verbosity 0,
/// also used to sanity-check a path's total independent of `pretty_print_path`.
pub fn path_wirelength(graph: &AnalyzerGraph, path: &[NodeIdx]) -> u32 {
    path.windows(2)
        .map(|w| {
            graph.out_edges[w[0] as usize]
                .iter()
                .find(|(to, _)| *to == w[1])
                .map(|(_, wl)| *wl)
                .unwrap_or(0)
        })
        .sum()
}

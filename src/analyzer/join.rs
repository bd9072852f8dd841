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

use crate::error::AnalyzerError;
use crate::strtab::StringTable;

use super::{device_data, AnalyzerGraph, PlacementMap, Segment};

/// Turn the per-net forest into a DAG by adding a zero-length edge from
/// every leaf of a combinatorial cell's input pins to every root the same
/// cell drives. Grounded on `join_nets`.
///
/// Fails with every unrecognized cell type collected together (site, bel,
/// cell type), rather than on the first miss, so a single run reports the
/// device-data gap completely.
pub fn join_nets(
    graph: &mut AnalyzerGraph,
    placements: &PlacementMap,
    strs: &StringTable,
) -> Result<(), AnalyzerError> {
    let mut join_points: HashMap<(u32, u32), HashMap<&str, super::NodeIdx>> = HashMap::new();
    for &leaf in &graph.leaves {
        if let Segment::BelPin { site, bel, pin } = graph.nodes[leaf as usize].segment {
            join_points.entry((site, bel)).or_default().insert(strs.get(pin), leaf);
        }
    }

    let mut unrecognized: HashSet<(String, String)> = HashSet::new();
    let mut new_edges = Vec::new();

    for &root in &graph.roots {
        let (site, bel, out_pin) = match graph.nodes[root as usize].segment {
            Segment::BelPin { site, bel, pin } => (site, bel, pin),
            _ => unreachable!("root node always carries a belPin segment"),
        };
        let bel_inputs = match join_points.get(&(site, bel)) {
            Some(m) => m,
            None => continue,
        };
        let placement = match placements.0.get(&(site, bel)) {
            Some(p) => p,
            None => continue,
        };
        let cell_type = strs.get(placement.cell_type);
        let connectivity_fn = match device_data::connectivity_fn(cell_type) {
            Some(f) => f,
            None => {
                unrecognized.insert((cell_type.to_string(), strs.get(bel).to_string()));
                continue;
            }
        };
        let connectivity = connectivity_fn(strs.get(out_pin));
        for (&pin_name, &leaf) in bel_inputs.iter() {
            if connectivity.reaches(pin_name) {
                new_edges.push((leaf, root));
            }
        }
    }

    if !unrecognized.is_empty() {
        let mut cells: Vec<String> = unrecognized
            .into_iter()
            .map(|(t, b)| format!("{} ({})", t, b))
            .collect();
        cells.sort();
        return Err(AnalyzerError::UnknownCellType(cells.join(", ")));
    }

    for (from, to) in new_edges {
        graph.add_edge(from, to, 0);
    }
    Ok(())
}

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
use crate::strtab::StringTable;

use super::{AnalyzerGraph, NodeIdx, PlacementMap, Segment};

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// Longest weighted path in a DAG, found by memoizing `dist[v] = max over
/// out edges (w + dist[to])`, `0` for a sink. Any node may start the path;
/// the overall answer is the node with the largest `dist`. `Gray` marks a
/// node currently on the recursion stack, catching a cycle the caller
/// assumed couldn't exist (a join should never create one if the cell
/// catalogue is acyclic by construction, but input data can still be
/// inconsistent).
struct Memo {
    mark: Vec<Mark>,
    dist: Vec<u32>,
    next: Vec<Option<NodeIdx>>,
}

fn visit(graph: &AnalyzerGraph, memo: &mut Memo, v: NodeIdx) -> Result<u32, AnalyzerError> {
    match memo.mark[v as usize] {
        Mark::Black => return Ok(memo.dist[v as usize]),
        Mark::Gray => {
            return Err(AnalyzerError::Cyclic(format!("node {} revisited while computing longest path", v)))
        }
        Mark::White => {}
    }
    memo.mark[v as usize] = Mark::Gray;
    let mut best_dist = 0u32;
    let mut best_next = None;
    for &(to, w) in &graph.out_edges[v as usize] {
        let d = w + visit(graph, memo, to)?;
        if d >= best_dist {
            best_dist = d;
            best_next = Some(to);
        }
    }
    memo.mark[v as usize] = Mark::Black;
    memo.dist[v as usize] = best_dist;
    memo.next[v as usize] = best_next;
    Ok(best_dist)
}

/// Compute the longest path anywhere in the graph, then extend its tail
/// through any remaining zero-weight join edges until it reaches a genuine
/// sink (a belPin with no further fanout that is actually placed), mirroring
/// `find_longest_path`'s tail-extension search. Emits a warning through the
/// ambient logging path, not a hard error, when no such sink exists — the
/// path is assumed to drive a hierarchical port instead.
pub fn find_longest_path(
    graph: &AnalyzerGraph,
    placements: &PlacementMap,
    strs: &StringTable,
) -> Result<Vec<NodeIdx>, AnalyzerError> {
    let n = graph.nodes.len();
    let mut memo = Memo { mark: vec![Mark::White; n], dist: vec![0; n], next: vec![None; n] };
    for v in 0..n as NodeIdx {
        visit(graph, &mut memo, v)?;
    }

    let start = (0..n as NodeIdx).max_by_key(|&v| memo.dist[v as usize]).unwrap_or(0);
    let mut path = vec![start];
    let mut cur = start;
    while let Some(next) = memo.next[cur as usize] {
        path.push(next);
        cur = next;
    }

    if let Some(tail) = search_for_first_valid_sink(graph, placements, *path.last().unwrap()) {
        path.extend(tail.into_iter().skip(1));
    } else if let Segment::BelPin { site, bel, .. } = graph.nodes[*path.last().unwrap() as usize].segment {
        if let Some(p) = placements.0.get(&(site, bel)) {
            warn_log!(
                "No valid sink found from cell {}; assuming that it drives a hierarchical port.",
                strs.get(p.cell_name)
            );
        }
    }
    Ok(path)
}

/// DFS from `source` along its (now purely zero-weight) out edges looking
/// for the first node with no further fanout whose segment is a belPin that
/// is actually placed — i.e. a true sequential or port sink rather than an
/// intermediate combinatorial cell the weight-maximizing search happened to
/// stop at.
fn search_for_first_valid_sink(
    graph: &AnalyzerGraph,
    placements: &PlacementMap,
    source: NodeIdx,
) -> Option<Vec<NodeIdx>> {
    if graph.out_edges[source as usize].is_empty() {
        return match graph.nodes[source as usize].segment {
            Segment::BelPin { site, bel, .. } if placements.0.contains_key(&(site, bel)) => Some(vec![source]),
            _ => None,
        };
    }
    for &(to, _) in &graph.out_edges[source as usize] {
        if let Some(mut rest) = search_for_first_valid_sink(graph, placements, to) {
            let mut path = vec![source];
            path.append(&mut rest);
            return Some(path);
        }
    }
    None
}

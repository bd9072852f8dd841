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

/// For each benchmark, rank every team by the score it achieved on that
/// benchmark. Ties share a rank (1-based). `scores` maps team name to a
/// per-benchmark score list; every team must have the same number of
/// entries, in the same benchmark order.
///
/// Panics if the score lists are not all the same length, mirroring the
/// reference implementation's `assert`.
pub fn rank_benchmark_scores(scores: &HashMap<String, Vec<f64>>) -> HashMap<String, Vec<u32>> {
    let num_benchmarks = scores.values().next().map(|v| v.len()).unwrap_or(0);
    for v in scores.values() {
        assert_eq!(v.len(), num_benchmarks, "every team must report the same number of benchmark scores");
    }

    let mut rankings: HashMap<String, Vec<u32>> = scores.keys().map(|k| (k.clone(), Vec::new())).collect();

    for b in 0..num_benchmarks {
        let mut distinct_scores: Vec<f64> = scores.values().map(|v| v[b]).collect();
        distinct_scores.sort_by(|a, c| a.partial_cmp(c).unwrap());
        distinct_scores.dedup();

        for (team, score_list) in scores {
            let score = score_list[b];
            let rank = distinct_scores.iter().position(|&s| s == score).unwrap() as u32 + 1;
            rankings.get_mut(team).unwrap().push(rank);
        }
    }
    rankings
}

/// Group teams into places by the arithmetic mean of their per-benchmark
/// ranks, best (lowest mean) first. Teams with an identical mean share a
/// place. Each place's team names are sorted for deterministic output.
pub fn rank_teams(rankings: &HashMap<String, Vec<u32>>) -> Vec<Vec<String>> {
    let mut avg_rank: HashMap<u64, Vec<String>> = HashMap::new();
    let mut bits_to_avg: HashMap<u64, f64> = HashMap::new();
    for (team, ranks) in rankings {
        let avg = ranks.iter().sum::<u32>() as f64 / ranks.len() as f64;
        let key = avg.to_bits();
        avg_rank.entry(key).or_default().push(team.clone());
        bits_to_avg.insert(key, avg);
    }

    let mut keys: Vec<u64> = avg_rank.keys().copied().collect();
    keys.sort_by(|a, b| bits_to_avg[a].partial_cmp(&bits_to_avg[b]).unwrap());

    keys.into_iter()
        .map(|k| {
            let mut teams = avg_rank.remove(&k).unwrap();
            teams.sort();
            teams
        })
        .collect()
}

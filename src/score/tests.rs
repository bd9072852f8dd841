use std::collections::HashMap;

use super::ranking::{rank_benchmark_scores, rank_teams};
use super::*;

#[test]
fn failing_check_scores_infinity_regardless_of_runtime() {
    assert_eq!(score_benchmark_results(false, 1.0, 1.0), f64::INFINITY);
}

#[test]
fn passing_check_blends_runtime_and_wirelength() {
    let score = score_benchmark_results(true, 10.0, 100.0);
    assert!((score - (0.9 * 10.0 + 0.1 * 100.0)).abs() < 1e-9);
}

#[test]
fn rank_benchmark_scores_gives_ties_the_same_rank() {
    let mut scores = HashMap::new();
    scores.insert("a".to_string(), vec![1.0, 5.0]);
    scores.insert("b".to_string(), vec![1.0, 3.0]);
    scores.insert("c".to_string(), vec![2.0, 3.0]);

    let rankings = rank_benchmark_scores(&scores);
    assert_eq!(rankings["a"], vec![1, 3]);
    assert_eq!(rankings["b"], vec![1, 1]);
    assert_eq!(rankings["c"], vec![2, 1]);
}

#[test]
fn rank_teams_orders_by_mean_rank_ascending() {
    let mut rankings = HashMap::new();
    rankings.insert("a".to_string(), vec![1u32, 3]);
    rankings.insert("b".to_string(), vec![1u32, 1]);
    rankings.insert("c".to_string(), vec![2u32, 1]);

    let places = rank_teams(&rankings);
    assert_eq!(places[0], vec!["b".to_string()]);
    assert_eq!(places.last().unwrap(), &vec!["a".to_string()]);
}

#[test]
fn rank_teams_groups_equal_means_into_one_place() {
    let mut rankings = HashMap::new();
    rankings.insert("a".to_string(), vec![1u32, 2]);
    rankings.insert("b".to_string(), vec![2u32, 1]);

    let places = rank_teams(&rankings);
    assert_eq!(places.len(), 1);
    assert_eq!(places[0], vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn format_results_table_pads_columns_to_widest_cell() {
    let rows = vec![
        vec!["Benchmark".to_string(), "Score".to_string()],
        vec!["bench_one".to_string(), "1.00".to_string()],
    ];
    let table = format_results_table(&rows);
    assert!(table.contains("| Benchmark | Score |"));
    assert!(table.starts_with('+'));
}

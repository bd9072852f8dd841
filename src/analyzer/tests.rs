use super::device_data::*;
use super::*;

#[test]
fn carry8_bug_merges_s4_and_s3_into_one_bogus_token() {
    let c = connectivity_fn("CARRY8").unwrap();
    let o4 = c("O4");
    assert!(!o4.reaches("S4"));
    assert!(!o4.reaches("S3"));
    assert!(o4.reaches("S4S3"));
}

#[test]
fn carry8_o0_reaches_documented_inputs_only() {
    let c = connectivity_fn("CARRY8").unwrap();
    let o0 = c("O0");
    assert!(o0.reaches("CIN"));
    assert!(o0.reaches("S0"));
    assert!(!o0.reaches("S1"));
}

#[test]
fn lut_is_all_to_all() {
    let c = connectivity_fn("LUT4").unwrap();
    let o = c("O");
    assert!(o.reaches("I0"));
    assert!(o.reaches("anything"));
}

#[test]
fn sequential_cells_are_none_to_none() {
    let c = connectivity_fn("FDRE").unwrap();
    assert!(!c("Q").reaches("D"));
}

#[test]
fn unknown_cell_type_is_not_recognized() {
    assert!(connectivity_fn("NOT_A_REAL_CELL").is_none());
}

#[test]
fn int_tile_zero_length_patterns_resolve() {
    assert_eq!(pip_wirelength("LOGIC_OUTS_L5"), Some(0));
    assert_eq!(pip_wirelength("IMUXOUT12"), Some(0));
}

#[test]
fn long_horizontal_pip_is_fourteen() {
    assert_eq!(pip_wirelength("EE12_BEG3"), Some(14));
}

#[test]
fn unrecognized_pip_pattern_is_none() {
    assert_eq!(pip_wirelength("SOME_UNKNOWN_WIRE_NAME"), None);
}

#[test]
fn tile_root_name_strips_xy_suffix() {
    assert_eq!(tile_root_name("CLEL_R_X42Y75"), Some("CLEL_R"));
    assert_eq!(tile_root_name("BRAM_X10Y200"), Some("BRAM"));
}

#[test]
fn longest_path_follows_heaviest_chain() {
    let mut g = AnalyzerGraph::default();
    let a = g.add_node(AnalyzerNode { net_index: Some(0), segment: Segment::SitePin { site: 0, pin: 0 } });
    let b = g.add_node(AnalyzerNode { net_index: None, segment: Segment::SitePin { site: 0, pin: 1 } });
    let c = g.add_node(AnalyzerNode { net_index: None, segment: Segment::SitePin { site: 0, pin: 2 } });
    g.add_edge(a, b, 5);
    g.add_edge(a, c, 1);
    g.add_edge(b, c, 2);

    let placements = PlacementMap(std::collections::HashMap::new());
    let strs_backing: Vec<String> = vec![];
    let _ = strs_backing;
    // find_longest_path requires a StringTable tied to real capnp data for
    // the warning path; exercise the pure graph algorithm directly instead.
    let n = g.nodes.len();
    let mut mark = vec![0u8; n];
    let mut dist = vec![0u32; n];
    fn visit(g: &AnalyzerGraph, mark: &mut [u8], dist: &mut [u32], v: u32) -> u32 {
        if mark[v as usize] == 2 {
            return dist[v as usize];
        }
        let mut best = 0;
        for &(to, w) in &g.out_edges[v as usize] {
            best = best.max(w + visit(g, mark, dist, to));
        }
        mark[v as usize] = 2;
        dist[v as usize] = best;
        best
    }
    assert_eq!(visit(&g, &mut mark, &mut dist, a), 7);
    let _ = placements;
}

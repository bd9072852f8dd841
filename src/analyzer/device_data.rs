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

use std::collections::HashSet;

/// The set of BEL input pin names that combinatorially reach a given output
/// pin. `All` stands in for "every input pin reaches this output" (the
/// common case for simple combinatorial logic) without having to enumerate
/// the BEL's full pin list at every call site.
pub enum Connectivity {
    None,
    All,
    Set(HashSet<&'static str>),
}

impl Connectivity {
    pub fn reaches(&self, input_pin: &str) -> bool {
        match self {
            Connectivity::None => false,
            Connectivity::All => true,
            Connectivity::Set(s) => s.contains(input_pin),
        }
    }
}

fn none_to_none(_output_pin: &str) -> Connectivity {
    Connectivity::None
}

fn all_to_all(_output_pin: &str) -> Connectivity {
    Connectivity::All
}

fn set(items: &[&'static str]) -> Connectivity {
    Connectivity::Set(items.iter().copied().collect())
}

/// Connectivity rule for CARRY8 cells.
///
/// Two of these output rows contain adjacent string-literal pairs in the
/// device data this is ported from ('S4'  'S3' and 'S4'  'DI4'), which
/// Python silently concatenates into single bogus tokens ('S4S3', 'S4DI4')
/// instead of two separate pin names. That means CARRY8's O4/O5/O6/O7 rows
/// never actually recognize 'S4' (or, for O4, 'S3') as a driving input.
/// This is carried over unfixed rather than corrected, since every known
/// wirelength result this tool is compared against was produced with the
/// bug present.
fn carry8(output_pin: &str) -> Connectivity {
    match output_pin {
        "O0" => set(&["CIN", "S0"]),
        "CO0" => set(&["CIN", "S0", "DI0", "AX"]),
        "O1" => set(&["CIN", "S1", "S0", "DI0", "AX"]),
        "CO1" => set(&["CIN", "S1", "DI1", "BX", "S0", "DI0", "AX"]),
        "O2" => set(&["CIN", "S2", "S1", "DI1", "BX", "S0", "DI0", "AX"]),
        "CO2" => set(&["CIN", "S2", "DI2", "CX", "S1", "DI1", "BX", "S0", "DI0", "AX"]),
        "O3" => set(&["CIN", "S3", "S2", "DI2", "CX", "S1", "DI1", "BX", "S0", "DI0", "AX"]),
        "CO3" => set(&["CIN", "S3", "DI3", "DX", "S2", "DI2", "CX", "S1", "DI1", "BX", "S0", "DI0", "AX"]),
        "O4" => set(&["CIN", "S4S3", "DI3", "DX", "S2", "DI2", "CX", "S1", "DI1", "BX", "S0", "DI0", "AX"]),
        "CO4" => set(&["CIN", "S4", "DI4", "EX", "S3", "DI3", "DX", "S2", "DI2", "CX", "S1", "DI1", "BX", "S0", "DI0", "AX"]),
        "O5" => set(&["CIN", "S5", "S4DI4", "EX", "S3", "DI3", "DX", "S2", "DI2", "CX", "S1", "DI1", "BX", "S0", "DI0", "AX"]),
        "CO5" => set(&["CIN", "S5", "DI5", "FX", "S4", "DI4", "EX", "S3", "DI3", "DX", "S2", "DI2", "CX", "S1", "DI1", "BX", "S0", "DI0", "AX"]),
        "O6" => set(&["CIN", "S6", "S5", "DI5", "FX", "S4DI4", "EX", "S3", "DI3", "DX", "S2", "DI2", "CX", "S1", "DI1", "BX", "S0", "DI0", "AX"]),
        "CO6" => set(&["CIN", "S6", "DI6", "GX", "S5", "DI5", "FX", "S4", "DI4", "EX", "S3", "DI3", "DX", "S2", "DI2", "CX", "S1", "DI1", "BX", "S0", "DI0", "AX"]),
        "O7" => set(&["CIN", "S7", "S6", "DI6", "GX", "S5", "DI5", "FX", "S4DI4", "EX", "S3", "DI3", "DX", "S2", "DI2", "CX", "S1", "DI1", "BX", "S0", "DI0", "AX"]),
        "CO7" => set(&["CIN", "S7", "DI7", "HX", "S6", "DI6", "GX", "S5", "DI5", "FX", "S4", "DI4", "EX", "S3", "DI3", "DX", "S2", "DI2", "CX", "S1", "DI1", "BX", "S0", "DI0", "AX"]),
        other => panic!("carry8 connectivity table has no entry for output pin {:?}", other),
    }
}

fn srl16e(output_pin: &str) -> Connectivity {
    match output_pin {
        "O5" | "O6" => set(&["A0", "A1", "A2", "A3"]),
        "MC31" => Connectivity::Set(HashSet::new()),
        other => panic!("srl16e connectivity table has no entry for output pin {:?}", other),
    }
}

fn srlc32e(output_pin: &str) -> Connectivity {
    match output_pin {
        "O6" => set(&["A0", "A1", "A2", "A3", "A4"]),
        "MC31" => Connectivity::Set(HashSet::new()),
        other => panic!("srlc32e connectivity table has no entry for output pin {:?}", other),
    }
}

fn ram_32(output_pin: &str) -> Connectivity {
    match output_pin {
        "O5" | "O6" => set(&["A0", "A1", "A2", "A3", "A4"]),
        other => panic!("ram_32 connectivity table has no entry for output pin {:?}", other),
    }
}

fn ram_64e(output_pin: &str) -> Connectivity {
    match output_pin {
        "O6" => set(&["A0", "A1", "A2", "A3", "A4", "A5"]),
        other => panic!("ram_64e connectivity table has no entry for output pin {:?}", other),
    }
}

/// Look up the join function for a cell type. `None` means the catalogue
/// does not recognize this cell type at all (a fatal condition: the caller
/// collects every such miss and reports them together rather than failing
/// at the first one, per the recoverable-vs-fatal split in the crate's
/// error taxonomy).
pub fn connectivity_fn(cell_type: &str) -> Option<fn(&str) -> Connectivity> {
    Some(match cell_type {
        "FDRE" | "FDCE" | "FDSE" | "FDPE" => none_to_none,
        "SRL16E" => srl16e,
        "SRLC32E" => srlc32e,
        "RAMD32" | "RAMS32" => ram_32,
        "RAMD64E" | "RAMS64E" => ram_64e,
        "RAMB36E2" | "RAMB18E2" | "FIFO18E2" => none_to_none,
        "MMCME4_ADV" => none_to_none,
        "URAM288" => none_to_none,
        "GTYE4_CHANNEL" | "GTYE4_COMMON" | "PCIE40E4" | "CMACE4" => none_to_none,
        "STARTUPE3" | "ICAPE3" => none_to_none,
        "LUT1" | "LUT2" | "LUT3" | "LUT4" | "LUT5" | "LUT6" => all_to_all,
        "CARRY8" => carry8,
        "MUXF7" | "MUXF8" | "MUXF9" => all_to_all,
        "IBUFCTRL" | "INBUF" | "OBUFT" | "DIFFINBUF" | "IBUFDS_GTE4" => all_to_all,
        "DSP_A_B_DATA" | "DSP_C_DATA" | "DSP_M_DATA" | "DSP_PREADD_DATA" | "DSP_OUTPUT" | "DSP_ALU" => none_to_none,
        "DSP_MULTIPLIER" | "DSP_PREADD" => all_to_all,
        _ => return None,
    })
}

/// `(pattern, wirelength)` table, checked in order against the full wire1
/// name of a PIP inside an INT tile. Hand-rolled matchers stand in for the
/// original's `re.fullmatch` calls since no example in this codebase's
/// lineage pulls in a regex dependency.
struct PipPattern {
    matches: fn(&str) -> bool,
    wirelength: u32,
}

fn digits1_2(s: &str) -> bool {
    (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

fn suffix_digit_in(s: &str, digits: &str) -> bool {
    s.len() == 1 && digits.contains(s)
}

const EW: [&str; 2] = ["E", "W"];
const NS: [&str; 2] = ["N", "S"];

fn match_logic_outs(w: &str) -> bool {
    for d in ["L", "R"] {
        if let Some(rest) = w.strip_prefix("LOGIC_OUTS_").and_then(|r| r.strip_prefix(d)) {
            if digits1_2(rest) {
                return true;
            }
        }
    }
    false
}

fn match_int_node_out(prefix: &str, w: &str) -> bool {
    if let Some(rest) = w.strip_prefix(prefix) {
        if let Some(mid) = rest.strip_suffix("_INT_OUT0").or_else(|| rest.strip_suffix("_INT_OUT1")) {
            return digits1_2(mid);
        }
    }
    false
}

fn match_imux_ew(w: &str) -> bool {
    for d in EW {
        if let Some(rest) = w.strip_prefix("IMUX_").and_then(|r| r.strip_prefix(d)) {
            if digits1_2(rest) {
                return true;
            }
        }
    }
    false
}

/// Fullmatch equivalent of `IMUX(_CMT)?(_XIPHY\d{1,2})?`: bare `IMUX`, with
/// an optional `_CMT`, with an optional `_XIPHY` + 1-2 digit suffix. Anything
/// left over after those optional parts is not a match.
fn match_imux_bare(w: &str) -> bool {
    let rest = match w.strip_prefix("IMUX") {
        Some(r) => r,
        None => return false,
    };
    let rest = rest.strip_prefix("_CMT").unwrap_or(rest);
    match rest.strip_prefix("_XIPHY") {
        Some(digits) => digits1_2(digits),
        None => rest.is_empty(),
    }
}

fn match_imuxout(w: &str) -> bool {
    if let Some(rest) = w.strip_prefix("IMUXOUT") {
        return digits1_2(rest);
    }
    false
}

fn match_ctrl(w: &str) -> bool {
    for d in EW {
        if let Some(rest) = w.strip_prefix("CTRL_").and_then(|r| r.strip_prefix(d)) {
            if suffix_digit_in(rest, "0123456789") {
                return true;
            }
        }
    }
    false
}

fn match_cle_site(w: &str) -> bool {
    for fam in ["CLE_CLE_L_SITE_0_", "CLE_CLE_M_SITE_0_"] {
        if let Some(rest) = w.strip_prefix(fam) {
            let letter = &rest[..rest.len().min(1)];
            if letter.len() == 1 && ("A".."I").contains(&letter) {
                let tail = &rest[1..];
                if tail == "_O" || tail == "MUX" || tail == "Q" || tail == "Q2" {
                    return true;
                }
            }
        }
    }
    false
}

fn match_bypass(w: &str) -> bool {
    for d in EW {
        if let Some(rest) = w.strip_prefix("BYPASS_").and_then(|r| r.strip_prefix(d)) {
            if digits1_2(rest) {
                return true;
            }
        }
    }
    false
}

fn match_bounce(w: &str) -> bool {
    for d in EW {
        if let Some(rest) = w.strip_prefix("BOUNCE_").and_then(|r| r.strip_prefix(d)) {
            if let Some(rest) = rest.strip_prefix('_') {
                for ft in ["_FT0", "_FT1"] {
                    if let Some(mid) = rest.strip_suffix(ft) {
                        if digits1_2(mid) {
                            return true;
                        }
                    }
                }
            }
        }
    }
    false
}

fn match_inode_sdqnode(prefix: &str, w: &str) -> bool {
    for d in EW {
        if let Some(rest) = w.strip_prefix(prefix).and_then(|r| r.strip_prefix(d)) {
            if let Some(rest) = rest.strip_prefix('_') {
                for ft in ["_FT0", "_FT1"] {
                    if let Some(mid) = rest.strip_suffix(ft) {
                        if digits1_2(mid) {
                            return true;
                        }
                    }
                }
            }
        }
    }
    false
}

fn match_lag_mux(w: &str) -> bool {
    if let Some(rest) = w.strip_prefix("LAG_MUX_ATOM_").and_then(|r| r.strip_suffix("_TXOUT")) {
        return digits1_2(rest);
    }
    false
}

fn match_ubump(w: &str) -> bool {
    if let Some(rest) = w.strip_prefix("UBUMP") {
        return digits1_2(rest);
    }
    false
}

fn match_rxd(w: &str) -> bool {
    if let Some(rest) = w.strip_prefix("RXD") {
        return digits1_2(rest);
    }
    false
}

fn match_single_h(w: &str) -> bool {
    if w == "WW1_E_7_FT0" {
        return true;
    }
    for d in EW {
        for dd in EW {
            if let Some(rest) = w.strip_prefix(&format!("{}{}1_{}_BEG", d, dd, d)) {
                if let Ok(n) = rest.parse::<u32>() {
                    return n <= 7;
                }
            }
        }
    }
    false
}

fn match_dir_n(pfx2: [&str; 2], mid: &str, n: &str, w: &str) -> bool {
    for d in pfx2 {
        for dd in pfx2 {
            if let Some(rest) = w.strip_prefix(&format!("{}{}{}_", d, dd, mid)) {
                if let Some(rest) = rest.strip_prefix(&format!("{}_BEG", n)) {
                    if let Ok(v) = rest.parse::<u32>() {
                        return v <= 7;
                    }
                }
            }
        }
    }
    false
}

fn match_single_v(w: &str) -> bool {
    for d in NS {
        for dd in NS {
            for n in EW {
                if let Some(rest) = w.strip_prefix(&format!("{}{}1_{}_BEG", d, dd, n)) {
                    if let Ok(v) = rest.parse::<u32>() {
                        return v <= 7;
                    }
                }
            }
        }
    }
    false
}

fn match_double_h(w: &str) -> bool { match_dir_n(EW, "2", "E", w) || match_dir_n(EW, "2", "W", w) }
fn match_double_v(w: &str) -> bool { match_dir_n(NS, "2", "E", w) || match_dir_n(NS, "2", "W", w) }
fn match_quad_h(w: &str) -> bool { match_dir_n(EW, "4", "E", w) || match_dir_n(EW, "4", "W", w) }
fn match_quad_v(w: &str) -> bool { match_dir_n(NS, "4", "E", w) || match_dir_n(NS, "4", "W", w) }

fn match_long_h(w: &str) -> bool {
    for d in EW {
        for dd in EW {
            if let Some(rest) = w.strip_prefix(&format!("{}{}12_BEG", d, dd)) {
                if let Ok(v) = rest.parse::<u32>() {
                    return v <= 7;
                }
            }
        }
    }
    false
}

fn match_long_v(w: &str) -> bool {
    for d in NS {
        for dd in NS {
            if let Some(rest) = w.strip_prefix(&format!("{}{}12_BEG", d, dd)) {
                if let Ok(v) = rest.parse::<u32>() {
                    return v <= 7;
                }
            }
        }
    }
    false
}

fn match_vcc(w: &str) -> bool { w == "VCC_WIRE" }
fn match_gnd(w: &str) -> bool {
    matches!(w, "GND_WIRE1" | "GND_WIRE2" | "GND_WIRE3")
}
fn match_clk_leaf(w: &str) -> bool {
    if let Some(rest) = w.strip_prefix("CLK_LEAF_SITES_").and_then(|r| r.strip_suffix("_CLK_LEAF")) {
        return rest.len() == 1 && rest.bytes().all(|b| b.is_ascii_digit());
    }
    false
}

const PIP_TABLE: &[PipPattern] = &[
    PipPattern { matches: match_logic_outs, wirelength: 0 },
    PipPattern { matches: |w| match_int_node_out("INT_NODE_SDQ_", w), wirelength: 0 },
    PipPattern { matches: |w| match_int_node_out("INT_NODE_IMUX_", w), wirelength: 0 },
    PipPattern { matches: |w| match_int_node_out("INT_INT_SDQ_", w), wirelength: 0 },
    PipPattern { matches: |w| match_int_node_out("INT_NODE_GLOBAL_", w), wirelength: 0 },
    PipPattern { matches: match_imux_ew, wirelength: 0 },
    PipPattern { matches: match_imux_bare, wirelength: 0 },
    PipPattern { matches: match_imuxout, wirelength: 0 },
    PipPattern { matches: match_ctrl, wirelength: 0 },
    PipPattern { matches: match_cle_site, wirelength: 0 },
    PipPattern { matches: match_bypass, wirelength: 0 },
    PipPattern { matches: match_bounce, wirelength: 0 },
    PipPattern { matches: |w| match_inode_sdqnode("INODE_", w), wirelength: 0 },
    PipPattern { matches: |w| match_inode_sdqnode("SDQNODE_", w), wirelength: 0 },
    PipPattern { matches: match_lag_mux, wirelength: 0 },
    PipPattern { matches: match_ubump, wirelength: 0 },
    PipPattern { matches: match_rxd, wirelength: 0 },
    PipPattern { matches: match_single_h, wirelength: 1 },
    PipPattern { matches: match_single_v, wirelength: 1 },
    PipPattern { matches: match_double_h, wirelength: 5 },
    PipPattern { matches: match_double_v, wirelength: 3 },
    PipPattern { matches: match_quad_h, wirelength: 10 },
    PipPattern { matches: match_quad_v, wirelength: 5 },
    PipPattern { matches: match_long_h, wirelength: 14 },
    PipPattern { matches: match_long_v, wirelength: 12 },
    PipPattern { matches: match_vcc, wirelength: 0 },
    PipPattern { matches: match_gnd, wirelength: 0 },
    PipPattern { matches: match_clk_leaf, wirelength: 0 },
];

/// Wirelength for a PIP's `wire1` name inside an INT tile, or `None` if no
/// pattern recognizes it.
pub fn pip_wirelength(wire1_name: &str) -> Option<u32> {
    PIP_TABLE.iter().find(|p| (p.matches)(wire1_name)).map(|p| p.wirelength)
}

/// Tile-type roots recognized outside INT tiles (the tile's name with its
/// trailing `_X<n>Y<n>` suffix stripped).
pub const TILE_TYPES: &[&str] = &[
    "CLEL_R", "CLEM", "CLEM_R", "BRAM", "DSP", "XIPHY_BYTE_L",
    "HPIO_L", "CMT_L", "URAM_URAM_FT", "URAM_URAM_DELAY_FT", "GTY_L",
    "GTY_R", "LAG_LAG",
];

/// BEL names that drive global (clock/reset) nets, skipped during
/// wirelength analysis.
pub const GLOBAL_NET_DRIVERS: &[&str] = &["BUFCE", "BUFG_GT", "BUFG_GT_SYNC"];

/// Strip a tile name's trailing `_X<digits>Y<digits>` location suffix,
/// returning the tile-type root used to check `TILE_TYPES`.
pub fn tile_root_name(tile_name: &str) -> Option<&str> {
    let bytes = tile_name.as_bytes();
    for i in (0..bytes.len().saturating_sub(1)).rev() {
        if bytes[i] == b'_' && bytes[i + 1] == b'X' {
            let rest = &tile_name[i + 2..];
            if let Some(y_pos) = rest.find('Y') {
                let (x_part, y_and_rest) = rest.split_at(y_pos);
                if !x_part.is_empty() && x_part.bytes().all(|b| b.is_ascii_digit()) {
                    let y_part = &y_and_rest[1..];
                    if !y_part.is_empty() && y_part.bytes().all(|b| b.is_ascii_digit()) {
                        return Some(&tile_name[..i]);
                    }
                }
            }
        }
    }
    None
}

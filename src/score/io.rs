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

use std::fs;

use crate::error::ScoreError;

use super::BenchmarkResult;

fn io_err(path: &str, source: std::io::Error) -> ScoreError {
    ScoreError::Io { path: path.to_string(), source }
}

/// Read a `<prefix>.check` file. A missing file, same as the reference
/// implementation's `FileNotFoundError` handling, is treated as "did not
/// pass" rather than an error.
fn read_check(path: &str) -> Result<bool, ScoreError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents.lines().next().map(|l| l.trim_end() == "PASS").unwrap_or(false)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_err(path, e)),
    }
}

/// Read a `<prefix>.phys.log` file's last two lines for the wall-clock and
/// user-CPU runtimes the router reported. A missing file, or one that
/// doesn't carry the expected trailer, yields `(inf, inf)`.
fn read_runtime(path: &str) -> Result<(f64, f64), ScoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((f64::INFINITY, f64::INFINITY)),
        Err(e) => return Err(io_err(path, e)),
    };
    let lines: Vec<&str> = contents.lines().collect();
    if lines.len() < 2 {
        return Ok((f64::INFINITY, f64::INFINITY));
    }
    let last2 = lines[lines.len() - 2];
    let last1 = lines[lines.len() - 1];

    let wall = parse_after_prefix(last2, "Wall-clock time (sec): ");
    let user = wall.and(parse_after_prefix(last1, "User-CPU time (sec): "));
    match (wall, user) {
        (Some(w), Some(u)) => Ok((w, u)),
        (Some(w), None) => Ok((w, f64::INFINITY)),
        _ => Ok((f64::INFINITY, f64::INFINITY)),
    }
}

fn parse_after_prefix(line: &str, prefix: &str) -> Option<f64> {
    line.strip_prefix(prefix)?.trim().parse().ok()
}

/// Read a `<prefix>.wirelength` file, looking for the "Wirelength: N" line
/// the analyzer's printer emits. Missing file or missing line yields `inf`.
fn read_wirelength(path: &str) -> Result<f64, ScoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(f64::INFINITY),
        Err(e) => return Err(io_err(path, e)),
    };
    for line in contents.lines() {
        if let Some(idx) = line.find("Wirelength: ") {
            if let Some(value) = line[idx + "Wirelength: ".len()..].split_whitespace().next() {
                if let Ok(v) = value.parse() {
                    return Ok(v);
                }
            }
        }
    }
    Ok(f64::INFINITY)
}

/// Read the `.check`/`.phys.log`/`.wirelength` triple for a benchmark result
/// prefix (e.g. `my_benchmark_my_router`).
pub fn read_benchmark(prefix: &str) -> Result<BenchmarkResult, ScoreError> {
    let check_passed = read_check(&format!("{}.check", prefix))?;
    let (wall_clock_sec, user_cpu_sec) = read_runtime(&format!("{}.phys.log", prefix))?;
    let critical_path_wirelength = read_wirelength(&format!("{}.wirelength", prefix))?;
    Ok(BenchmarkResult { check_passed, wall_clock_sec, user_cpu_sec, critical_path_wirelength })
}

/// Render a results table the way `print_results_table` does: column widths
/// computed from the widest cell in each column, `|`-delimited rows, a
/// `+`-ruled border above the header, below it, and at the end.
pub fn format_results_table(rows: &[Vec<String>]) -> String {
    let num_cols = rows[0].len();
    let mut widths = vec![0usize; num_cols];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let horiz: String = widths.iter().map(|w| format!("+{}", "-".repeat(w + 2))).collect::<String>() + "+";

    let mut out = String::new();
    out.push_str(&horiz);
    out.push('\n');
    for (r, row) in rows.iter().enumerate() {
        out.push('|');
        for (i, cell) in row.iter().enumerate() {
            if i == 0 || r == 0 {
                out.push_str(&format!(" {:<width$} |", cell, width = widths[i]));
            } else {
                out.push_str(&format!(" {:>width$} |", cell, width = widths[i]));
            }
        }
        out.push('\n');
        if r == 0 {
            out.push_str(&horiz);
            out.push('\n');
        }
    }
    out.push_str(&horiz);
    out
}

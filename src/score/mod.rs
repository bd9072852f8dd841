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

pub mod io;
pub mod ranking;
#[cfg(test)]
mod tests;

/// One benchmark's scoring inputs, read from a `<prefix>.check`,
/// `<prefix>.phys.log`, `<prefix>.wirelength` triple by [`io::read_benchmark`].
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkResult {
    pub check_passed: bool,
    pub wall_clock_sec: f64,
    pub user_cpu_sec: f64,
    pub critical_path_wirelength: f64,
}

/// Combine a router's pass/fail status, runtime, and reported critical-path
/// wirelength into a single score, lower being better. A failing
/// `CheckPhysNetlist` run scores positive infinity regardless of the other
/// two inputs.
pub fn score_benchmark_results(check: bool, runtime_sec: f64, critical_path_wirelength: f64) -> f64 {
    if check {
        0.9 * runtime_sec + 0.1 * critical_path_wirelength
    } else {
        f64::INFINITY
    }
}

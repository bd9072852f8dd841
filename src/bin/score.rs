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

use std::process::ExitCode;

use clap::Parser;

use ifroute::score::{io, score_benchmark_results};

#[derive(Parser, Debug)]
#[clap(author = "Antmicro", version, about = "Compute the score achieved on a set of benchmarks by a router")]
struct Args {
    #[clap(required = true, value_name = "<benchmark name>_<router name>", help = "list of data file prefixes")]
    benchmarks: Vec<String>,
}

fn run(args: Args) -> Result<(), String> {
    let mut rows = vec![vec![
        "Benchmark".to_string(),
        "Pass".to_string(),
        "User CPU (sec)".to_string(),
        "Wall Clock (sec)".to_string(),
        "Critical-Path Wirelength".to_string(),
        "Score".to_string(),
    ]];

    for benchmark in &args.benchmarks {
        let result = io::read_benchmark(benchmark).map_err(|e| e.to_string())?;
        let score = score_benchmark_results(result.check_passed, result.wall_clock_sec, result.critical_path_wirelength);
        rows.push(vec![
            benchmark.clone(),
            result.check_passed.to_string(),
            format!("{:.2}", result.user_cpu_sec),
            format!("{:.2}", result.wall_clock_sec),
            format!("{:.0}", result.critical_path_wirelength),
            format!("{:.2}", score),
        ]);
    }

    println!("{}", io::format_results_table(&rows));
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

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

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use ifroute::analyzer::{join, longest_path, print, tree, PlacementMap};
use ifroute::ic_loader::{self, MsgReader, OpenOpts};
use ifroute::warn_log;
use ifroute::strtab::StringTable;

#[derive(clap::ArgEnum, Clone, Copy, Debug, PartialEq)]
enum Mode {
    Lsn,
    Cp,
    Both,
}

#[derive(Parser, Debug)]
#[clap(author = "Antmicro", version, about = "Compute the longest wirelength in a routed FPGA Interchange physical netlist")]
struct Args {
    #[clap(help = "routed physical netlist to process")]
    routed: String,
    #[clap(short, long, default_value_t = 1, help = "output verbosity level (0, 1, 2)")]
    verbosity: u32,
    #[clap(long, arg_enum, default_value_t = Mode::Cp, help = "which path(s) to compute")]
    mode: Mode,
    #[clap(long, help = "also print Vivado Tcl report_timing/select_objects commands for the printed path")]
    tcl: bool,
}

fn run(args: Args) -> Result<(), String> {
    let netlist_msg = ic_loader::open(Path::new(&args.routed), OpenOpts { raw: false }).map_err(|e| e.to_string())?;
    let netlist = netlist_msg.get_phys_netlist_root().map_err(|e| e.to_string())?;
    let strs = StringTable::new(netlist.get_str_list().map_err(|e| e.to_string())?);
    let placements = PlacementMap::build(&netlist).map_err(|e| e.to_string())?;

    let (mut graph, nets_with_stubs, nets_with_multiple_sources) =
        tree::add_all_nets_to_graph(&netlist, &strs).map_err(|e| e.to_string())?;
    if nets_with_stubs > 0 {
        warn_log!("{} signal net(s) have unrouted stubs", nets_with_stubs);
    }
    if nets_with_multiple_sources > 0 {
        warn_log!("{} signal net(s) have multiple sources", nets_with_multiple_sources);
    }

    if matches!(args.mode, Mode::Lsn | Mode::Both) {
        if args.verbosity > 0 {
            println!();
            println!("Finding Longest Single Net:");
        }
        let path = longest_path::find_longest_path(&graph, &placements, &strs).map_err(|e| e.to_string())?;
        let net_name = print::net_name_for(&graph, &netlist, &strs, path[0]);
        let path_name = format!("Longest Single Net ({})", net_name);
        let (length, cells_on_path) =
            print::pretty_print_path(&graph, &placements, &netlist, &strs, &path, &path_name, args.verbosity);
        let _ = length;
        if args.tcl && args.verbosity >= 1 && !cells_on_path.is_empty() {
            println!();
            for cmd in print::vivado_timing_commands(&cells_on_path) {
                println!("{}", cmd);
                println!();
            }
        }
    }

    if matches!(args.mode, Mode::Cp | Mode::Both) {
        if args.verbosity > 0 {
            println!();
            println!("Finding Critical Path:");
        }
        join::join_nets(&mut graph, &placements, &strs).map_err(|e| e.to_string())?;
        let path = longest_path::find_longest_path(&graph, &placements, &strs).map_err(|e| e.to_string())?;
        let (length, cells_on_path) =
            print::pretty_print_path(&graph, &placements, &netlist, &strs, &path, "Critical Path", args.verbosity);
        let _ = length;
        if args.tcl && args.verbosity >= 1 && !cells_on_path.is_empty() {
            println!();
            for cmd in print::vivado_timing_commands(&cells_on_path) {
                println!("{}", cmd);
                println!();
            }
        }
    }

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

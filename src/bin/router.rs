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
use std::time::Instant;

use clap::Parser;

use ifroute::common::peak_memory_kb;
use ifroute::ic_loader::{self, MsgReader, OpenOpts};
use ifroute::router::builder::RegionBounds;
use ifroute::router::{builder, prepare, route, write};
use ifroute::strtab::StringTable;

/// Device file to route against. The reference implementation hard-codes
/// `xcvu3p.device` rather than accepting it on the command line; this crate
/// keeps that (documented in DESIGN.md) since spec.md's CLI surface table
/// lists only the two netlist positionals for `router`.
const DEVICE_FILE: &str = "xcvu3p.device";

#[derive(Parser, Debug)]
#[clap(author = "Antmicro", version, about = "Route an unrouted FPGA Interchange physical netlist")]
struct Args {
    #[clap(help = "unrouted physical netlist (FIF, optionally gzipped)")]
    unrouted: String,
    #[clap(help = "path to write the routed physical netlist to")]
    routed: String,
}

fn run(args: Args) -> Result<(), String> {
    println!("Reading device...");
    let t0 = Instant::now();
    let device_msg = ic_loader::open(Path::new(DEVICE_FILE), OpenOpts { raw: false })
        .map_err(|e| e.to_string())?;
    let device = device_msg.get_archdef_root().map_err(|e| e.to_string())?;
    println!("Read device in {:.2}s", t0.elapsed().as_secs_f64());

    println!("Building routing graph...");
    let t0 = Instant::now();
    let bounds = RegionBounds::default();
    let mut graph = builder::build(&device, &bounds).map_err(|e| e.to_string())?;
    println!(
        "Built routing graph ({} nodes, {} edges) in {:.2}s",
        graph.num_nodes(),
        graph.num_edges(),
        t0.elapsed().as_secs_f64()
    );

    let netlist_msg = ic_loader::open(Path::new(&args.unrouted), OpenOpts { raw: false })
        .map_err(|e| e.to_string())?;
    let netlist = netlist_msg.get_phys_netlist_root().map_err(|e| e.to_string())?;
    let netlist_strs = StringTable::new(netlist.get_str_list().map_err(|e| e.to_string())?);

    println!("Preparing nets...");
    let t0 = Instant::now();
    let nets = prepare::prepare(&mut graph, &netlist, &netlist_strs).map_err(|e| e.to_string())?;
    println!("Prepared {} nets in {:.2}s", nets.len(), t0.elapsed().as_secs_f64());

    println!("Routing...");
    let t0 = Instant::now();
    route::route(&mut graph, &nets, &netlist_strs);
    println!("Routed {} nets in {:.2}s", nets.len(), t0.elapsed().as_secs_f64());

    write::write(&graph, netlist, &nets, &netlist_strs, phys_netlist_compression_level(), Path::new(&args.routed))
        .map_err(|e| e.to_string())?;

    if let Some(kb) = peak_memory_kb() {
        println!("Peak memory: {} KB", kb);
    }
    Ok(())
}

fn phys_netlist_compression_level() -> u32 {
    ifroute::ic_loader::phys_netlist::CPNP_DEFAULT_COMPRESSION_LEVEL
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

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

use ifroute::ic_loader::{self, MsgReader, OpenOpts};
use ifroute::net_printer::print_nets;
use ifroute::strtab::StringTable;

#[derive(Parser, Debug)]
#[clap(author = "Antmicro", version, about = "Print nets as they appear in a physical netlist file")]
struct Args {
    #[clap(help = "physical netlist to process")]
    physical_netlist: String,
    #[clap(required = true, help = "list of net names to print")]
    nets: Vec<String>,
}

fn run(args: Args) -> Result<(), String> {
    let netlist_msg = ic_loader::open(Path::new(&args.physical_netlist), OpenOpts { raw: false })
        .map_err(|e| e.to_string())?;
    let netlist = netlist_msg.get_phys_netlist_root().map_err(|e| e.to_string())?;
    let strs = StringTable::new(netlist.get_str_list().map_err(|e| e.to_string())?);
    print_nets(&netlist, &strs, &args.nets).map_err(|e| e.to_string())
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

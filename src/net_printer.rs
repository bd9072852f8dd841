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

use crate::error::AnalyzerError;
use crate::ic_loader::phys_netlist::{Root as Netlist, RouteBranchReader};
use crate::ic_loader::PhysicalNetlist_capnp::route_branch;
use crate::strtab::StringTable;

/// Recursively render one route tree, indenting every level and bracketing
/// the first child of a multi-branch node (the "trunk") differently from
/// later children so the tree's shape is visible in plain text. Ported from
/// `net_printer`.
fn print_branch(
    netlist: &Netlist<'_>,
    strs: &StringTable,
    branch: RouteBranchReader<'_>,
    first: bool,
    trunk: bool,
) -> Result<(), AnalyzerError> {
    let mut prefix = String::from("    ");
    prefix.push_str(if first { if trunk { "[{" } else { " {" } } else { "  " });
    prefix.push_str("   ");
    let branches = branch.get_branches()?;
    if branches.len() == 0 {
        prefix.push_str(if trunk { "}] " } else { "}  " });
    } else {
        prefix.push_str("   ");
    }
    print!("{}", prefix);

    let seg = branch.get_route_segment();
    match seg.which()? {
        route_branch::route_segment::Which::BelPin(bp) => {
            let bp = bp?;
            println!(
                "{:<7} {} {} {}",
                "belPin",
                strs.get(bp.get_site()),
                strs.get(bp.get_bel()),
                strs.get(bp.get_pin())
            );
        }
        route_branch::route_segment::Which::SitePin(sp) => {
            let sp = sp?;
            println!("{:<7} {} {}", "sitePin", strs.get(sp.get_site()), strs.get(sp.get_pin()));
        }
        route_branch::route_segment::Which::Pip(pip) => {
            let pip = pip?;
            println!(
                "{:<7} {} {} {} {} {}",
                "pip",
                strs.get(pip.get_tile()),
                strs.get(pip.get_wire0()),
                strs.get(pip.get_wire1()),
                pip.get_forward(),
                pip.get_is_fixed()
            );
        }
        route_branch::route_segment::Which::SitePIP(sp) => {
            let sp = sp?;
            println!(
                "{:<7} {} {} {} {}",
                "sitePIP",
                strs.get(sp.get_site()),
                strs.get(sp.get_bel()),
                strs.get(sp.get_pin()),
                sp.get_is_fixed()
            );
        }
    }

    if branches.len() >= 2 {
        for b in branches.iter().skip(1) {
            print_branch(netlist, strs, b, true, false)?;
        }
    }
    if branches.len() > 0 {
        print_branch(netlist, strs, branches.get(0), false, trunk)?;
    }
    Ok(())
}

/// Print the route tree for every net in `to_print`, in the order they
/// appear in the netlist, skipping names that don't match any net.
pub fn print_nets(netlist: &Netlist<'_>, strs: &StringTable, to_print: &[String]) -> Result<(), AnalyzerError> {
    let mut first = true;
    for net in netlist.get_phys_nets()?.iter() {
        let name = strs.get(net.get_name());
        if !to_print.iter().any(|n| n == name) {
            continue;
        }
        if first {
            println!("============================================================");
            first = false;
        }
        println!("Route tree for net: {}", name);
        let sources = net.get_sources()?;
        for (i, s) in sources.iter().enumerate() {
            println!();
            println!("    Source: {}", i);
            print_branch(netlist, strs, s, true, true)?;
        }
        let stubs = net.get_stubs()?;
        for (i, s) in stubs.iter().enumerate() {
            println!();
            println!("    Stub: {}", i);
            print_branch(netlist, strs, s, true, true)?;
        }
        println!("============================================================");
    }
    Ok(())
}

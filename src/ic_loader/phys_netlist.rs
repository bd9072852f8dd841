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

use std::fs::File;
use std::path::Path;
use std::io::BufWriter;
use capnp;
use flate2;
use flate2::Compression;
use flate2::write::GzEncoder;

use super::*;

pub type NetlistBuilder = capnp::message::TypedBuilder<
    PhysicalNetlist_capnp::phys_netlist::Owned
>;
pub type Root<'a> = PhysicalNetlist_capnp::phys_netlist::Reader<'a>;
pub type Builder<'a> = PhysicalNetlist_capnp::phys_netlist::Builder<'a>;
pub type PhysNetReader<'a> = PhysicalNetlist_capnp::phys_net::Reader<'a>;
pub type PhysNetBuilder<'a> = PhysicalNetlist_capnp::phys_net::Builder<'a>;
pub type RouteBranchReader<'a> = PhysicalNetlist_capnp::route_branch::Reader<'a>;
pub type RouteBranchBuilder<'a> = PhysicalNetlist_capnp::route_branch::Builder<'a>;
pub type PlacementReader<'a> = PhysicalNetlist_capnp::cell_placement::Reader<'a>;

pub const CPNP_DEFAULT_COMPRESSION_LEVEL: u32 = 6;

pub fn make_builder<'a>(root: Root<'a>) -> NetlistBuilder {
    let mut builder = NetlistBuilder::new_default();
    builder.set_root(root.clone()).unwrap();
    builder
}

/// Write a physical netlist, always gzip-compressed: every consumer of this
/// tool's output (Vivado, the scoring harness) expects a compressed stream,
/// unlike device files where a decompressed RAW file is a legitimate,
/// faster-to-load input.
pub fn write<P>(path: P, builder: NetlistBuilder, compression_level: u32)
    -> Result<(), OpenWriteError> where P: AsRef<Path>
{
    let netlist_file = File::create(path)
        .map_err(|e| OpenWriteError::CantOpenFile(format!("{:?}", e)))?;

    let e = BufWriter::new(GzEncoder::new(netlist_file, Compression::new(compression_level)));
    capnp::serialize::write_message(e, &builder.into_inner())
        .map_err(|e| OpenWriteError::CapnProtoError(format!("failed to write netlist, {:?}", e)))?;

    Ok(())
}

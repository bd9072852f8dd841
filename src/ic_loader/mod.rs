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


#[allow(non_snake_case, warnings)]
pub mod References_capnp {
    include_interchange_capnp!("References_capnp.rs");
}

#[allow(non_snake_case, warnings)]
pub mod DeviceResources_capnp {
    include_interchange_capnp!("DeviceResources_capnp.rs");
}

#[allow(non_snake_case, warnings)]
pub mod LogicalNetlist_capnp {
    include_interchange_capnp!("LogicalNetlist_capnp.rs");
}

#[allow(non_snake_case, warnings)]
pub mod PhysicalNetlist_capnp {
    include_interchange_capnp!("PhysicalNetlist_capnp.rs");
}

use std::path::Path;
use std::fs::File;
use std::io::{BufReader, Read};
use memmap2::Mmap;
use flate2::read::GzDecoder;

#[derive(Debug, Clone)]
pub enum OpenWriteError {
    CantOpenFile(String),
    CapnProtoError(String)
}

impl std::fmt::Display for OpenWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CantOpenFile(s) => write!(f, "cannot open file: {}", s),
            Self::CapnProtoError(s) => write!(f, "cap'n proto error: {}", s),
        }
    }
}

/// Gzip magic bytes. Device and netlist files in the wild are usually
/// gzip-compressed, but benchmark harnesses sometimes hand us a raw capnp
/// message directly; sniff the first two bytes rather than trusting a file
/// extension or a CLI flag.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

fn is_gzip<P: AsRef<Path>>(path: P) -> Result<bool, OpenWriteError> {
    let mut f = File::open(&path)
        .map_err(|e| OpenWriteError::CantOpenFile(format!("{:?}", e)))?;
    let mut magic = [0u8; 2];
    match f.read_exact(&mut magic) {
        Ok(()) => Ok(magic == GZIP_MAGIC),
        Err(_) => Ok(false), /* file shorter than 2 bytes: definitely not gzip */
    }
}

const CPNP_MSG_MAXSIZE: usize = usize::MAX; // 4GiB

pub struct OpenOpts {
    pub raw: bool,
}

impl Default for OpenOpts {
    fn default() -> Self {
        Self {
            raw: false
        }
    }
}

pub trait MsgReader {
    /* This is dumb, but GATs are STILL unstable (seriously???) */
    fn get_archdef_root<'a>(&'a self) -> Result<archdef::Root<'a>, capnp::Error>;
    fn get_phys_netlist_root<'a>(&'a self) -> Result<phys_netlist::Root<'a>, capnp::Error>;
}

impl<S> MsgReader for capnp::message::Reader<S> where
    S: capnp::message::ReaderSegments
{
    fn get_archdef_root<'a>(&'a self) -> Result<archdef::Root<'a>, capnp::Error> {
        self.get_root::<archdef::Root<'a>>()
    }

    fn get_phys_netlist_root<'a>(&'a self) -> Result<phys_netlist::Root<'a>, capnp::Error> {
        self.get_root::<phys_netlist::Root<'a>>()
    }
}

/// Open any FIF message file, auto-detecting whether it is gzip-compressed
/// by sniffing the file's first two bytes rather than trusting `opts.raw`
/// alone. `opts.raw` remains available to force memory-mapped loading of a
/// file that is known ahead of time to already be decompressed on disk.
pub fn open<P>(path: P, opts: OpenOpts) -> Result<Box<dyn MsgReader>, OpenWriteError> where
    P: AsRef<Path>,

{
    let path = path.as_ref();
    let gzipped = is_gzip(path)?;
    let file = File::open(path)
        .map_err(|e| OpenWriteError::CantOpenFile(format!("{:?}", e)))?;

    let reader_opts = capnp::message::ReaderOptions {
        traversal_limit_in_words: Some(CPNP_MSG_MAXSIZE),
        .. capnp::message::DEFAULT_READER_OPTIONS
    };

    /* RAW mode uses memory mapping and is highly recommended over GZIP for debug builds
     * due to much faster load times.
     * For realease builds, loading a gzipped file doesn't seem to take noticeably longer
     * than using memory-mapped files.
     *
     * IMPORTANT: In order to use RAW mode, you must decompress the fpga-interchange
     * device file using gzip.
     */
    let reader: Box<dyn MsgReader> = if opts.raw && !gzipped {
        /* UNSAFE DUE TO A POTENTIAL UB WHEN A FILE IS CHANGED! */
        let mmapped = unsafe { Mmap::map(&file) }
            .map_err(|e| OpenWriteError::CantOpenFile(format!("mmap failed: {:?}", e)))?;
        let segments = capnp::serialize::BufferSegments::new(mmapped, reader_opts)
            .map_err(|e| OpenWriteError::CapnProtoError(format!("failed to create buffer segments: {:?}", e)))?;
        Box::new(capnp::message::Reader::new(segments, reader_opts))
    } else if gzipped {
        let d = BufReader::new(GzDecoder::new(file));

        let reader = capnp::serialize::read_message(d, reader_opts)
            .map_err(|e| OpenWriteError::CapnProtoError(format!("{:?}", e)))?;
        Box::new(reader)
    } else {
        let d = BufReader::new(file);
        let reader = capnp::serialize::read_message(d, reader_opts)
            .map_err(|e| OpenWriteError::CapnProtoError(format!("{:?}", e)))?;
        Box::new(reader)
    };

    Ok(reader)
}

pub mod archdef;
pub mod phys_netlist;

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

use thiserror::Error;

/// Errors that stop the router outright. Anything that can be worked around
/// (an unroutable pin, a net with no sources) is logged through `warn_log!`
/// instead and the run continues.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("could not open device resources file: {0}")]
    OpenDevice(#[source] crate::ic_loader::OpenWriteError),
    #[error("could not open physical netlist file: {0}")]
    OpenNetlist(#[source] crate::ic_loader::OpenWriteError),
    #[error("could not write routed netlist: {0}")]
    WriteNetlist(#[source] crate::ic_loader::OpenWriteError),
    #[error("malformed physical netlist: {0}")]
    MalformedNetlist(String),
    #[error("capnp error: {0}")]
    Capnp(#[from] capnp::Error),
}

/// Errors raised while walking a device-data catalogue lookup for the
/// analyzer. `UnknownCellType`/`UnknownBel` carry the offending name so the
/// caller can print a diagnostic listing of everything it failed to resolve,
/// rather than bailing at the first miss.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("could not open physical netlist file: {0}")]
    OpenNetlist(#[source] crate::ic_loader::OpenWriteError),
    #[error("malformed physical netlist: {0}")]
    MalformedNetlist(String),
    #[error("no cell-connectivity data for cell type {0:?}")]
    UnknownCellType(String),
    #[error("no wirelength data for pip pattern {0:?}")]
    UnknownPipPattern(String),
    #[error("unrecognized tile on pip: {tile}, {wire0}, {wire1}")]
    UnknownTile { tile: String, wire0: String, wire1: String },
    #[error("requested net {0:?} not present in design")]
    NetNotFound(String),
    #[error("net {0:?} forms a cycle, cannot compute longest path")]
    Cyclic(String),
    #[error("capnp error: {0}")]
    Capnp(#[from] capnp::Error),
}

/// Errors raised by the scoring/ranking tool while reading benchmark result
/// files.
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed result file {path}: {reason}")]
    Malformed { path: String, reason: String },
}

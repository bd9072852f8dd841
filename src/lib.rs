#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde;

#[macro_use]
pub mod include_path;
#[macro_use]
pub mod log;
pub mod common;
pub mod error;
pub mod strtab;
pub mod ic_loader;
pub mod router;
pub mod analyzer;
pub mod net_printer;
pub mod score;


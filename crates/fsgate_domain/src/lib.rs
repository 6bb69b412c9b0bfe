mod config;
mod constants;
mod download;
mod error;
mod file;
mod hash;

pub use config::*;
pub use constants::*;
pub use download::*;
pub use error::*;
pub use file::*;
pub use hash::*;

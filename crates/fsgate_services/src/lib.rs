mod constants;
mod dir_list;
mod download;
mod error;
mod file_ops;
mod fsgate_services;
mod hash;
mod log;
mod path;

#[cfg(test)]
pub mod test_fixtures;

pub use constants::*;
pub use dir_list::*;
pub use download::*;
pub use file_ops::*;
pub use fsgate_services::*;
pub use hash::*;
pub use log::*;
pub use path::*;

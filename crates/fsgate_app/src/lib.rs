mod download;
mod infra;
pub mod path;
mod services;
pub mod transcode;

pub use download::*;
pub use infra::*;
pub use services::*;

pub mod domain {
    pub use fsgate_domain::*;
}

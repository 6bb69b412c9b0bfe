mod assets;
mod env;
mod fs_create_dirs;
mod fs_hash;
mod fs_meta;
mod fs_read;
mod fs_read_dir;
mod fs_remove;
mod fs_transfer;
mod fs_write;
mod fsgate_infra;
mod http;

pub use env::FsGateEnvironmentInfra;
pub use fsgate_infra::*;
pub use http::FsGateHttpInfra;

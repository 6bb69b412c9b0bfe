mod fsgate_api;

pub use fsgate_api::*;
pub use fsgate_app::{DownloadHandle, NativeFileService};
pub use fsgate_domain::*;
pub use fsgate_services::init_tracing;

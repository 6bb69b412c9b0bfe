use std::io::ErrorKind;
use std::path::Path;

use fsgate_domain::{Error, is_io_kind};

/// Replaces a provider "not found" failure with the facade's `NotFound`.
pub(crate) fn not_found_for(path: &Path) -> impl FnOnce(anyhow::Error) -> anyhow::Error + '_ {
    move |err| {
        if is_io_kind(&err, ErrorKind::NotFound) {
            Error::NotFound(path.to_path_buf()).into()
        } else {
            err
        }
    }
}

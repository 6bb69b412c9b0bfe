use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::Error;

/// Digest algorithms the hash engine accepts. Any other name is rejected
/// before the provider is consulted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    pub fn parse(name: &str) -> Result<Self, Error> {
        Self::from_str(name)
            .map_err(|_| Error::InvalidArgument(format!("Invalid hash algorithm: {name}")))
    }
}

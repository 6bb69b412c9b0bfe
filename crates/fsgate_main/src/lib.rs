mod cli;
mod run;

pub use cli::{Cli, Command, DownloadArgs, WriteArgs};
pub use run::execute;

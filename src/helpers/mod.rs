//! General useful bits and bobs

use super::*;

mod config;
mod filesystem;
mod metronome;
mod or_log;
mod panic_message;
#[cfg(test)]
mod test_helpers;
mod thin_ptr;

pub use config::{build_config, config_help, MasterConfig, OutputFormat};
pub use filesystem::{real_filesystem, Filesystem, FilesystemTrait};
pub use metronome::Metronome;
pub use or_log::OrLog;
pub use panic_message::panic_message;
#[cfg(test)]
pub use test_helpers::*;
pub use thin_ptr::ThinPtr;

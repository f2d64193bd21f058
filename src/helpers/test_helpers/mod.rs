use super::*;

use std::{
    collections::HashMap,
    sync::mpsc::RecvTimeoutError::{Disconnected, Timeout},
    thread,
};

mod mock_callback;
mod mock_filesystem;
mod run_with_timeout;

pub use mock_callback::*;
pub use mock_filesystem::*;
pub use run_with_timeout::*;

//! Multicast callbacks: ordered callback lists, the periodic emitter that fires them, and the
//! subscribers that count them

use super::*;

mod callback;
mod callback_list;
mod emitter;
mod invoke_error;
mod property;
mod stopwatch;
mod tick_event;

pub use callback::{callback_fn, Callback, CallbackResult};
pub use callback_list::{AddReport, CallbackKey, CallbackList, RemoveReport};
pub use emitter::{Emitter, EmitterConfig, EmitterError};
pub use invoke_error::{CallbackError, CallbackFailure, InvokeError};
pub use property::{Property, PropertyChanged, PropertyId};
pub use stopwatch::Stopwatch;
pub use tick_event::TickEvent;

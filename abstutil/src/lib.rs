//! Utilities shared by the other crates in the workspace: counting, phase timing, and logger
//! setup.

#[macro_use]
extern crate log;

mod collections;
pub mod logger;
mod time;

pub use crate::collections::Counter;
pub use crate::time::{prettyprint_usize, Timer};


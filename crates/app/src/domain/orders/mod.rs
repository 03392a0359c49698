//! Orders

pub mod errors;
pub mod mirror;
pub mod recorder;

pub use errors::{MirrorError, OrderError};
pub use mirror::*;
pub use recorder::*;

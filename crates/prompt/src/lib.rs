//! Prompt assembly: pure transformations from an aggregated snapshot to
//! the single text payload sent to the model.  No I/O happens here.

pub mod composer;
pub mod format;
pub mod preamble;

pub use composer::compose;
pub use preamble::{ACKNOWLEDGMENT, SYSTEM_PREAMBLE};

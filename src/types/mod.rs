//! Core types for Socrates.

pub mod completion;
pub mod message;
pub mod usage;

pub use completion::*;
pub use message::*;
pub use usage::*;

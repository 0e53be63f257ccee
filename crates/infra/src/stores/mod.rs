//! Store implementations.

pub mod in_memory;
pub mod postgres;

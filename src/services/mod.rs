//! Request-level operations over a [`Store`](crate::Store).
//!
//! Each function is one independent unit of work. Handlers pass the current
//! instant and random source in, so tests can pin both.

pub mod farms;
pub mod readings;
pub mod sensors;

//! External HTTP boundary

pub mod api;

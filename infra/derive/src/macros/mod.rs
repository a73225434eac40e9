pub mod api;
pub mod error;
pub mod grid;
pub mod runtime;
pub mod slice;

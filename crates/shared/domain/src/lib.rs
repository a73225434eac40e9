//! # Domain Models
//!
//! Register DTOs mirrored from the backend, typed configuration, the grid row model and the
//! feature slice registry. Keep it lean: no I/O or networking, just data and simple helpers.

extern crate self as ctn_domain;

pub mod config;
pub mod constants;
pub mod grid;
pub mod models;
pub mod registry;

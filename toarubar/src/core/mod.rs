//! Core types shared by every other part of the crate.

pub mod types;

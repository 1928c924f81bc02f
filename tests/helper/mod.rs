//! Shared test utilities

#![allow(dead_code)]

pub mod effects;

pub use effects::*;

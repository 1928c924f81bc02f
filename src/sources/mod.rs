//! Required version sources

pub mod http;

pub use http::{HttpVersionSource, StaticVersionSource};

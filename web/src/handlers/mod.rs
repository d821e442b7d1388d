//! HTTP request handlers.

pub mod meta;
pub mod stocks;

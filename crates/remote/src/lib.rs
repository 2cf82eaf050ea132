//! HTTP transport for category insights.

pub mod client;

pub use client::{ClientBuildError, HttpInsightClient};

//! HTTP transport with retry and timeout policy

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};

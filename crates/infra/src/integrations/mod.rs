//! External service integrations

pub mod chonkie;

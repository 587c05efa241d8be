pub mod analysis;
pub mod config;
pub mod models;
pub mod parser;
pub mod profile;
pub mod prompt;
pub mod report;
pub mod session;
pub mod text;

/// Application name for XDG paths
pub const APP_NAME: &str = "rewind";

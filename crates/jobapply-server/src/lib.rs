pub mod api;
pub mod app;
pub mod cli;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod signals;
pub mod state;
pub mod web;

/// Service identifier reported by the health probe
pub const SERVICE_NAME: &str = "job-application-system";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_DESCRIPTION: &str = "AI-powered automated job application system";
pub const API_MESSAGE: &str = "Job Application System API";

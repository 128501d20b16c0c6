// Main library entry point for Roxas.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

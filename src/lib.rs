// Main library entry point for uninitc.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

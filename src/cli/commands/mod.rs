pub mod config;
pub mod demo;

pub use config::{ConfigCommand, config_command};
pub use demo::{DemoCommand, demo_command};

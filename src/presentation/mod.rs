// Presentation layer - Command line and handlers
pub mod app_state;
pub mod cli;
pub mod handlers;

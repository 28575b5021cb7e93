// Infrastructure layer - File system, configuration and manifest adapters
pub mod config;
pub mod fs_store;
pub mod manifest;

// Application layer - Use cases over the dashboard model and chart sync
pub mod asset_store;
pub mod builders;
pub mod dashboard_service;
pub mod sync_service;

// Domain layer - Dashboard model and chart sync rules
pub mod chart;
pub mod color;
pub mod dashboard;
pub mod panel;
pub mod target;
pub mod template;

// Dashboard catalog - one module per Kubernetes dashboard
mod capacity_planning;
mod cluster_health;
mod cluster_status;
mod control_plane_status;
mod deployment;
mod nodes;
mod pods;
mod resource_requests;
mod statefulset;

use crate::domain::color::{Rgba, GREEN, ORANGE, RED};
use crate::domain::dashboard::DashboardAsset;
use crate::domain::panel::{RangeMap, SingleStat, ValueMap};

/// Colours for stats where a higher value is healthier.
pub(crate) const RED_TO_GREEN: [Rgba; 3] = [RED, ORANGE, GREEN];

/// Show `text` for a missing value and `N/A` for a missing range.
pub(crate) fn null_as(stat: SingleStat, text: &str) -> SingleStat {
    stat.value_maps(vec![ValueMap::null_as(text)])
        .range_maps(vec![RangeMap::null_as("N/A")])
}

/// Every dashboard shipped with the project, in rendering order.
pub fn catalog() -> Vec<DashboardAsset> {
    vec![
        DashboardAsset::new("deployment-dashboard.json", deployment::build()),
        DashboardAsset::new(
            "kubernetes-capacity-planning-dashboard.json",
            capacity_planning::build(),
        ),
        DashboardAsset::new(
            "kubernetes-cluster-health-dashboard.json",
            cluster_health::build(),
        ),
        DashboardAsset::new(
            "kubernetes-cluster-status-dashboard.json",
            cluster_status::build(),
        ),
        DashboardAsset::new(
            "kubernetes-control-plane-status-dashboard.json",
            control_plane_status::build(),
        ),
        DashboardAsset::new(
            "kubernetes-resource-requests-dashboard.json",
            resource_requests::build(),
        ),
        DashboardAsset::new("nodes-dashboard.json", nodes::build()),
        DashboardAsset::new("pods-dashboard.json", pods::build()),
        DashboardAsset::new("statefulset-dashboard.json", statefulset::build()),
    ]
}

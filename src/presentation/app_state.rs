// Application state shared by command handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::sync_service::SyncService;
use crate::dashboards::catalog;
use crate::infrastructure::fs_store::FsStore;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub sync_service: SyncService,
}

impl AppState {
    /// Wire both services to a file-system store rooted at `root`.
    pub fn new(root: PathBuf) -> Self {
        let store = Arc::new(FsStore::new(root));
        Self {
            dashboard_service: DashboardService::new(store.clone(), catalog()),
            sync_service: SyncService::new(store),
        }
    }
}

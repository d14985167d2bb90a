use std::sync::Arc;

use axum::Router;

use crate::api::ApiState;

/// A service's routes plus where they get mounted. A base path of `/` merges
/// the routes at the root instead of nesting them.
pub struct ResourceServiceRouter {
    pub name: String,
    pub base_path: String,
    pub router: Router<Arc<ApiState>>,
}

pub trait ResourceService {
    fn create_router(state: Arc<ApiState>) -> ResourceServiceRouter;
}

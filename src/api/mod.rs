pub mod error;
pub mod events;
pub mod inventory;
pub mod machine;
pub mod resource_service;

use std::{future::Future, sync::Arc};

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    api::resource_service::{ResourceService, ResourceServiceRouter},
    events::EventSettings,
    inventory::Inventory,
    registry::Registry,
};

pub struct ApiState {
    pub registry: Arc<Registry>,
    pub inventory: Arc<Inventory>,
    pub events: EventSettings,
}

#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    pub host: String,
    pub port: u16,
}

pub struct ApiServer {
    state: Arc<ApiState>,
    config: ApiServerConfig,
    routers: Vec<ResourceServiceRouter>,
}

impl ApiServer {
    pub fn new(
        registry: Arc<Registry>,
        inventory: Arc<Inventory>,
        events: EventSettings,
        config: ApiServerConfig,
    ) -> Self {
        Self {
            state: Arc::new(ApiState {
                registry,
                inventory,
                events,
            }),
            config,
            routers: vec![],
        }
    }

    pub fn add_service<R: ResourceService>(mut self) -> Self {
        let router = R::create_router(self.state.clone());
        self.routers.push(router);
        self
    }

    pub fn into_router(self) -> Router {
        let mut app = Router::new();

        for router in self.routers {
            info!("adding service {} at {}", router.name, router.base_path);
            app = if router.base_path == "/" {
                app.merge(router.router)
            } else {
                app.nest(&router.base_path, router.router)
            };
        }

        app.with_state(self.state)
    }

    pub async fn start(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let app = self.into_router();

        info!("starting api server on {}", addr);
        let listener = TcpListener::bind(addr).await?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("api server stopped");
        Ok(())
    }
}

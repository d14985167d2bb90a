use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{
        ApiState,
        error::{ApiError, ApiJson, ApiPath},
        resource_service::{ResourceService, ResourceServiceRouter},
    },
    registry::{VmRecord, spec::VmSpecRequest},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartVmResponse {
    pub id: String,
}

pub struct VmService {}

impl ResourceService for VmService {
    fn create_router(_state: Arc<ApiState>) -> ResourceServiceRouter {
        async fn start(
            State(state): State<Arc<ApiState>>,
            ApiJson(request): ApiJson<VmSpecRequest>,
        ) -> Response {
            match state.registry.start(&request) {
                Ok(id) => (StatusCode::OK, Json(StartVmResponse { id })).into_response(),
                Err(e) => ApiError::from(e).into_response(),
            }
        }

        async fn stop(
            State(state): State<Arc<ApiState>>,
            ApiPath(id): ApiPath<String>,
        ) -> Result<Json<VmRecord>, ApiError> {
            let record = state.registry.stop(id)?;
            Ok(Json(record))
        }

        let mut router = Router::new();
        router = router.route("/start", post(start));
        router = router.route("/{id}/stop", post(stop));

        ResourceServiceRouter {
            name: "Vm".to_string(),
            base_path: "/vm".to_string(),
            router,
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::test_utils::{send_json, test_router, test_state};

    #[tokio::test]
    async fn test_start_stop_round_trip() {
        let (registry, inventory) = test_state();
        let app = test_router(registry.clone(), inventory);
        let spec = json!({"cpu_count": 2, "mem_size_gb": 32, "image": "ubuntu-24.04"});

        let (status, body) = send_json(&app, "POST", "/vm/start", Some(spec.clone())).await;
        assert_eq!(status, StatusCode::OK);
        let id = body["id"].as_str().expect("id should be a string").to_string();
        assert_eq!(id.len(), 32);
        assert_eq!(registry.len(), 1);

        let (status, body) = send_json(&app, "POST", &format!("/vm/{id}/stop"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"id": id, "spec": spec}));
        assert!(registry.is_empty());

        let (status, body) = send_json(&app, "POST", &format!("/vm/{id}/stop"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "VM not found"}));
    }

    #[tokio::test]
    async fn test_rejects_zero_cpus() {
        let (registry, inventory) = test_state();
        let app = test_router(registry.clone(), inventory);

        let (status, body) = send_json(
            &app,
            "POST",
            "/vm/start",
            Some(json!({"cpu_count": 0, "mem_size_gb": 32, "image": "ubuntu-24.04"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["field"], "cpu_count");
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_unsupported_image() {
        let (registry, inventory) = test_state();
        let app = test_router(registry.clone(), inventory);

        let (status, body) = send_json(
            &app,
            "POST",
            "/vm/start",
            Some(json!({"cpu_count": 2, "mem_size_gb": 32, "image": "windows-11"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let detail = body["detail"].as_array().expect("detail should be a list");
        assert_eq!(detail.len(), 1);
        assert_eq!(detail[0]["field"], "image");
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_incomplete_body() {
        let (registry, inventory) = test_state();
        let app = test_router(registry.clone(), inventory);

        let (status, body) = send_json(
            &app,
            "POST",
            "/vm/start",
            Some(json!({"cpu_count": 2, "image": "alpine:3.20"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_fractional_numbers_per_field() {
        let (registry, inventory) = test_state();
        let app = test_router(registry.clone(), inventory);

        let (status, body) = send_json(
            &app,
            "POST",
            "/vm/start",
            Some(json!({"cpu_count": 2.5, "mem_size_gb": 1e30, "image": "alpine:3.20"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let detail = body["detail"].as_array().expect("detail should be a list");
        assert_eq!(detail.len(), 2);
        assert_eq!(detail[0]["field"], "cpu_count");
        assert_eq!(detail[1]["field"], "mem_size_gb");
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_stop_unknown_vm() {
        let (registry, inventory) = test_state();
        let app = test_router(registry, inventory);

        let (status, body) =
            send_json(&app, "POST", "/vm/c9abe3b66fc544c78e355968119081ed/stop", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "VM not found");
    }
}

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    api::{
        ApiState,
        error::{ApiError, ApiJson, ApiPath, ApiQuery},
        resource_service::{ResourceService, ResourceServiceRouter},
    },
    inventory::{Item, ItemId, ItemUpdate},
};

#[derive(Debug, Deserialize)]
pub struct NameParams {
    pub name: Option<String>,
}

pub struct InventoryService {}

impl ResourceService for InventoryService {
    fn create_router(_state: Arc<ApiState>) -> ResourceServiceRouter {
        async fn home() -> Json<Value> {
            Json(json!({ "data": "testing" }))
        }

        async fn about() -> Json<Value> {
            Json(json!({ "data": "about page" }))
        }

        async fn get_item(
            State(state): State<Arc<ApiState>>,
            ApiPath(id): ApiPath<ItemId>,
        ) -> Result<Json<Item>, ApiError> {
            Ok(Json(state.inventory.get(id)?))
        }

        async fn get_by_name(
            State(state): State<Arc<ApiState>>,
            ApiQuery(params): ApiQuery<NameParams>,
        ) -> Result<Json<Item>, ApiError> {
            Ok(Json(state.inventory.find_by_name(params.name.as_deref())?))
        }

        async fn create_item(
            State(state): State<Arc<ApiState>>,
            ApiPath(id): ApiPath<ItemId>,
            ApiJson(item): ApiJson<Item>,
        ) -> Result<Json<Item>, ApiError> {
            Ok(Json(state.inventory.create(id, item)?))
        }

        async fn update_item(
            State(state): State<Arc<ApiState>>,
            ApiPath(id): ApiPath<ItemId>,
            ApiJson(update): ApiJson<ItemUpdate>,
        ) -> Result<Json<Item>, ApiError> {
            Ok(Json(state.inventory.update(id, update)?))
        }

        let mut router = Router::new();
        router = router.route("/", get(home));
        router = router.route("/about", get(about));
        router = router.route("/get-item/{item_id}", get(get_item));
        router = router.route("/get-by-name", get(get_by_name));
        router = router.route("/create-item/{item_id}", post(create_item));
        router = router.route("/update-item/{item_id}", put(update_item));

        ResourceServiceRouter {
            name: "Inventory".to_string(),
            base_path: "/".to_string(),
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
    async fn test_home_and_about() {
        let (registry, inventory) = test_state();
        let app = test_router(registry, inventory);

        let (status, body) = send_json(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": "testing"}));

        let (status, body) = send_json(&app, "GET", "/about", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": "about page"}));
    }

    #[tokio::test]
    async fn test_item_lifecycle() {
        let (registry, inventory) = test_state();
        let app = test_router(registry, inventory);
        let milk = json!({"name": "milk", "price": 3.5, "brand": null});

        let (status, body) = send_json(&app, "POST", "/create-item/1", Some(milk.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, milk);

        let (status, body) = send_json(&app, "POST", "/create-item/1", Some(milk.clone())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["detail"], "Item ID already exists");

        let (status, body) = send_json(
            &app,
            "PUT",
            "/update-item/1",
            Some(json!({"price": 4.25, "brand": "farm"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"name": "milk", "price": 4.25, "brand": "farm"}));

        let (status, body) = send_json(&app, "GET", "/get-item/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["brand"], "farm");

        let (status, body) = send_json(&app, "GET", "/get-by-name?name=milk", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["price"], 4.25);
    }

    #[tokio::test]
    async fn test_item_errors() {
        let (registry, inventory) = test_state();
        let app = test_router(registry, inventory);

        let (status, body) = send_json(&app, "GET", "/get-item/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Item not found");

        let (status, _) = send_json(&app, "GET", "/get-item/3", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send_json(&app, "GET", "/get-item/abc", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send_json(&app, "GET", "/get-by-name", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send_json(&app, "PUT", "/update-item/1", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Item ID does not exist");

        let (status, _) =
            send_json(&app, "POST", "/create-item/1", Some(json!({"name": "milk"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use futures_util::stream;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{
    api::{
        ApiState,
        error::{ApiError, ApiQuery},
        resource_service::{ResourceService, ResourceServiceRouter},
    },
    events::{parse_start, query_events, to_ndjson_line},
};

#[derive(Debug, Deserialize)]
pub struct EventsParams {
    pub start: String,
}

pub struct EventService {}

impl ResourceService for EventService {
    fn create_router(_state: Arc<ApiState>) -> ResourceServiceRouter {
        async fn stream_events(
            State(state): State<Arc<ApiState>>,
            ApiQuery(params): ApiQuery<EventsParams>,
        ) -> Result<Response, ApiError> {
            let start = parse_start(&params.start).map_err(|e| {
                ApiError::Unprocessable(json!(format!("start: {}", e)))
            })?;
            debug!("streaming events from {}", start);

            let lines =
                query_events(start, state.events.clone()).map(|event| to_ndjson_line(&event));

            Ok((
                [(header::CONTENT_TYPE, "application/x-ndjson")],
                Body::from_stream(stream::iter(lines)),
            )
                .into_response())
        }

        let mut router = Router::new();
        router = router.route("/events", get(stream_events));

        ResourceServiceRouter {
            name: "Events".to_string(),
            base_path: "/".to_string(),
            router,
        }
    }
}

use std::convert::Infallible;

use axum::{
    Json,
    extract::{FromRequestParts, Path, State, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::debug;

use crate::domain::blocklist::{BlocklistEntry, BlocklistStore, IpAddress, RequestContext};
use crate::server::{AppState, errors::AppError};

#[derive(Debug, Deserialize)]
pub struct BlockRequest {
    pub ip: String,
}

/// Every request gets a context bounded by the configured request timeout.
impl<S: BlocklistStore> FromRequestParts<AppState<S>> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequestContext::with_timeout(state.request_timeout))
    }
}

/// `GET /blocklist`: blocked addresses in insertion order.
pub async fn list_handler<S: BlocklistStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<IpAddress>>, AppError> {
    let snapshot = state.blocklist.list().await?;
    debug!(
        revision = snapshot.revision,
        count = snapshot.len(),
        "Listing blocklist"
    );
    Ok(Json(snapshot.addresses().collect()))
}

/// `POST /block`: `201` for a new entry, `200` when it was already blocked.
pub async fn add_handler<S: BlocklistStore>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    payload: Result<Json<BlockRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected block request body: {rejection}");
        AppError::MalformedBody
    })?;

    let insertion = state.blocklist.add(&ctx, &request.ip).await?;
    let status = if insertion.is_new() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(insertion.into_entry())).into_response())
}

/// `GET /block/{ip}`: the stored entry for one address.
pub async fn get_handler<S: BlocklistStore>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Path(ip): Path<String>,
) -> Result<Json<BlocklistEntry>, AppError> {
    let entry = state.blocklist.get(&ctx, &ip).await?;
    Ok(Json(entry))
}

/// `DELETE /block/{ip}`: the path segment arrives percent-decoded.
pub async fn remove_handler<S: BlocklistStore>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Path(ip): Path<String>,
) -> Result<StatusCode, AppError> {
    state.blocklist.remove(&ctx, &ip).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        Router,
        body::Body,
        http::{Request, header::CONTENT_TYPE},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::domain::blocklist::{BlocklistService, MemoryStore};
    use crate::server::router;

    use super::*;

    fn test_router(timeout: Duration) -> Router {
        router(AppState {
            blocklist: BlocklistService::in_memory(),
            request_timeout: timeout,
        })
    }

    fn post_block(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/block")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_add_list_remove_flow() {
        let app = test_router(Duration::from_secs(5));

        let resp = app
            .clone()
            .oneshot(post_block(r#"{"ip":"10.0.0.1"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(json_body(resp).await["ip"], "10.0.0.1");

        let resp = app
            .clone()
            .oneshot(post_block(r#"{"ip":"10.0.0.1"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app.clone().oneshot(request("GET", "/blocklist")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await, json!(["10.0.0.1"]));

        let resp = app
            .clone()
            .oneshot(request("DELETE", "/block/10.0.0.1"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = app
            .clone()
            .oneshot(request("DELETE", "/block/10.0.0.1"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(resp).await["error"], "NotFound");

        let resp = app.oneshot(request("GET", "/blocklist")).await.unwrap();
        assert_eq!(json_body(resp).await, json!([]));
    }

    #[tokio::test]
    async fn test_invalid_address_is_bad_request() {
        let app = test_router(Duration::from_secs(5));

        let resp = app
            .clone()
            .oneshot(post_block(r#"{"ip":"999.1.1.1"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        assert_eq!(body["error"], "InvalidAddress");
        assert!(body["message"].as_str().unwrap().contains("999.1.1.1"));

        let resp = app
            .clone()
            .oneshot(request("DELETE", "/block/1.2.3"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(resp).await["error"], "InvalidAddress");

        let resp = app.oneshot(request("GET", "/blocklist")).await.unwrap();
        assert_eq!(json_body(resp).await, json!([]));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let app = test_router(Duration::from_secs(5));

        for body in ["not json", r#"{"address":"10.0.0.1"}"#, r#"{"ip":42}"#] {
            let resp = app.clone().oneshot(post_block(body)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(json_body(resp).await["error"], "InvalidAddress");
        }
    }

    #[tokio::test]
    async fn test_percent_encoded_ipv6_path() {
        let app = test_router(Duration::from_secs(5));

        let resp = app
            .clone()
            .oneshot(post_block(r#"{"ip":"0:0:0:0:0:0:0:1"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(json_body(resp).await["ip"], "::1");

        let resp = app
            .clone()
            .oneshot(request("GET", "/block/%3A%3A1"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["ip"], "::1");

        let resp = app
            .clone()
            .oneshot(request("DELETE", "/block/0%3A0%3A0%3A0%3A0%3A0%3A0%3A1"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = app.oneshot(request("GET", "/block/::1")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_expired_request_context_is_unavailable() {
        let app = test_router(Duration::ZERO);

        let resp = app
            .clone()
            .oneshot(post_block(r#"{"ip":"10.0.0.1"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(resp).await["error"], "Timeout");

        let resp = app.oneshot(request("GET", "/blocklist")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await, json!([]));
    }

    #[tokio::test]
    async fn test_full_blocklist_is_insufficient_storage() {
        let app = router(AppState {
            blocklist: BlocklistService::new(MemoryStore::new().with_max_entries(1)),
            request_timeout: Duration::from_secs(5),
        });

        let resp = app
            .clone()
            .oneshot(post_block(r#"{"ip":"10.0.0.1"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = app
            .clone()
            .oneshot(post_block(r#"{"ip":"10.0.0.2"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INSUFFICIENT_STORAGE);
        assert_eq!(json_body(resp).await["error"], "StorageFull");

        let resp = app
            .clone()
            .oneshot(post_block(r#"{"ip":"10.0.0.1"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app.oneshot(request("GET", "/blocklist")).await.unwrap();
        assert_eq!(json_body(resp).await, json!(["10.0.0.1"]));
    }
}

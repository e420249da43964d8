use axum::{
    body::Body,
    extract::Path,
    http::{Request, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

// Router de prueba con la misma forma de rutas que el servidor real,
// sin base de datos detrás
fn create_test_app() -> Router {
    let pev_router = Router::new()
        .route("/", get(|| async { Json(json!({ "data": [], "total": 0 })) }))
        .route(
            "/:id",
            get(|Path(id): Path<Uuid>| async move { Json(json!({ "id": id.to_string() })) }),
        )
        .route(
            "/:id/transfer",
            post(|Path(id): Path<Uuid>| async move { Json(json!({ "pev_id": id.to_string() })) }),
        );

    Router::new()
        .route(
            "/test",
            get(|| async { Json(json!({ "status": "ok" })) }),
        )
        .nest("/api/pev", pev_router)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_pev_listing_route_exists() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::builder().uri("/api/pev").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_pev_detail_accepts_uuid() {
    let app = create_test_app();
    let id = Uuid::new_v4();
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/pev/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_pev_detail_rejects_malformed_id() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/pev/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transfer_requires_post() {
    let app = create_test_app();
    let id = Uuid::new_v4();
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/pev/{}/transfer", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/owners")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

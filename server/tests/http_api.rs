//! HTTP surface tests: routing, status codes and the error envelope

mod common;

use axum::Router;
use axum::body::Body;
use common::{seed_restaurant, seed_slot, setup};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tabled_server::core::Server;
use tower::ServiceExt;

async fn app() -> (common::TestEnv, Router) {
    let env = setup().await;
    let router = Server::build_router(env.state.clone());
    (env, router)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_reports_database_status() {
    let (_env, router) = app().await;

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["status"], "ok");
}

#[tokio::test]
async fn hold_confirm_round_trip_over_http() {
    let (env, router) = app().await;
    let restaurant = seed_restaurant(&env).await;
    let slot = seed_slot(&env, restaurant, 10, 1, 8).await;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/bookings/holds",
            json!({"slot_id": slot.id, "party_size": 4, "contact": {"name": "Ada"}}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let hold = body_json(response).await;
    let hold_id = hold["hold_id"].as_str().expect("hold_id").to_string();
    assert!(hold["expires_at"].is_string());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/bookings/confirm",
            json!({"hold_id": hold_id}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let confirmed = body_json(response).await;
    assert_eq!(confirmed["status"], "confirmed");
    let booking_id = confirmed["booking_id"].as_i64().expect("booking_id");
    assert_eq!(confirmed["code"].as_str().expect("code").len(), 8);

    let response = router
        .oneshot(
            Request::get(format!("/api/bookings/{booking_id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let booking = body_json(response).await;
    assert_eq!(booking["party_size"], 4);
}

#[tokio::test]
async fn availability_uses_the_unlimited_sentinel() {
    let (env, router) = app().await;
    let restaurant = seed_restaurant(&env).await;
    let unlimited = seed_slot(&env, restaurant, 0, 1, 8).await;

    let response = router
        .oneshot(
            Request::get(format!(
                "/api/availability?slot_id={}&party_size=4",
                unlimited.id
            ))
            .body(Body::empty())
            .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["available"], true);
    assert_eq!(body["remaining"], 99);
}

#[tokio::test]
async fn capacity_conflicts_map_to_409_with_error_envelope() {
    let (env, router) = app().await;
    let restaurant = seed_restaurant(&env).await;
    let slot = seed_slot(&env, restaurant, 4, 1, 8).await;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/bookings/holds",
            json!({"slot_id": slot.id, "party_size": 4}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/bookings/holds",
            json!({"slot_id": slot.id, "party_size": 4}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["code"], "E0004");
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn unknown_resources_map_to_404() {
    let (_env, router) = app().await;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/bookings/holds",
            json!({"slot_id": 4242, "party_size": 2}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E0003");

    let response = router
        .oneshot(
            Request::get("/api/bookings/999")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn releasing_any_hold_is_a_204() {
    let (env, router) = app().await;
    let restaurant = seed_restaurant(&env).await;
    let slot = seed_slot(&env, restaurant, 4, 1, 4).await;

    // unknown token: still 204
    let response = router
        .clone()
        .oneshot(
            Request::delete("/api/bookings/holds/no-such-token")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/bookings/holds",
            json!({"slot_id": slot.id, "party_size": 4}),
        ))
        .await
        .expect("response");
    let hold = body_json(response).await;
    let hold_id = hold["hold_id"].as_str().expect("hold_id").to_string();

    let response = router
        .clone()
        .oneshot(
            Request::delete(format!("/api/bookings/holds/{hold_id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // capacity is back
    let response = router
        .oneshot(json_request(
            "POST",
            "/api/bookings/holds",
            json!({"slot_id": slot.id, "party_size": 4}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn booking_slot_listing_carries_annotations() {
    let (env, router) = app().await;
    let restaurant = seed_restaurant(&env).await;
    let slot = seed_slot(&env, restaurant, 10, 1, 8).await;

    let response = router
        .oneshot(
            Request::get(format!(
                "/api/booking-slots?restaurant={}&date={}",
                restaurant, slot.date
            ))
            .body(Body::empty())
            .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let listed = body.as_array().expect("array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], slot.id);
    assert_eq!(listed[0]["remaining"], 10);
    assert_eq!(listed[0]["effective_status"], "open");
}

use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    handlers::{
        comments::{create_comment, list_comments},
        health::livez,
        opinions::{create_opinion, list_opinions},
        reactions::{get_reaction_info, save_reaction},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, config: &Config) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/opinions", get(list_opinions).post(create_opinion))
        .route(
            "/opinions/{opinion_id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/opinions/{opinion_id}/reactions",
            get(get_reaction_info).put(save_reaction),
        )
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_app(AppState::default(), &Config::default())
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_livez() {
        let response = send(&app(), get_request("/livez")).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_opinions_empty() {
        let response = send(&app(), get_request("/api/opinions")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_create_and_list_opinions() {
        let app = app();

        let response = send(
            &app,
            json_request(
                "POST",
                "/api/opinions",
                json!({
                    "mailAddress": "a@x.jp",
                    "coordinate": { "latitude": 35.6812, "longitude": 139.7671 },
                    "opinion": "More benches"
                }),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());

        // Page size is 2 in tests, so three opinions span two pages.
        for text in ["Fix the road", "Plant trees"] {
            let response = send(
                &app,
                json_request(
                    "POST",
                    "/api/opinions",
                    json!({
                        "mailAddress": "b@x.jp",
                        "coordinate": { "latitude": 0.0, "longitude": 0.0 },
                        "opinion": text
                    }),
                ),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = send(&app, get_request("/api/opinions")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let opinions = body_json(response).await;
        let opinions = opinions.as_array().unwrap();
        assert_eq!(opinions.len(), 3);

        let first = opinions.iter().find(|o| o["id"] == id.as_str()).unwrap();
        assert_eq!(first["mailAddress"], "a@x.jp");
        assert_eq!(first["opinion"], "More benches");
        assert_eq!(first["coordinate"]["latitude"], 35.6812);
        assert_eq!(first["coordinate"]["longitude"], 139.7671);
    }

    #[tokio::test]
    async fn test_create_opinion_rejects_malformed_body() {
        let response = send(
            &app(),
            json_request("POST", "/api/opinions", json!({ "opinion": "no author" })),
        )
        .await;

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_comments_are_listed_oldest_first() {
        let app = app();

        for text in ["first", "second", "third"] {
            let response = send(
                &app,
                json_request(
                    "POST",
                    "/api/opinions/op-1/comments",
                    json!({ "mailAddress": "c@x.jp", "comment": text }),
                ),
            )
            .await;

            assert_eq!(response.status(), StatusCode::CREATED);
            let created = body_json(response).await;
            assert!(created["commentId"].as_str().is_some());

            tokio::time::sleep(Duration::from_millis(2)).await;
        }

        let response = send(&app, get_request("/api/opinions/op-1/comments")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let comments = body_json(response).await;
        let texts: Vec<&str> = comments
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["comment"].as_str().unwrap())
            .collect();
        assert_eq!(texts, ["first", "second", "third"]);
        assert!(comments[0]["createdDateTime"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_comments_of_other_opinions_are_not_listed() {
        let app = app();

        send(
            &app,
            json_request(
                "POST",
                "/api/opinions/op-1/comments",
                json!({ "mailAddress": "c@x.jp", "comment": "hello" }),
            ),
        )
        .await;

        let response = send(&app, get_request("/api/opinions/op-2/comments")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_reaction_info_for_unknown_user() {
        let response = send(
            &app(),
            get_request("/api/opinions/op-9/reactions?mailAddress=nobody%40x.jp"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "isReactioned": false, "reactionCount": 0 })
        );
    }

    #[tokio::test]
    async fn test_save_reaction_and_read_info() {
        let app = app();

        for (mail, reacted) in [("a@x.jp", true), ("b@x.jp", true), ("c@x.jp", false)] {
            let response = send(
                &app,
                json_request(
                    "PUT",
                    "/api/opinions/op-1/reactions",
                    json!({ "mailAddress": mail, "isReactioned": reacted }),
                ),
            )
            .await;

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                body_json(response).await,
                json!({ "opinionId": "op-1", "mailAddress": mail, "isReactioned": reacted })
            );
        }

        let response = send(
            &app,
            get_request("/api/opinions/op-1/reactions?mailAddress=a%40x.jp"),
        )
        .await;
        assert_eq!(
            body_json(response).await,
            json!({ "isReactioned": true, "reactionCount": 2 })
        );

        // Withdrawing replaces the stored reaction.
        send(
            &app,
            json_request(
                "PUT",
                "/api/opinions/op-1/reactions",
                json!({ "mailAddress": "a@x.jp", "isReactioned": false }),
            ),
        )
        .await;

        let response = send(
            &app,
            get_request("/api/opinions/op-1/reactions?mailAddress=a%40x.jp"),
        )
        .await;
        assert_eq!(
            body_json(response).await,
            json!({ "isReactioned": false, "reactionCount": 1 })
        );
    }

    #[tokio::test]
    async fn test_reaction_info_requires_mail_address() {
        let response = send(&app(), get_request("/api/opinions/op-1/reactions")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_requests_after_shutdown_are_unavailable() {
        let state = AppState::default();
        let app = create_app(state.clone(), &Config::default());

        state.signal_shutdown();

        let response = send(&app, get_request("/api/opinions")).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

/// Test helper functions
pub mod helpers {
    use axum::{
        Router,
        body::Body,
        http::{Request, Response},
    };
    use tower::ServiceExt;
    use vidproxy::{config::Settings, server::create_app};
    use wiremock::MockServer;

    /// Settings whose upstream API points at the mock server
    pub fn create_test_settings(server: &MockServer) -> Settings {
        let mut settings = Settings::default();
        settings.upstream.api_base = server.uri();
        settings
    }

    /// Application routed against the mock server
    pub fn create_test_app(server: &MockServer) -> Router {
        create_app(create_test_settings(server)).expect("app builds")
    }

    /// `/proxy` URI with the target properly encoded
    pub fn proxy_uri(target: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
        format!("/proxy?url={}", encoded)
    }

    /// Issue a GET against the router
    pub async fn get(app: &Router, uri: &str) -> Response<Body> {
        app.clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Collect a response body as text
    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Location header of a redirect
    pub fn location(response: &Response<Body>) -> Option<String> {
        response
            .headers()
            .get(axum::http::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }
}

//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route
//! matching, and dispatch to the feed handlers and health probes.

use crate::config::AppState;
use crate::handler::feed;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    if state.config.logging.access_log {
        logger::log_request(&method, req.uri());
    }

    let mut response = match check_http_method(&method, state.config.http.enable_cors) {
        Some(resp) => resp,
        None => route_request(&path, &state),
    };

    apply_common_headers(&mut response, &state);
    Ok(response)
}

/// Check HTTP method; the feed surface is GET-only. No request body is
/// consumed on any route.
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET => None,
        &Method::OPTIONS => Some(http::options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::method_not_allowed())
        }
    }
}

/// Route request based on path
fn route_request(path: &str, state: &AppState) -> Response<Full<Bytes>> {
    // Health check endpoints (highest priority, always fast)
    let health = &state.config.health;
    if health.enabled {
        if path == health.liveness_path {
            return http::health_response(StatusCode::OK, "ok");
        }
        if path == health.readiness_path {
            // Ready only once the dataset is actually serving
            return if state.feed.is_loaded() {
                http::health_response(StatusCode::OK, "ok")
            } else {
                http::health_response(StatusCode::SERVICE_UNAVAILABLE, "degraded")
            };
        }
    }

    match path {
        "/data" => feed::serve_data(state),
        "/bulk-data" => feed::serve_bulk_data(state),
        _ => http::not_found(),
    }
}

/// Stamp the configured Server header (and CORS header when enabled) onto
/// every response.
fn apply_common_headers(response: &mut Response<Full<Bytes>>, state: &AppState) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        headers.insert(SERVER, value);
    }
    if state.config.http.enable_cors {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::data::{DataService, Dataset, RowRecord};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::Value;

    fn make_dataset(rows: usize) -> Dataset {
        let columns = vec!["device".to_string()];
        let rows = (0..rows)
            .map(|i| {
                let mut row = RowRecord::new();
                row.insert("device".to_string(), Value::String(format!("sensor-{i}")));
                row
            })
            .collect();
        Dataset::new(columns, rows)
    }

    fn state(dataset: Option<Dataset>) -> AppState {
        let config = Config::load_from("definitely-missing-config").expect("defaults");
        let feed = DataService::with_rng(dataset, &config.data, StdRng::seed_from_u64(7));
        AppState::new(config, feed)
    }

    #[test]
    fn known_paths_dispatch_to_the_feed() {
        let state = state(Some(make_dataset(8)));
        assert_eq!(route_request("/data", &state).status(), StatusCode::OK);
        assert_eq!(route_request("/bulk-data", &state).status(), StatusCode::OK);
    }

    #[test]
    fn unknown_path_is_not_found() {
        let state = state(Some(make_dataset(1)));
        assert_eq!(
            route_request("/no-such-route", &state).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn liveness_is_ok_even_when_degraded() {
        let state = state(None);
        assert_eq!(route_request("/healthz", &state).status(), StatusCode::OK);
    }

    #[test]
    fn readiness_tracks_dataset_presence() {
        let degraded = state(None);
        assert_eq!(
            route_request("/readyz", &degraded).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );

        let ready = state(Some(make_dataset(1)));
        assert_eq!(route_request("/readyz", &ready).status(), StatusCode::OK);
    }

    #[test]
    fn non_get_methods_are_rejected() {
        assert!(check_http_method(&Method::GET, false).is_none());

        let post = check_http_method(&Method::POST, false).expect("response");
        assert_eq!(post.status(), StatusCode::METHOD_NOT_ALLOWED);

        let delete = check_http_method(&Method::DELETE, false).expect("response");
        assert_eq!(delete.status(), StatusCode::METHOD_NOT_ALLOWED);

        let options = check_http_method(&Method::OPTIONS, true).expect("response");
        assert_eq!(options.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn common_headers_are_applied() {
        let state = state(Some(make_dataset(1)));
        let mut response = route_request("/data", &state);
        apply_common_headers(&mut response, &state);
        let server = response.headers().get(SERVER).expect("server header");
        assert_eq!(server, state.config.http.server_name.as_str());
    }
}

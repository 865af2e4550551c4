use axum::{
    extract::ConnectInfo,
    http::{Request, Response, header::USER_AGENT},
};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::trace::{DefaultOnRequest, HttpMakeClassifier, MakeSpan, OnResponse, TraceLayer};
use tracing::{Span, info, info_span};

/// [`TraceLayer`] with the service's request span and completion event.
pub type RequestTraceLayer = TraceLayer<HttpMakeClassifier, RequestSpan, DefaultOnRequest, ResponseLog>;

/// Request tracing for every route.
///
/// Each request runs inside an `http_request` span carrying `method`, `uri`,
/// `remote_addr` and `user_agent`; once the response is ready an info event
/// adds `status_code` and `duration_ms`. `remote_addr` needs the server to be
/// started with `into_make_service_with_connect_info::<SocketAddr>()`,
/// otherwise it is `-`.
///
/// ```ignore
/// let app = router.layer(trace_layer());
/// ```
pub fn trace_layer() -> RequestTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_response(ResponseLog)
}

/// Builds the `http_request` span from the incoming request
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let remote_addr = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_else(|| "-".to_string());
        let user_agent = request
            .headers()
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-");

        info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            remote_addr = %remote_addr,
            user_agent = %user_agent,
        )
    }
}

/// Logs `HTTP request processed` with status and latency
#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseLog;

impl<B> OnResponse<B> for ResponseLog {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        info!(
            status_code = response.status().as_u16(),
            duration_ms = latency.as_millis() as u64,
            "HTTP request processed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use http_body_util::BodyExt;
    use test_utils::CapturedLogs;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/teapot", get(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }))
            .route("/empty", get(|| async { StatusCode::NO_CONTENT }))
            .layer(trace_layer())
    }

    #[tokio::test]
    async fn test_passes_status_and_body_through() {
        let response = app()
            .oneshot(
                Request::get("/teapot")
                    .header(USER_AGENT, "integration-test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"short and stout");
    }

    #[tokio::test]
    async fn test_logs_request_and_response_fields() {
        let (logs, _guard) = CapturedLogs::install();
        let mut request = Request::get("/teapot?brew=1")
            .header(USER_AGENT, "integration-test")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 7], 5555))));

        app().oneshot(request).await.unwrap();

        let event = logs.event("HTTP request processed").unwrap();
        assert_eq!(event["level"], "INFO");
        assert_eq!(event["fields"]["status_code"], 418);
        assert!(event["fields"]["duration_ms"].is_u64());

        let span = &event["span"];
        assert_eq!(span["name"], "http_request");
        assert_eq!(span["method"], "GET");
        assert_eq!(span["uri"], "/teapot?brew=1");
        assert_eq!(span["remote_addr"], "10.0.0.7:5555");
        assert_eq!(span["user_agent"], "integration-test");
    }

    #[tokio::test]
    async fn test_missing_connect_info_and_unmatched_routes_are_logged() {
        let (logs, _guard) = CapturedLogs::install();

        let response = app()
            .oneshot(Request::get("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let event = logs.event("HTTP request processed").unwrap();
        assert_eq!(event["fields"]["status_code"], 404);
        assert_eq!(event["span"]["remote_addr"], "-");
        assert_eq!(event["span"]["user_agent"], "-");
    }
}

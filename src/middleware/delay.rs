use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use rand::Rng;
use tracing::debug;

use crate::state::DelayControl;

/// Holds each request for a random `[0, max_delay_ms)` milliseconds while the
/// delay is switched on. Preflight requests are never delayed.
pub async fn inject_delay(State(delay): State<DelayControl>, req: Request, next: Next) -> Response {
    if delay.is_enabled() && delay.max_delay_ms > 0 && req.method() != Method::OPTIONS {
        let delay_ms = rand::thread_rng().gen_range(0..delay.max_delay_ms);
        debug!(delay_ms, "Delaying request");
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request as HttpRequest, middleware, routing::any};
    use fauxrest_config::DelayConfig;
    use tokio::time::Instant;
    use tower::ServiceExt;

    fn app(delay: DelayControl) -> Router {
        Router::new()
            .route("/", any(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(delay, inject_delay))
    }

    async fn timed(app: Router, method: Method) -> Duration {
        let started = Instant::now();
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method(method)
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_success());
        started.elapsed()
    }

    #[tokio::test(start_paused = true)]
    async fn test_options_is_never_delayed() {
        let delay = DelayControl::new(&DelayConfig {
            enabled: true,
            max_delay_ms: 60_000,
        });
        assert!(timed(app(delay), Method::OPTIONS).await < Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_delay_passes_through() {
        let delay = DelayControl::new(&DelayConfig {
            enabled: false,
            max_delay_ms: 60_000,
        });
        assert!(timed(app(delay), Method::GET).await < Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_enabled_delay_is_bounded() {
        let delay = DelayControl::new(&DelayConfig {
            enabled: true,
            max_delay_ms: 500,
        });
        assert!(timed(app(delay), Method::GET).await < Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_enabled_delay_suspends_requests() {
        let delay = DelayControl::new(&DelayConfig {
            enabled: true,
            max_delay_ms: 1000,
        });
        let app = app(delay);

        let mut total = Duration::ZERO;
        for _ in 0..5 {
            let elapsed = timed(app.clone(), Method::GET).await;
            assert!(elapsed < Duration::from_millis(1000), "{elapsed:?}");
            total += elapsed;
        }

        assert!(total > Duration::ZERO);
    }
}

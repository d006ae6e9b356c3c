use std::time::Instant;

use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

/// Logs every request/response pair. Backend errors never crash a
/// view, so the log line is often the only trace a failure leaves.
pub struct TraceMiddleware;

#[async_trait::async_trait]
impl Middleware for TraceMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let method = req.method().clone();
        let url = req.url().clone();
        let started = Instant::now();

        let result = next.run(req, extensions).await;
        let elapsed = started.elapsed();

        match &result {
            Ok(response) => {
                log::debug!("{} {} -> {} ({:?})", method, url, response.status(), elapsed);
            }
            Err(err) => {
                log::warn!("{} {} failed after {:?}: {}", method, url, elapsed, err);
            }
        }

        result
    }
}

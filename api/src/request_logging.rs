use poem::http::StatusCode;
use poem::{Endpoint, IntoResponse, Middleware, Request, Response};
use std::time::Instant;

/// Logs every HTTP request with method, path, query, status and duration
pub struct RequestLogging;

impl<E: Endpoint> Middleware<E> for RequestLogging {
    type Output = RequestLoggingEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        RequestLoggingEndpoint { inner: ep }
    }
}

pub struct RequestLoggingEndpoint<E> {
    inner: E,
}

/// Request line captured before the request is handed to the inner endpoint
struct RequestLine {
    method: String,
    path: String,
    query: String,
    client_ip: String,
}

impl RequestLine {
    fn from_request(req: &Request) -> Self {
        Self {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().unwrap_or_default().to_string(),
            client_ip: req
                .remote_addr()
                .as_socket_addr()
                .map(|addr| addr.ip().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }

    fn log_response(&self, status: StatusCode, duration_ms: u64) {
        let status = status.as_u16();
        if (200..300).contains(&status) {
            tracing::info!(
                method = %self.method,
                path = %self.path,
                query = %self.query,
                status,
                duration_ms,
                client_ip = %self.client_ip,
                "request completed"
            );
        } else if status >= 400 {
            tracing::warn!(
                method = %self.method,
                path = %self.path,
                query = %self.query,
                status,
                duration_ms,
                client_ip = %self.client_ip,
                "request failed"
            );
        } else {
            tracing::debug!(
                method = %self.method,
                path = %self.path,
                status,
                duration_ms,
                "request completed"
            );
        }
    }
}

impl<E: Endpoint> Endpoint for RequestLoggingEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> poem::Result<Self::Output> {
        let start = Instant::now();
        let line = RequestLine::from_request(&req);

        let result = self.inner.call(req).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(resp) => {
                let resp = resp.into_response();
                line.log_response(resp.status(), duration_ms);
                Ok(resp)
            }
            Err(err) => {
                tracing::error!(
                    method = %line.method,
                    path = %line.path,
                    query = %line.query,
                    status = err.status().as_u16(),
                    duration_ms,
                    error = %err,
                    "request error"
                );
                Err(err)
            }
        }
    }
}

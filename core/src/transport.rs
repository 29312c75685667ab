//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only seam where I/O happens. `HttpTransport` is built
//! from an explicit `ClientConfig`: default headers and a bounded timeout,
//! no retry. Non-2xx statuses are returned as data so the client decides
//! what they mean; only failures that produce no response become
//! `ApiError::Transport`.

use std::fmt;
use std::time::Duration;

use tracing::{debug, warn};
use ureq::Agent;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct HttpTransport {
    agent: Agent,
    headers: Vec<(String, String)>,
    timeout: Duration,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let timeout = config.timeout();
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self {
            agent,
            headers: config.headers.clone(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn prepare<B>(
        &self,
        mut builder: ureq::RequestBuilder<B>,
        request: &HttpRequest,
    ) -> ureq::RequestBuilder<B> {
        for (key, value) in &request.query {
            builder = builder.query(key, value);
        }
        // Per-request headers win over configured defaults.
        for (key, value) in &self.headers {
            if request.header(key).is_none() {
                builder = builder.header(key.as_str(), value.as_str());
            }
        }
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        builder
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let url = request.url.as_str();
        let body = request.body.as_deref();
        let result = match request.method {
            HttpMethod::Get => self.prepare(self.agent.get(url), request).call(),
            HttpMethod::Delete => self.prepare(self.agent.delete(url), request).call(),
            HttpMethod::Post => {
                let builder = self.prepare(self.agent.post(url), request);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = self.prepare(self.agent.put(url), request);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| {
            warn!(method = %request.method, url = %request.url, error = %e, "request failed");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        debug!(method = %request.method, url = %request.url, status, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_comes_from_config() {
        let config = ClientConfig {
            timeout_secs: 3,
            ..ClientConfig::default()
        };
        assert_eq!(HttpTransport::new(&config).timeout(), Duration::from_secs(3));
    }

    #[test]
    fn refused_connection_is_a_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let transport = HttpTransport::new(&ClientConfig::new(&format!("http://{addr}")));
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://{addr}/products"),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        };
        let err = transport.execute(&request).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}

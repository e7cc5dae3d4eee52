//! Optional CORS proxy.
//!
//! When enabled, requests under the configured prefix are fetched from the
//! CMS origin and the body relayed with a fixed content type, so module
//! scripts load same-origin. Upstream failures become a 500 JSON error
//! instead of an unhandled failure.

use std::time::Duration;

use trellis_config::Config;
use ureq::Agent;

use crate::middleware::{Middleware, RequestContext, Response, Verdict};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Content type for every relayed body.
const PROXY_CONTENT_TYPE: &str = "application/javascript";

/// Error from an upstream proxy fetch.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    Http(#[from] ureq::Error),

    /// Upstream returned an error status.
    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),
}

/// Optional middleware forwarding prefixed requests to the CMS origin.
pub struct CorsProxyMiddleware {
    agent: Agent,
    origin: String,
    prefix: String,
}

impl CorsProxyMiddleware {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            origin: config.cms.origin.clone(),
            prefix: config.proxy.cors_prefix.clone(),
        }
    }

    fn forward(&self, upstream: &str) -> Result<Vec<u8>, ProxyError> {
        let response = self.agent.get(upstream).call()?;
        let status = response.status().as_u16();
        let mut body_reader = response.into_body();
        if status >= 400 {
            return Err(ProxyError::UpstreamStatus(status));
        }
        Ok(body_reader.read_to_vec()?)
    }
}

impl Middleware for CorsProxyMiddleware {
    fn handle(&self, ctx: &mut RequestContext) -> Verdict {
        let Some(rest) = ctx.pathname.strip_prefix(&self.prefix) else {
            return Verdict::Continue;
        };
        let upstream = format!("{}{rest}", self.origin);
        match self.forward(&upstream) {
            Ok(body) => Verdict::Respond(Response::with_body(200, PROXY_CONTENT_TYPE, body)),
            Err(error) => {
                tracing::warn!(
                    upstream = %upstream,
                    error = %error,
                    "CORS proxy upstream fetch failed"
                );
                Verdict::Respond(Response::json_error(500, "upstream fetch failed"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn test_config(origin: &str) -> Config {
        let mut config = Config::default();
        config.cms.origin = origin.to_owned();
        config.proxy.cors_enabled = true;
        config
    }

    #[test]
    fn test_unmatched_path_continues() {
        let middleware = CorsProxyMiddleware::new(&test_config("https://cms.example.com"));
        let mut ctx = RequestContext::new("/blog/hello-world");
        assert!(matches!(middleware.handle(&mut ctx), Verdict::Continue));
    }

    #[test]
    fn test_upstream_failure_becomes_500_json() {
        // Nothing listens on port 1; the fetch fails fast.
        let middleware = CorsProxyMiddleware::new(&test_config("http://127.0.0.1:1"));
        let mut ctx = RequestContext::new("/proxy/module.js");

        let Verdict::Respond(response) = middleware.handle(&mut ctx) else {
            panic!("matched prefix must respond");
        };
        assert_eq!(response.status, 500);
        assert_eq!(response.header("content-type"), Some("application/json"));
    }
}

//! Route lookup seam used by the 404 pre-check.
//!
//! The middleware layer only needs one bit per path: does the CMS consider
//! it not-found. The trait keeps the network out of the chain's unit tests;
//! [`GraphqlRouteLookup`] is the production implementation.

use std::time::Duration;

use ureq::Agent;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 10;

/// Minimal route query: only the not-found flag is requested.
const ROUTE_STATUS_QUERY: &str =
    "query RouteStatus($uri: String!) { templateByUri(uri: $uri) { is404 } }";

/// Resolves whether the CMS reports a path as not-found.
pub trait RouteLookup: Send + Sync {
    /// Best-effort lookup; callers treat errors as "found" (fail open).
    fn is_not_found(&self, pathname: &str) -> Result<bool, LookupError>;
}

/// Error from a route status lookup.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    Http(#[from] ureq::Error),

    /// Server returned an error status.
    #[error("HTTP error: {0}")]
    Status(u16),

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

/// Blocking GraphQL lookup against the CMS origin.
pub struct GraphqlRouteLookup {
    agent: Agent,
    endpoint: String,
}

impl GraphqlRouteLookup {
    /// Create a lookup client for the given CMS origin.
    #[must_use]
    pub fn new(cms_origin: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            endpoint: format!("{}/graphql", cms_origin.trim_end_matches('/')),
        }
    }
}

impl RouteLookup for GraphqlRouteLookup {
    fn is_not_found(&self, pathname: &str) -> Result<bool, LookupError> {
        let payload = serde_json::json!({
            "query": ROUTE_STATUS_QUERY,
            "variables": { "uri": pathname },
        });
        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .agent
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            return Err(LookupError::Status(status));
        }

        let value: serde_json::Value = body_reader.read_json()?;
        match value.pointer("/data/templateByUri") {
            // No template at all for this path: not-found.
            None | Some(serde_json::Value::Null) => Ok(true),
            Some(template) => Ok(template
                .get("is404")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_built_from_origin() {
        let lookup = GraphqlRouteLookup::new("https://cms.example.com/");
        assert_eq!(lookup.endpoint, "https://cms.example.com/graphql");
    }

    #[test]
    fn test_unreachable_origin_is_an_error_not_a_panic() {
        let lookup = GraphqlRouteLookup::new("http://127.0.0.1:1");
        assert!(lookup.is_not_found("/about").is_err());
    }
}

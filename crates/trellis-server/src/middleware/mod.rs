//! Request middleware.
//!
//! The chain is an explicit ordered list of handlers evaluated by a driver
//! loop. Each middleware either short-circuits with a [`Response`] or
//! explicitly continues; the terminal behavior is a pass-through (`None`),
//! meaning the renderer handles the request. Middlewares that continue may
//! record response headers and a status override on the shared
//! [`RequestContext`], which the renderer applies to the eventual page
//! response.

pub mod asset_proxy;
pub mod cors_proxy;
pub mod route_status;

use std::collections::HashMap;
use std::sync::Arc;

use trellis_config::Config;

use crate::route_lookup::RouteLookup;

/// Whether `pathname` begins with `prefix` on a path-segment boundary.
///
/// `/wp-json/wp/v2/posts`, `/wp-json` and `/wp-json?page=2` match the prefix
/// `/wp-json`; `/wp-jsonx` does not.
pub(crate) fn path_has_prefix(pathname: &str, prefix: &str) -> bool {
    pathname.strip_prefix(prefix).is_some_and(|rest| {
        rest.is_empty() || rest.starts_with('/') || rest.starts_with('?')
    })
}

/// Mutable per-request state threaded through the chain.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub pathname: String,
    pub headers: HashMap<String, String>,
    /// Status forced onto the eventual page response (e.g. 404).
    pub status_override: Option<u16>,
    /// Headers a continuing middleware wants on the eventual response.
    pub response_headers: Vec<(String, String)>,
}

impl RequestContext {
    #[must_use]
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            ..Self::default()
        }
    }
}

/// An early response produced by a short-circuiting middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// Temporary redirect preserving method and body.
    #[must_use]
    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            status: 307,
            headers: vec![("location".to_owned(), location.into())],
            body: Vec::new(),
        }
    }

    /// Body with an explicit content type.
    #[must_use]
    pub fn with_body(status: u16, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_owned(), content_type.to_owned())],
            body,
        }
    }

    /// JSON error body with the given status.
    #[must_use]
    pub fn json_error(status: u16, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string().into_bytes();
        Self::with_body(status, "application/json", body)
    }

    /// Value of the first header with this (lowercase) name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Decision returned by each middleware.
#[derive(Debug)]
pub enum Verdict {
    /// Hand the request to the next middleware (or the renderer).
    Continue,
    /// Short-circuit the chain with this response.
    Respond(Response),
}

/// One link of the request chain.
pub trait Middleware: Send + Sync {
    fn handle(&self, ctx: &mut RequestContext) -> Verdict;
}

/// Ordered middleware list evaluated front to back.
#[derive(Default)]
pub struct MiddlewareChain {
    handlers: Vec<Box<dyn Middleware>>,
}

impl MiddlewareChain {
    /// Empty chain: every request passes through.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default stack for page requests: route status detection, origin asset
    /// proxying and, when configured, the CORS proxy.
    #[must_use]
    pub fn with_defaults(config: &Config, lookup: Arc<dyn RouteLookup>) -> Self {
        let mut chain = Self::new();
        chain.append(Box::new(route_status::RouteStatusMiddleware::new(
            config, lookup,
        )));
        chain.append(Box::new(asset_proxy::AssetProxyMiddleware::new(config)));
        if config.proxy.cors_enabled {
            chain.append(Box::new(cors_proxy::CorsProxyMiddleware::new(config)));
        }
        chain
    }

    /// Append a middleware after the existing ones.
    pub fn append(&mut self, middleware: Box<dyn Middleware>) -> &mut Self {
        self.handlers.push(middleware);
        self
    }

    /// Run the chain.
    ///
    /// Returns the first short-circuit response, or `None` when every
    /// middleware continued and the request passes through to the renderer.
    #[must_use]
    pub fn dispatch(&self, ctx: &mut RequestContext) -> Option<Response> {
        for middleware in &self.handlers {
            match middleware.handle(ctx) {
                Verdict::Continue => {}
                Verdict::Respond(response) => return Some(response),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Tagger(&'static str);

    impl Middleware for Tagger {
        fn handle(&self, ctx: &mut RequestContext) -> Verdict {
            ctx.response_headers
                .push(("x-tag".to_owned(), self.0.to_owned()));
            Verdict::Continue
        }
    }

    struct ShortCircuit;

    impl Middleware for ShortCircuit {
        fn handle(&self, _ctx: &mut RequestContext) -> Verdict {
            Verdict::Respond(Response::with_body(204, "text/plain", Vec::new()))
        }
    }

    #[test]
    fn test_empty_chain_passes_through() {
        let chain = MiddlewareChain::new();
        let mut ctx = RequestContext::new("/about");
        assert!(chain.dispatch(&mut ctx).is_none());
    }

    #[test]
    fn test_handlers_run_in_append_order() {
        let mut chain = MiddlewareChain::new();
        chain.append(Box::new(Tagger("first")));
        chain.append(Box::new(Tagger("second")));
        let mut ctx = RequestContext::new("/about");
        assert!(chain.dispatch(&mut ctx).is_none());
        let tags: Vec<&str> = ctx
            .response_headers
            .iter()
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(tags, vec!["first", "second"]);
    }

    #[test]
    fn test_short_circuit_skips_later_handlers() {
        let mut chain = MiddlewareChain::new();
        chain.append(Box::new(Tagger("before")));
        chain.append(Box::new(ShortCircuit));
        chain.append(Box::new(Tagger("after")));
        let mut ctx = RequestContext::new("/about");

        let response = chain.dispatch(&mut ctx).expect("must short-circuit");
        assert_eq!(response.status, 204);
        assert_eq!(ctx.response_headers.len(), 1);
        assert_eq!(ctx.response_headers[0].1, "before");
    }

    #[test]
    fn test_response_helpers() {
        let redirect = Response::redirect("https://cms.example.com/x");
        assert_eq!(redirect.status, 307);
        assert_eq!(redirect.header("location"), Some("https://cms.example.com/x"));

        let error = Response::json_error(500, "upstream fetch failed");
        assert_eq!(error.header("content-type"), Some("application/json"));
        assert_eq!(
            String::from_utf8(error.body).unwrap(),
            r#"{"error":"upstream fetch failed"}"#
        );
    }
}

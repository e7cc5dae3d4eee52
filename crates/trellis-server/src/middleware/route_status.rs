//! Path classification and best-effort 404 detection.
//!
//! Asset-like paths are never looked up: they are either served by the
//! framework or handled by the asset proxy further down the chain. For page
//! paths the middleware asks the CMS whether the route exists, forcing a 404
//! status onto the eventual response when it does not. The lookup fails
//! open: an unreachable CMS must not take the page down.

use std::sync::Arc;

use trellis_config::Config;

use crate::middleware::{Middleware, RequestContext, Verdict, path_has_prefix};
use crate::route_lookup::RouteLookup;

/// Response header carrying the pathname the lookup resolved.
const RESOLVED_PATH_HEADER: &str = "x-resolved-pathname";

/// File extensions served statically, never subject to route lookup.
const STATIC_EXTENSIONS: &[&str] = &[
    ".js", ".mjs", ".css", ".map", ".json", ".xml", ".txt", ".ico", ".png", ".jpg", ".jpeg",
    ".gif", ".svg", ".webp", ".avif", ".woff", ".woff2", ".ttf", ".otf",
];

/// Paths excluded from the route lookup.
#[derive(Debug, Clone)]
pub struct SkipRules {
    uploads_path: String,
    rest_prefix: String,
    admin_ajax_path: String,
}

impl SkipRules {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            uploads_path: config.cms.uploads_path.clone(),
            rest_prefix: config.cms.rest_prefix.clone(),
            admin_ajax_path: config.cms.admin_ajax_path.clone(),
        }
    }

    /// Whether the 404 pre-check is skipped for this path.
    #[must_use]
    pub fn should_skip(&self, pathname: &str) -> bool {
        pathname.starts_with("/_next/")
            || pathname.starts_with("/api/")
            || path_has_prefix(pathname, &self.uploads_path)
            || path_has_prefix(pathname, &self.rest_prefix)
            || pathname == self.admin_ajax_path
            || STATIC_EXTENSIONS.iter().any(|ext| pathname.ends_with(ext))
    }
}

/// Default middleware tagging page requests with their route status.
pub struct RouteStatusMiddleware {
    lookup: Arc<dyn RouteLookup>,
    skip: SkipRules,
}

impl RouteStatusMiddleware {
    #[must_use]
    pub fn new(config: &Config, lookup: Arc<dyn RouteLookup>) -> Self {
        Self {
            lookup,
            skip: SkipRules::from_config(config),
        }
    }
}

impl Middleware for RouteStatusMiddleware {
    fn handle(&self, ctx: &mut RequestContext) -> Verdict {
        if self.skip.should_skip(&ctx.pathname) {
            return Verdict::Continue;
        }

        ctx.response_headers
            .push((RESOLVED_PATH_HEADER.to_owned(), ctx.pathname.clone()));

        match self.lookup.is_not_found(&ctx.pathname) {
            Ok(true) => ctx.status_override = Some(404),
            Ok(false) => {}
            Err(error) => {
                // Fail open: treat the route as found.
                tracing::warn!(
                    pathname = %ctx.pathname,
                    error = %error,
                    "route status lookup failed; skipping 404 check"
                );
            }
        }
        Verdict::Continue
    }
}

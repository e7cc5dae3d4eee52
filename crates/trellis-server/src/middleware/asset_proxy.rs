//! Origin asset proxying.
//!
//! Requests under the CMS uploads directory, REST prefix or the admin-ajax
//! path never belong to the frontend; they redirect to the same path on the
//! CMS origin.

use trellis_config::Config;

use crate::middleware::{Middleware, RequestContext, Response, Verdict, path_has_prefix};

/// Default middleware redirecting CMS-owned paths to the origin.
pub struct AssetProxyMiddleware {
    origin: String,
    uploads_path: String,
    rest_prefix: String,
    admin_ajax_path: String,
}

impl AssetProxyMiddleware {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            origin: config.cms.origin.clone(),
            uploads_path: config.cms.uploads_path.clone(),
            rest_prefix: config.cms.rest_prefix.clone(),
            admin_ajax_path: config.cms.admin_ajax_path.clone(),
        }
    }

    fn is_origin_asset(&self, pathname: &str) -> bool {
        path_has_prefix(pathname, &self.uploads_path)
            || path_has_prefix(pathname, &self.rest_prefix)
            || pathname == self.admin_ajax_path
    }
}

impl Middleware for AssetProxyMiddleware {
    fn handle(&self, ctx: &mut RequestContext) -> Verdict {
        if self.is_origin_asset(&ctx.pathname) {
            return Verdict::Respond(Response::redirect(format!(
                "{}{}",
                self.origin, ctx.pathname
            )));
        }
        Verdict::Continue
    }
}

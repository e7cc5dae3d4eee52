//! Request handling for the Trellis frontend.
//!
//! A request first passes through the [`MiddlewareChain`], which may proxy
//! it to the origin CMS, flag it as not-found, or let it continue to the
//! renderer. For requests that continue, [`pipeline::assemble_page`] turns
//! the fetched route payload into a render tree and asset-loading HTML.

pub mod middleware;
pub mod pipeline;
pub mod route_lookup;

pub use middleware::{Middleware, MiddlewareChain, RequestContext, Response, Verdict};
pub use pipeline::{PageRender, assemble_page};
pub use route_lookup::{GraphqlRouteLookup, LookupError, RouteLookup};

//! Route payload parsing for Trellis.
//!
//! Normalizes the raw per-route CMS response into [`TemplateData`]: the flat
//! block list, asset descriptors with absolutized URLs, body classes and the
//! not-found flag. Only a completely missing payload is fatal; partial
//! errors are logged and rendering proceeds best-effort.

mod parser;
mod payload;

pub use parser::{TemplateData, TemplateParseError, parse_template_data};
pub use payload::{
    GraphqlError, NodeList, RawDependency, RawModuleRef, RawScript, RawScriptModule,
    RawStylesheet, RouteData, RoutePayload, RouteResponse,
};

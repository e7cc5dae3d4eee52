//! Page-asset handling for Trellis.
//!
//! Turns the flat lists of enqueued stylesheets, scripts and ES script
//! modules into deduplicated, dependency-ordered loading instructions: a
//! browser import map, per-module load plans ([`resolve_script_modules`]),
//! and the HTML tags the view layer injects into the head and footer.

mod descriptors;
mod modules;
mod tags;

pub use descriptors::{
    DependencyEdge, ImportType, LoadStrategy, ScriptDescriptor, ScriptLocation,
    ScriptModuleDescriptor, StylesheetDescriptor,
};
pub use modules::{ImportMap, ModuleAssets, ModuleLoadPlan, UrlRewrite, resolve_script_modules};
pub use tags::{
    escape_html, render_import_map, render_module_tags, render_scripts, render_stylesheets,
};

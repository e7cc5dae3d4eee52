//! Single-request page assembly.
//!
//! Ties the crates together for one page request: parse the fetched route
//! payload, build and resolve the block tree, resolve module assets, and
//! emit the head/footer HTML fragments the view layer injects.

use trellis_assets::{
    ScriptLocation, UrlRewrite, render_import_map, render_module_tags, render_scripts,
    render_stylesheets, resolve_script_modules,
};
use trellis_blocks::{RenderNode, RendererRegistry, build_tree, resolve_tree};
use trellis_config::Config;
use trellis_template::{RouteResponse, TemplateData, TemplateParseError, parse_template_data};

/// Everything the view layer needs to paint one page.
#[derive(Debug)]
pub struct PageRender {
    /// HTTP status for the page response.
    pub status: u16,
    pub body_classes: Option<Vec<String>>,
    /// Resolved render tree for the block content.
    pub tree: Vec<RenderNode>,
    /// Head fragment: stylesheets, header scripts, import map.
    pub head_html: String,
    /// Footer fragment: footer scripts, module registrations and tags.
    pub footer_html: String,
}

/// Assemble a page from the raw route response.
///
/// `status_override` comes from the middleware chain and wins over the
/// payload's own not-found flag.
///
/// # Errors
///
/// Propagates [`TemplateParseError`] when the route payload is entirely
/// missing; the caller renders an error page.
pub fn assemble_page(
    response: &RouteResponse,
    registry: &RendererRegistry,
    config: &Config,
    status_override: Option<u16>,
) -> Result<PageRender, TemplateParseError> {
    let TemplateData {
        editor_blocks,
        stylesheets,
        scripts,
        script_modules,
        body_classes,
        is_not_found,
    } = parse_template_data(response, &config.cms.origin)?;

    let tree = resolve_tree(&build_tree(editor_blocks), registry);

    let rewrite = config
        .proxy
        .script_module_prefix
        .as_ref()
        .map(|prefix| UrlRewrite {
            origin: config.cms.origin.clone(),
            prefix: prefix.clone(),
        });
    let assets = resolve_script_modules(&script_modules, rewrite.as_ref());

    let mut head_html = String::new();
    head_html.push_str(&render_stylesheets(&stylesheets));
    head_html.push_str(&render_scripts(&scripts, ScriptLocation::Header));
    head_html.push_str(&render_import_map(&assets.import_map));

    let mut footer_html = String::new();
    footer_html.push_str(&render_scripts(&scripts, ScriptLocation::Footer));
    footer_html.push_str(&render_module_tags(&assets.modules));

    let status = status_override.unwrap_or(if is_not_found { 404 } else { 200 });

    Ok(PageRender {
        status,
        body_classes,
        tree,
        head_html,
        footer_html,
    })
}

//! Normalization of the raw route payload into [`TemplateData`].

use trellis_assets::{
    DependencyEdge, ImportType, LoadStrategy, ScriptDescriptor, ScriptLocation,
    ScriptModuleDescriptor, StylesheetDescriptor,
};
use trellis_blocks::BlockNode;

use crate::payload::{RawDependency, RawScript, RawScriptModule, RawStylesheet, RouteResponse};

/// Render-ready aggregate for one route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateData {
    pub editor_blocks: Vec<BlockNode>,
    pub stylesheets: Vec<StylesheetDescriptor>,
    pub scripts: Vec<ScriptDescriptor>,
    pub script_modules: Vec<ScriptModuleDescriptor>,
    /// `None` when the payload supplied no usable classes; "absent" and
    /// "empty" are distinct states in this layer, and an empty result
    /// collapses to absent.
    pub body_classes: Option<Vec<String>>,
    /// Read verbatim from the payload; the middleware layer turns it into an
    /// HTTP 404 status.
    pub is_not_found: bool,
}

/// Error turning a route response into template data.
#[derive(Debug, thiserror::Error)]
pub enum TemplateParseError {
    /// The route payload was entirely absent; nothing can be rendered.
    #[error("route payload is missing; nothing to render")]
    MissingPayload,
}

/// Parse a route response into [`TemplateData`].
///
/// Partial GraphQL errors are logged and rendering proceeds best-effort with
/// whatever data is present. Asset URLs starting with `/` are prefixed with
/// the CMS origin; absolute URLs pass through unchanged.
///
/// # Errors
///
/// Returns [`TemplateParseError::MissingPayload`] when `templateByUri` is
/// absent or null.
pub fn parse_template_data(
    response: &RouteResponse,
    cms_origin: &str,
) -> Result<TemplateData, TemplateParseError> {
    for error in &response.errors {
        tracing::warn!(message = %error.message, "partial GraphQL error in route payload");
    }

    let payload = response
        .data
        .as_ref()
        .and_then(|data| data.template_by_uri.as_ref())
        .ok_or(TemplateParseError::MissingPayload)?;

    let origin = cms_origin.strip_suffix('/').unwrap_or(cms_origin);

    let scripts = payload
        .enqueued_scripts
        .as_ref()
        .map(|list| list.nodes.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(|raw| parse_script(raw, origin))
        .collect();

    let stylesheets = payload
        .enqueued_stylesheets
        .as_ref()
        .map(|list| list.nodes.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(|raw| parse_stylesheet(raw, origin))
        .collect();

    let script_modules = payload
        .enqueued_script_modules
        .as_ref()
        .map(|list| list.nodes.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(|raw| parse_module(raw, origin))
        .collect();

    let body_classes = payload.body_classes.as_ref().and_then(|raw| {
        let classes: Vec<String> = raw
            .iter()
            .filter_map(|value| value.as_str().map(str::to_owned))
            .collect();
        if classes.len() < raw.len() {
            tracing::debug!(
                dropped = raw.len() - classes.len(),
                "dropped non-string body class entries"
            );
        }
        if classes.is_empty() { None } else { Some(classes) }
    });

    Ok(TemplateData {
        editor_blocks: payload.editor_blocks.clone().unwrap_or_default(),
        stylesheets,
        scripts,
        script_modules,
        body_classes,
        is_not_found: payload.is_404,
    })
}

/// Prefix root-relative URLs with the CMS origin.
fn absolutize(src: &str, origin: &str) -> String {
    if src.starts_with('/') {
        format!("{origin}{src}")
    } else {
        src.to_owned()
    }
}

fn parse_script(raw: &RawScript, origin: &str) -> Option<ScriptDescriptor> {
    let (Some(handle), Some(src)) = (raw.handle.clone(), raw.src.as_deref()) else {
        tracing::debug!("dropping enqueued script with missing handle or src");
        return None;
    };
    let location = match raw.group_location.as_deref() {
        Some("FOOTER") => ScriptLocation::Footer,
        _ => ScriptLocation::Header,
    };
    let strategy = match raw.loading_strategy.as_deref() {
        Some("ASYNC") => Some(LoadStrategy::Async),
        Some("DEFER") => Some(LoadStrategy::Defer),
        _ => None,
    };
    Some(ScriptDescriptor {
        handle,
        src: absolutize(src, origin),
        location,
        strategy,
    })
}

fn parse_stylesheet(raw: &RawStylesheet, origin: &str) -> Option<StylesheetDescriptor> {
    let Some(handle) = raw.handle.clone() else {
        tracing::debug!("dropping enqueued stylesheet with missing handle");
        return None;
    };
    let inline = |entries: &Option<Vec<Option<String>>>| -> Vec<String> {
        entries
            .iter()
            .flatten()
            .filter_map(Clone::clone)
            .collect()
    };
    Some(StylesheetDescriptor {
        handle,
        src: raw.src.as_deref().map(|src| absolutize(src, origin)),
        before: inline(&raw.before),
        after: inline(&raw.after),
    })
}

fn parse_module(raw: &RawScriptModule, origin: &str) -> Option<ScriptModuleDescriptor> {
    let Some(handle) = raw.handle.clone() else {
        tracing::debug!("dropping enqueued script module with missing handle");
        return None;
    };
    let dependencies = raw
        .dependencies
        .iter()
        .flatten()
        .map(|dep| parse_dependency(dep, origin))
        .collect();
    Some(ScriptModuleDescriptor {
        handle,
        src: raw.src.as_deref().map(|src| absolutize(src, origin)),
        extra_data: raw.extra_data.clone(),
        dependencies,
    })
}

/// Map a raw dependency entry; validation (dropping incomplete edges) is the
/// asset resolver's job.
fn parse_dependency(raw: &RawDependency, origin: &str) -> DependencyEdge {
    let import_type = match raw.import_type.as_deref() {
        Some("STATIC") => ImportType::Static,
        _ => ImportType::Dynamic,
    };
    let target = raw.connected_script_module.as_ref();
    DependencyEdge {
        import_type,
        handle: target.and_then(|m| m.handle.clone()),
        src: target
            .and_then(|m| m.src.as_deref())
            .map(|src| absolutize(src, origin)),
    }
}

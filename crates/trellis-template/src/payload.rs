//! Raw per-route payload as returned by the CMS GraphQL endpoint.
//!
//! Every field is optional at this layer; the parser decides what is fatal
//! and what degrades.

use serde::Deserialize;
use serde_json::Value;
use trellis_blocks::BlockNode;

/// Top-level GraphQL response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub data: Option<RouteData>,
    /// Partial-field errors delivered alongside usable data.
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

/// `data` object of the route query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteData {
    #[serde(rename = "templateByUri", default)]
    pub template_by_uri: Option<RoutePayload>,
}

/// A single GraphQL error entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
}

/// GraphQL connection wrapper around a node list.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeList<T> {
    #[serde(default)]
    pub nodes: Vec<T>,
}

impl<T> Default for NodeList<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

/// The per-route template payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePayload {
    /// Raw body class list; non-string entries are dropped by the parser.
    #[serde(default)]
    pub body_classes: Option<Vec<Value>>,
    #[serde(default)]
    pub editor_blocks: Option<Vec<BlockNode>>,
    #[serde(default)]
    pub enqueued_scripts: Option<NodeList<RawScript>>,
    #[serde(default)]
    pub enqueued_stylesheets: Option<NodeList<RawStylesheet>>,
    #[serde(default)]
    pub enqueued_script_modules: Option<NodeList<RawScriptModule>>,
    #[serde(default)]
    pub is_404: bool,
}

/// A classic enqueued script as delivered.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScript {
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
    /// `HEADER` or `FOOTER`.
    #[serde(default)]
    pub group_location: Option<String>,
    /// `ASYNC` or `DEFER`.
    #[serde(default)]
    pub loading_strategy: Option<String>,
}

/// An enqueued stylesheet as delivered.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStylesheet {
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub before: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub after: Option<Vec<Option<String>>>,
}

/// An enqueued ES script module as delivered.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScriptModule {
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
    /// Opaque JSON blob re-emitted verbatim.
    #[serde(default)]
    pub extra_data: Option<String>,
    #[serde(default)]
    pub dependencies: Option<Vec<RawDependency>>,
}

/// A raw inter-module dependency entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDependency {
    /// `STATIC` or `DYNAMIC`; anything else is treated as dynamic.
    #[serde(default)]
    pub import_type: Option<String>,
    #[serde(default)]
    pub connected_script_module: Option<RawModuleRef>,
}

/// Reference to the module a dependency edge points at.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawModuleRef {
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_envelope_with_null_data() {
        let response: RouteResponse = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(response.data.is_none());
        assert!(response.errors.is_empty());
    }

    #[test]
    fn test_payload_field_names() {
        let json = r#"{
            "data": {
                "templateByUri": {
                    "bodyClasses": ["home", null, 3],
                    "editorBlocks": [{"type": "core/paragraph"}],
                    "enqueuedScripts": {"nodes": [{"handle": "lib", "src": "/l.js", "groupLocation": "FOOTER", "loadingStrategy": "DEFER"}]},
                    "enqueuedScriptModules": {"nodes": [{"handle": "m", "src": null, "dependencies": [{"importType": "STATIC", "connectedScriptModule": {"handle": "n", "src": "/n.js"}}]}]},
                    "is404": true
                }
            },
            "errors": [{"message": "partial failure"}]
        }"#;
        let response: RouteResponse = serde_json::from_str(json).unwrap();
        let payload = response.data.unwrap().template_by_uri.unwrap();

        assert!(payload.is_404);
        assert_eq!(payload.body_classes.as_ref().unwrap().len(), 3);
        assert_eq!(payload.editor_blocks.unwrap().len(), 1);

        let script = &payload.enqueued_scripts.unwrap().nodes[0];
        assert_eq!(script.group_location.as_deref(), Some("FOOTER"));
        assert_eq!(script.loading_strategy.as_deref(), Some("DEFER"));

        let module = &payload.enqueued_script_modules.unwrap().nodes[0];
        let dep = &module.dependencies.as_ref().unwrap()[0];
        assert_eq!(dep.import_type.as_deref(), Some("STATIC"));
        assert_eq!(
            dep.connected_script_module.as_ref().unwrap().handle.as_deref(),
            Some("n")
        );
        assert_eq!(response.errors[0].message, "partial failure");
    }
}

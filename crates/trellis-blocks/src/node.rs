//! Flat block data model as received from the CMS.

use serde::Deserialize;
use serde_json::Value;

/// Open, block-type-specific attribute map.
///
/// Many values are JSON-encoded strings that downstream renderers decode;
/// this layer carries them verbatim.
pub type Attributes = serde_json::Map<String, Value>;

/// A single content block from the flat `editorBlocks` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlockNode {
    /// Block type tag, e.g. `core/paragraph`.
    #[serde(rename = "type")]
    pub block_type: String,

    /// Editor-assigned id. Nodes without one are tolerated but cannot be
    /// parents.
    #[serde(rename = "clientId", default)]
    pub id: Option<String>,

    /// Id of the enclosing block, when nested.
    #[serde(rename = "parentClientId", default)]
    pub parent_id: Option<String>,

    /// CMS-rendered fallback markup covering this block and its subtree.
    #[serde(rename = "renderedHtml", default)]
    pub rendered_html: String,

    #[serde(default)]
    pub attributes: Attributes,

    /// Media item connected to this block, if any (opaque to this layer).
    #[serde(rename = "connectedMediaItem", default)]
    pub connected_media_item: Option<Value>,

    /// Media size/file details for the connected item (opaque to this layer).
    #[serde(rename = "mediaDetails", default)]
    pub media_details: Option<Value>,
}

impl BlockNode {
    /// Minimal node, useful as a starting point when constructing blocks in
    /// code.
    #[must_use]
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            id: None,
            parent_id: None,
            rendered_html: String::new(),
            attributes: Attributes::new(),
            connected_media_item: None,
            media_details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_full_block() {
        let json = r#"{
            "type": "core/image",
            "clientId": "abc",
            "parentClientId": "root",
            "renderedHtml": "<img src=\"x.png\">",
            "attributes": {"width": 640, "caption": "hi"},
            "connectedMediaItem": {"id": 7},
            "mediaDetails": {"height": 480}
        }"#;
        let block: BlockNode = serde_json::from_str(json).unwrap();
        assert_eq!(block.block_type, "core/image");
        assert_eq!(block.id.as_deref(), Some("abc"));
        assert_eq!(block.parent_id.as_deref(), Some("root"));
        assert_eq!(block.rendered_html, "<img src=\"x.png\">");
        assert_eq!(block.attributes["width"], 640);
        assert!(block.connected_media_item.is_some());
        assert!(block.media_details.is_some());
    }

    #[test]
    fn test_deserialize_sparse_block() {
        let block: BlockNode = serde_json::from_str(r#"{"type": "core/paragraph"}"#).unwrap();
        assert_eq!(block.block_type, "core/paragraph");
        assert_eq!(block.id, None);
        assert_eq!(block.parent_id, None);
        assert_eq!(block.rendered_html, "");
        assert!(block.attributes.is_empty());
    }
}

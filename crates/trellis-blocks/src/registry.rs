//! Renderer registry, built once at startup and frozen.
//!
//! The registry merges a built-in default table with caller-supplied
//! overrides. An override may register a renderer, or register `Disabled`
//! to deliberately turn a default off for a block type. Lookup failure is a
//! first-class outcome (unknown block type), never an error.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::node::{Attributes, BlockNode};

/// Override key reserved for replacing the fallback renderer.
const FALLBACK_KEY: &str = "default";

/// Uniform context handed to every block renderer.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub attributes: &'a Attributes,
    pub rendered_html: &'a str,
    pub connected_media_item: Option<&'a Value>,
    pub media_details: Option<&'a Value>,
}

impl<'a> RenderContext<'a> {
    /// Context for a single block.
    #[must_use]
    pub fn for_block(block: &'a BlockNode) -> Self {
        Self {
            attributes: &block.attributes,
            rendered_html: &block.rendered_html,
            connected_media_item: block.connected_media_item.as_ref(),
            media_details: block.media_details.as_ref(),
        }
    }
}

/// A render capability for one block type.
pub trait BlockRenderer: Send + Sync {
    /// Produce the block's markup from the uniform render context.
    fn render(&self, ctx: &RenderContext<'_>) -> String;
}

impl<F> BlockRenderer for F
where
    F: Fn(&RenderContext<'_>) -> String + Send + Sync,
{
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        self(ctx)
    }
}

/// Resolved render capability attached to a tree node.
#[derive(Clone)]
pub enum RendererRef {
    /// A registered renderer.
    Block(Arc<dyn BlockRenderer>),
    /// Raw-HTML passthrough: emits the CMS-rendered markup verbatim.
    RawHtml,
}

impl RendererRef {
    /// Render a block with this capability.
    #[must_use]
    pub fn render(&self, ctx: &RenderContext<'_>) -> String {
        match self {
            Self::Block(renderer) => renderer.render(ctx),
            Self::RawHtml => ctx.rendered_html.to_owned(),
        }
    }

    /// Whether this is the raw-HTML passthrough.
    #[must_use]
    pub fn is_raw_html(&self) -> bool {
        matches!(self, Self::RawHtml)
    }
}

impl fmt::Debug for RendererRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block(_) => f.write_str("RendererRef::Block(..)"),
            Self::RawHtml => f.write_str("RendererRef::RawHtml"),
        }
    }
}

impl PartialEq for RendererRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Block(a), Self::Block(b)) => Arc::ptr_eq(a, b),
            (Self::RawHtml, Self::RawHtml) => true,
            _ => false,
        }
    }
}

/// Caller-facing registry entry: a renderer, or an explicit opt-out.
///
/// `Disabled` deliberately turns the renderer for a type off; the block
/// renders through the fallback but its children are still resolved. This is
/// distinct from the type being unknown, which additionally prunes the
/// subtree.
#[derive(Clone)]
pub enum BlockDefinition {
    Renderer(Arc<dyn BlockRenderer>),
    Disabled,
}

impl BlockDefinition {
    /// Wrap a plain function as a block definition.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&RenderContext<'_>) -> String + Send + Sync + 'static,
    {
        Self::Renderer(Arc::new(f))
    }
}

/// Accumulates default and override renderer tables before the freeze.
#[derive(Default)]
pub struct RendererRegistryBuilder {
    defaults: HashMap<String, Arc<dyn BlockRenderer>>,
    overrides: HashMap<String, BlockDefinition>,
}

impl RendererRegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a built-in default renderer for a block type.
    pub fn default_renderer(
        &mut self,
        block_type: impl Into<String>,
        renderer: Arc<dyn BlockRenderer>,
    ) -> &mut Self {
        self.defaults.insert(block_type.into(), renderer);
        self
    }

    /// Additive merge of caller-supplied block definitions.
    ///
    /// Later registrations win for the same type. The reserved `"default"`
    /// key replaces the fallback renderer used for disabled and unknown
    /// types.
    pub fn add_block_definitions(
        &mut self,
        definitions: impl IntoIterator<Item = (String, BlockDefinition)>,
    ) -> &mut Self {
        for (block_type, definition) in definitions {
            if self.overrides.insert(block_type.clone(), definition).is_some() {
                tracing::warn!(
                    block_type = %block_type,
                    "block definition registered twice; keeping the later one"
                );
            }
        }
        self
    }

    /// Freeze the registry.
    ///
    /// Consumes the builder; registration after first use is rejected by the
    /// type system instead of merging into shared state.
    #[must_use]
    pub fn build(mut self) -> RendererRegistry {
        let fallback = match self.overrides.remove(FALLBACK_KEY) {
            Some(BlockDefinition::Renderer(renderer)) => RendererRef::Block(renderer),
            Some(BlockDefinition::Disabled) | None => RendererRef::RawHtml,
        };

        let mut entries: HashMap<String, RendererRef> = self
            .defaults
            .into_iter()
            .map(|(block_type, renderer)| (block_type, RendererRef::Block(renderer)))
            .collect();

        for (block_type, definition) in self.overrides {
            let renderer = match definition {
                BlockDefinition::Renderer(renderer) => RendererRef::Block(renderer),
                // Disabled keeps the type known (children stay resolvable)
                // while rendering through the fallback.
                BlockDefinition::Disabled => fallback.clone(),
            };
            entries.insert(block_type, renderer);
        }

        RendererRegistry { entries, fallback }
    }
}

/// Frozen mapping from block type to render capability.
pub struct RendererRegistry {
    entries: HashMap<String, RendererRef>,
    fallback: RendererRef,
}

impl RendererRegistry {
    /// Look up the renderer for a block type.
    ///
    /// `None` means the type is known to neither table; callers fall back
    /// and prune the subtree.
    #[must_use]
    pub fn get(&self, block_type: &str) -> Option<&RendererRef> {
        self.entries.get(block_type)
    }

    /// Fallback renderer used for disabled and unknown block types.
    #[must_use]
    pub fn fallback(&self) -> &RendererRef {
        &self.fallback
    }

    /// Number of known block types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

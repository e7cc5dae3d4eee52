//! Renderer resolution and pruning over the block forest.

use crate::node::BlockNode;
use crate::registry::{RendererRef, RendererRegistry};
use crate::tree::BlockTreeNode;

/// A block with its resolved renderer.
///
/// `children` is `None` when the subtree was pruned (the CMS-rendered markup
/// already covers it) and `Some(vec![])` when the block simply has no
/// children. The two states are distinct and both are meaningful to the view
/// layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub block: BlockNode,
    pub renderer: RendererRef,
    pub children: Option<Vec<RenderNode>>,
}

impl RenderNode {
    /// Whether this node's subtree was pruned.
    #[must_use]
    pub fn is_pruned(&self) -> bool {
        self.children.is_none()
    }
}

/// Assign a renderer to every reachable node of the forest.
///
/// Pure with respect to both inputs and deterministic: the registry is only
/// read, the input forest is untouched, and resolving the same forest twice
/// yields identical assignments. Never errors; a type known to neither
/// registry table renders through the fallback and has its subtree pruned,
/// since its `rendered_html` already contains the fully rendered children.
#[must_use]
pub fn resolve_tree(forest: &[BlockTreeNode], registry: &RendererRegistry) -> Vec<RenderNode> {
    forest
        .iter()
        .map(|node| resolve_node(node, registry))
        .collect()
}

fn resolve_node(node: &BlockTreeNode, registry: &RendererRegistry) -> RenderNode {
    if let Some(renderer) = registry.get(&node.block.block_type) {
        RenderNode {
            block: node.block.clone(),
            renderer: renderer.clone(),
            children: Some(resolve_tree(&node.children, registry)),
        }
    } else {
        tracing::debug!(
            block_type = %node.block.block_type,
            "unknown block type; using raw-HTML fallback and pruning subtree"
        );
        RenderNode {
            block: node.block.clone(),
            renderer: registry.fallback().clone(),
            children: None,
        }
    }
}

//! Block data model and render-tree construction for Trellis.
//!
//! The CMS delivers page content as a flat list of blocks with parent
//! pointers. This crate rebuilds the forest ([`build_tree`]), then assigns
//! every node a render capability from the frozen [`RendererRegistry`]
//! ([`resolve_tree`]), pruning subtrees whose block type is unknown to the
//! system.

mod node;
mod registry;
mod resolver;
mod tree;

pub use node::{Attributes, BlockNode};
pub use registry::{
    BlockDefinition, BlockRenderer, RenderContext, RendererRef, RendererRegistry,
    RendererRegistryBuilder,
};
pub use resolver::{RenderNode, resolve_tree};
pub use tree::{BlockTreeNode, build_tree};

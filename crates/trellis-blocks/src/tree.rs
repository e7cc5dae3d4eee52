//! Reconstruction of the block forest from the flat list.

use std::collections::{HashMap, HashSet};

use crate::node::BlockNode;

/// A block with its ordered children, before renderer resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockTreeNode {
    pub block: BlockNode,
    pub children: Vec<BlockTreeNode>,
}

/// Build an ordered forest from the flat block list.
///
/// One grouping pass indexes children by parent id, one attachment pass
/// assembles subtrees. A node whose parent id is absent or matches no id in
/// the input becomes a root; sibling order equals input order. Runs in O(n)
/// and never fails: malformed parent links degrade to extra roots.
#[must_use]
pub fn build_tree(blocks: Vec<BlockNode>) -> Vec<BlockTreeNode> {
    if blocks.is_empty() {
        return Vec::new();
    }

    let known_ids: HashSet<String> = blocks.iter().filter_map(|b| b.id.clone()).collect();

    let mut roots: Vec<BlockNode> = Vec::new();
    let mut children_of: HashMap<String, Vec<BlockNode>> = HashMap::new();
    // Parent ids in first-seen order, so stranded groups drain deterministically.
    let mut parent_order: Vec<String> = Vec::new();

    for block in blocks {
        match block.parent_id.clone() {
            Some(parent) if known_ids.contains(&parent) => {
                if !children_of.contains_key(&parent) {
                    parent_order.push(parent.clone());
                }
                children_of.entry(parent).or_default().push(block);
            }
            _ => roots.push(block),
        }
    }

    let mut forest: Vec<BlockTreeNode> = roots
        .into_iter()
        .map(|block| attach(block, &mut children_of))
        .collect();

    // A parent-pointer cycle leaves its members unattached; surface them as
    // roots rather than dropping blocks.
    for parent in parent_order {
        if let Some(stranded) = children_of.remove(&parent) {
            tracing::warn!(
                parent = %parent,
                count = stranded.len(),
                "blocks unreachable from any root; promoting to roots"
            );
            for block in stranded {
                let node = attach(block, &mut children_of);
                forest.push(node);
            }
        }
    }

    forest
}

/// Assemble one subtree, consuming this node's children from the index.
fn attach(block: BlockNode, children_of: &mut HashMap<String, Vec<BlockNode>>) -> BlockTreeNode {
    let children = block
        .id
        .as_ref()
        .and_then(|id| children_of.remove(id))
        .unwrap_or_default()
        .into_iter()
        .map(|child| attach(child, children_of))
        .collect();
    BlockTreeNode { block, children }
}

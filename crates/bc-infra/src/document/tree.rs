//! Block tree storage: nodes keyed by id with parent links and ordered
//! children. Cloned wholesale for undo snapshots.

use std::collections::{HashMap, HashSet};

use anyhow::{anyhow, bail, Result};
use serde_json::{Map, Value};

use bc_core::block::flavour::props;
use bc_core::{BlockId, BlockSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BlockNode {
    pub flavour: String,
    pub props: Map<String, Value>,
    pub parent: Option<BlockId>,
    pub children: Vec<BlockId>,
}

impl BlockNode {
    pub fn text(&self) -> &str {
        self.props
            .get(props::TEXT)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn has_text(&self) -> bool {
        self.props.contains_key(props::TEXT)
    }

    pub fn set_text(&mut self, text: String) {
        self.props.insert(props::TEXT.to_string(), Value::String(text));
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct BlockTree {
    nodes: HashMap<BlockId, BlockNode>,
    root: Option<BlockId>,
}

impl BlockTree {
    /// Build a tree from a root snapshot, keeping its ids.
    pub fn from_snapshot(root: &BlockSnapshot) -> Result<Self> {
        let mut tree = Self::default();
        tree.check_insertable(std::slice::from_ref(root))?;
        tree.attach(root, None);
        tree.root = Some(root.id.clone());
        Ok(tree)
    }

    pub fn root(&self) -> Option<&BlockId> {
        self.root.as_ref()
    }

    pub fn get(&self, id: &BlockId) -> Option<&BlockNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &BlockId) -> Option<&mut BlockNode> {
        self.nodes.get_mut(id)
    }

    pub fn node(&self, id: &BlockId) -> Result<&BlockNode> {
        self.get(id).ok_or_else(|| anyhow!("block {id} not found"))
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn parent_of(&self, id: &BlockId) -> Option<&BlockId> {
        self.get(id)?.parent.as_ref()
    }

    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        let parent = self.parent_of(id)?;
        self.get(parent)?.children.iter().position(|child| child == id)
    }

    /// `true` when `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: &BlockId, id: &BlockId) -> bool {
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent_of(parent);
        }
        false
    }

    /// Detached copy of `id` and its subtree.
    pub fn snapshot(&self, id: &BlockId) -> Option<BlockSnapshot> {
        let node = self.get(id)?;
        Some(BlockSnapshot {
            id: id.clone(),
            flavour: node.flavour.clone(),
            props: node.props.clone(),
            children: node
                .children
                .iter()
                .filter_map(|child| self.snapshot(child))
                .collect(),
        })
    }

    /// Copy of `id` alone, without children.
    pub fn snapshot_shallow(&self, id: &BlockId) -> Option<BlockSnapshot> {
        let node = self.get(id)?;
        Some(BlockSnapshot {
            id: id.clone(),
            flavour: node.flavour.clone(),
            props: node.props.clone(),
            children: Vec::new(),
        })
    }

    /// Fails when any id of `blocks` already exists or appears twice.
    pub fn check_insertable(&self, blocks: &[BlockSnapshot]) -> Result<()> {
        let mut seen = HashSet::new();
        let mut conflict = None;
        for block in blocks {
            block.visit(&mut |block: &BlockSnapshot| {
                if conflict.is_none() && (self.contains(&block.id) || !seen.insert(block.id.clone())) {
                    conflict = Some(block.id.clone());
                }
            });
        }
        match conflict {
            Some(id) => bail!("duplicate block id {id}"),
            None => Ok(()),
        }
    }

    /// Insert `block` and its subtree under `parent` at `index` (clamped).
    /// Ids must have been checked with [`Self::check_insertable`].
    pub fn insert(&mut self, block: &BlockSnapshot, parent: &BlockId, index: usize) -> Result<()> {
        let siblings = &mut self
            .nodes
            .get_mut(parent)
            .ok_or_else(|| anyhow!("parent block {parent} not found"))?
            .children;
        let index = index.min(siblings.len());
        siblings.insert(index, block.id.clone());
        self.attach(block, Some(parent.clone()));
        Ok(())
    }

    fn attach(&mut self, block: &BlockSnapshot, parent: Option<BlockId>) {
        self.nodes.insert(
            block.id.clone(),
            BlockNode {
                flavour: block.flavour.clone(),
                props: block.props.clone(),
                parent,
                children: block.children.iter().map(|child| child.id.clone()).collect(),
            },
        );
        for child in &block.children {
            self.attach(child, Some(block.id.clone()));
        }
    }

    /// Detach `id` from its parent and drop its subtree. Returns `false` for
    /// unknown ids.
    pub fn remove(&mut self, id: &BlockId) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if let Some(parent) = node.parent.clone() {
            if let Some(parent) = self.nodes.get_mut(&parent) {
                parent.children.retain(|child| child != id);
            }
        }
        if self.root.as_ref() == Some(id) {
            self.root = None;
        }
        self.drop_subtree(id);
        true
    }

    fn drop_subtree(&mut self, id: &BlockId) {
        if let Some(node) = self.nodes.remove(id) {
            for child in &node.children {
                self.drop_subtree(child);
            }
        }
    }

    /// Move every child of `from` to the end of `to`'s children.
    pub fn adopt_children(&mut self, from: &BlockId, to: &BlockId) {
        let moved = match self.nodes.get_mut(from) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in &moved {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = Some(to.clone());
            }
        }
        if let Some(node) = self.nodes.get_mut(to) {
            node.children.extend(moved);
        }
    }
}

/// Byte range of the chars `[start, end)` of `text`, clamped to its length.
pub(crate) fn char_range(text: &str, start: usize, end: usize) -> std::ops::Range<usize> {
    let byte_at = |chars: usize| {
        text.char_indices()
            .nth(chars)
            .map(|(byte, _)| byte)
            .unwrap_or(text.len())
    };
    let start = byte_at(start);
    let end = byte_at(end).max(start);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_core::block::flavour;

    fn sample() -> BlockTree {
        let root = BlockSnapshot::new(BlockId::from("page"), flavour::PAGE).with_children(vec![
            BlockSnapshot::new(BlockId::from("note"), flavour::NOTE).with_children(vec![
                BlockSnapshot::paragraph(BlockId::from("a"), "alpha"),
                BlockSnapshot::paragraph(BlockId::from("b"), "beta"),
            ]),
        ]);
        BlockTree::from_snapshot(&root).unwrap()
    }

    #[test]
    fn test_lookup() {
        let tree = sample();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.parent_of(&BlockId::from("b")), Some(&BlockId::from("note")));
        assert_eq!(tree.index_of(&BlockId::from("b")), Some(1));
        assert_eq!(tree.index_of(&BlockId::from("page")), None);
        assert!(tree.is_ancestor(&BlockId::from("page"), &BlockId::from("a")));
        assert!(!tree.is_ancestor(&BlockId::from("a"), &BlockId::from("a")));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut tree = sample();
        assert!(tree.remove(&BlockId::from("note")));
        assert_eq!(tree.len(), 1);
        assert!(!tree.contains(&BlockId::from("a")));
        assert!(!tree.remove(&BlockId::from("note")));
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut tree = sample();
        let block = BlockSnapshot::paragraph(BlockId::from("c"), "gamma");
        tree.check_insertable(std::slice::from_ref(&block)).unwrap();
        tree.insert(&block, &BlockId::from("note"), 99).unwrap();
        assert_eq!(tree.index_of(&BlockId::from("c")), Some(2));
    }

    #[test]
    fn test_check_insertable_rejects_existing_id() {
        let tree = sample();
        let block = BlockSnapshot::paragraph(BlockId::from("a"), "again");
        assert!(tree.check_insertable(&[block]).is_err());
    }

    #[test]
    fn test_char_range_counts_chars() {
        let text = "héllo";
        assert_eq!(&text[char_range(text, 1, 3)], "él");
        assert_eq!(&text[char_range(text, 3, 99)], "lo");
        assert_eq!(&text[char_range(text, 9, 12)], "");
    }
}

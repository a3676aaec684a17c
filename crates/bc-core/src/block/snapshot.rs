use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::block::flavour::{self, props};
use crate::ids::{BlockId, DocId, WorkspaceId};

/// Serializable, document-independent copy of one block and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub id: BlockId,
    pub flavour: String,
    #[serde(default)]
    pub props: Map<String, Value>,
    #[serde(default)]
    pub children: Vec<BlockSnapshot>,
}

impl BlockSnapshot {
    pub fn new(id: BlockId, flavour: impl Into<String>) -> Self {
        Self {
            id,
            flavour: flavour.into(),
            props: Map::new(),
            children: Vec::new(),
        }
    }

    pub fn paragraph(id: BlockId, text: impl Into<String>) -> Self {
        Self::new(id, flavour::PARAGRAPH)
            .with_prop(props::TYPE, "text")
            .with_prop(props::TEXT, text.into())
    }

    pub fn with_prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<BlockSnapshot>) -> Self {
        self.children = children;
        self
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    pub fn text(&self) -> Option<&str> {
        self.prop_str(props::TEXT)
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.props
            .insert(props::TEXT.to_string(), Value::String(text.into()));
    }

    /// Pre-order visit of this block and every descendant.
    pub fn visit(&self, f: &mut impl FnMut(&BlockSnapshot)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Pre-order mutable visit of this block and every descendant.
    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut BlockSnapshot)) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }

    /// Number of blocks in this subtree, including self.
    pub fn block_count(&self) -> usize {
        1 + self.children.iter().map(BlockSnapshot::block_count).sum::<usize>()
    }

    /// Structure of the subtree with identifiers left out.
    ///
    /// Two snapshots with equal shapes hold the same content even when their
    /// block ids differ (e.g. before and after a paste).
    pub fn shape(&self) -> Value {
        let mut shape_props = self.props.clone();
        shape_props.remove(props::BLOCK_ID);
        serde_json::json!({
            "flavour": self.flavour,
            "props": shape_props,
            "children": self.children.iter().map(BlockSnapshot::shape).collect::<Vec<_>>(),
        })
    }
}

/// The unit carried through adapters and middlewares: the top-level blocks of
/// a copied selection plus the document they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceSnapshot {
    pub content: Vec<BlockSnapshot>,
    pub doc_id: DocId,
    pub workspace_id: WorkspaceId,
}

impl SliceSnapshot {
    pub fn new(content: Vec<BlockSnapshot>, doc_id: DocId, workspace_id: WorkspaceId) -> Self {
        Self {
            content,
            doc_id,
            workspace_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn block_count(&self) -> usize {
        self.content.iter().map(BlockSnapshot::block_count).sum()
    }

    pub fn visit(&self, f: &mut impl FnMut(&BlockSnapshot)) {
        for block in &self.content {
            block.visit(f);
        }
    }

    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut BlockSnapshot)) {
        for block in &mut self.content {
            block.visit_mut(f);
        }
    }

    pub fn block_ids(&self) -> Vec<BlockId> {
        let mut ids = Vec::with_capacity(self.block_count());
        self.visit(&mut |block: &BlockSnapshot| ids.push(block.id.clone()));
        ids
    }

    pub fn shape(&self) -> Vec<Value> {
        self.content.iter().map(BlockSnapshot::shape).collect()
    }
}

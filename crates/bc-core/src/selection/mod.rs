//! UI selection snapshots.
//!
//! Selections are ephemeral: they are read from the selection state provider
//! for every clipboard event and never persisted.

use serde::{Deserialize, Serialize};

use crate::ids::BlockId;

/// A caret range inside one block's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPoint {
    pub block_id: BlockId,
    pub index: usize,
    pub length: usize,
}

impl TextPoint {
    pub fn new(block_id: BlockId, index: usize, length: usize) -> Self {
        Self {
            block_id,
            index,
            length,
        }
    }

    pub fn caret(block_id: BlockId, index: usize) -> Self {
        Self::new(block_id, index, 0)
    }
}

/// Text selection: `from` alone for a range within one block, or `from`
/// (to the end of its block) through `to` (from the start of its block).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSelection {
    pub from: TextPoint,
    #[serde(default)]
    pub to: Option<TextPoint>,
}

impl TextSelection {
    pub fn within(block_id: BlockId, index: usize, length: usize) -> Self {
        Self {
            from: TextPoint::new(block_id, index, length),
            to: None,
        }
    }

    pub fn spanning(from: TextPoint, to: TextPoint) -> Self {
        Self { from, to: Some(to) }
    }

    /// The point at the end of the selection.
    pub fn end(&self) -> &TextPoint {
        self.to.as_ref().unwrap_or(&self.from)
    }

    pub fn is_collapsed(&self) -> bool {
        self.to.is_none() && self.from.length == 0
    }

    pub fn is_multi_block(&self) -> bool {
        self.to
            .as_ref()
            .is_some_and(|to| to.block_id != self.from.block_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSelection {
    pub block_id: BlockId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSelection {
    pub block_id: BlockId,
}

/// Everything currently selected, as reported by the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    #[serde(default)]
    pub text: Option<TextSelection>,
    #[serde(default)]
    pub blocks: Vec<BlockSelection>,
    #[serde(default)]
    pub images: Vec<ImageSelection>,
}

/// The selection a clipboard operation acts on, picked first-match-wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSnapshot {
    Text(TextSelection),
    Blocks(Vec<BlockId>),
    Images(Vec<BlockId>),
}

impl SelectionState {
    pub fn text(selection: TextSelection) -> Self {
        Self {
            text: Some(selection),
            ..Self::default()
        }
    }

    pub fn blocks<I: IntoIterator<Item = BlockId>>(ids: I) -> Self {
        Self {
            blocks: ids
                .into_iter()
                .map(|block_id| BlockSelection { block_id })
                .collect(),
            ..Self::default()
        }
    }

    pub fn images<I: IntoIterator<Item = BlockId>>(ids: I) -> Self {
        Self {
            images: ids
                .into_iter()
                .map(|block_id| ImageSelection { block_id })
                .collect(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.blocks.is_empty() && self.images.is_empty()
    }

    /// Text, then block, then image selection; `None` when nothing is selected.
    pub fn snapshot(&self) -> Option<SelectionSnapshot> {
        if let Some(text) = &self.text {
            return Some(SelectionSnapshot::Text(text.clone()));
        }
        if !self.blocks.is_empty() {
            return Some(SelectionSnapshot::Blocks(
                self.blocks.iter().map(|s| s.block_id.clone()).collect(),
            ));
        }
        if !self.images.is_empty() {
            return Some(SelectionSnapshot::Images(
                self.images.iter().map(|s| s.block_id.clone()).collect(),
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_wins_over_blocks() {
        let state = SelectionState {
            text: Some(TextSelection::within(BlockId::from("a"), 0, 2)),
            blocks: vec![BlockSelection {
                block_id: BlockId::from("b"),
            }],
            images: vec![],
        };
        assert!(matches!(state.snapshot(), Some(SelectionSnapshot::Text(_))));
    }

    #[test]
    fn test_blocks_win_over_images() {
        let mut state = SelectionState::images([BlockId::from("img")]);
        state.blocks.push(BlockSelection {
            block_id: BlockId::from("b"),
        });
        assert_eq!(
            state.snapshot(),
            Some(SelectionSnapshot::Blocks(vec![BlockId::from("b")]))
        );
    }

    #[test]
    fn test_empty_state_has_no_snapshot() {
        assert!(SelectionState::default().snapshot().is_none());
    }

    #[test]
    fn test_end_of_selection() {
        let single = TextSelection::within(BlockId::from("a"), 1, 3);
        assert_eq!(single.end().block_id, BlockId::from("a"));
        let multi = TextSelection::spanning(
            TextPoint::new(BlockId::from("a"), 1, 4),
            TextPoint::new(BlockId::from("c"), 0, 2),
        );
        assert_eq!(multi.end().block_id, BlockId::from("c"));
        assert!(multi.is_multi_block());
    }
}

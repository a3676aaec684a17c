use crate::ids::BlockId;

/// Identifier allocation of the destination document.
///
/// The clipboard pipeline never invents ids itself.
pub trait IdGeneratorPort: Send + Sync {
    fn next_block_id(&self) -> BlockId;
}

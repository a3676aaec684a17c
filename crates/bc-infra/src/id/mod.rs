use bc_core::ports::IdGeneratorPort;
use bc_core::BlockId;

/// Mints random (v4) block ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl UuidIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdGeneratorPort for UuidIdGenerator {
    fn next_block_id(&self) -> BlockId {
        BlockId::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let ids = UuidIdGenerator::new();
        let a = ids.next_block_id();
        let b = ids.next_block_id();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }
}

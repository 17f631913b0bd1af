use serde::{Deserialize, Serialize};

/// Largest `initialCapacity` accepted by validation.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 24;

/// Sizing of the backing map handed to [`crate::Context::with_config`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextConfig {
    /// Entries to pre-allocate. Capped at [`MAX_INITIAL_CAPACITY`].
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
    /// Number of dashmap shards. Must be a power of two greater than one.
    #[serde(default)]
    pub shard_amount: Option<usize>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
            shard_amount: None,
        }
    }
}

fn default_initial_capacity() -> usize {
    0
}

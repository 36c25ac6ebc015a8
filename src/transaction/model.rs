use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A value transfer waiting in the pending pool or sealed inside a block.
///
/// Fields are declared in canonical (sorted) order: the block hasher
/// serializes them exactly as declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Any JSON number. Kept verbatim so `5` and `5.0` hash differently,
    /// the same way peers running other runtimes see them.
    pub amount: Number,
    pub recipient: String,
    pub sender: String,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: Number) -> Self {
        Self {
            amount,
            recipient: recipient.into(),
            sender: sender.into(),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Item, Units};

pub type OperationId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Money inserted into the machine
    Deposit,
    /// Whole balance paid back out
    Withdrawal,
    /// Souvenir bought
    Dispense,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Deposit => "deposit",
            OperationKind::Withdrawal => "withdrawal",
            OperationKind::Dispense => "dispense",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A successful ledger operation, as recorded in the session journal.
/// Operations are immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: OperationId,
    /// 1-based position in the session, assigned by the journal owner
    pub sequence: u64,
    pub kind: OperationKind,
    /// Units moved by this operation (always positive)
    pub amount: Units,
    /// Balance right after the operation
    pub balance_after: Units,
    /// The souvenir handed out, for dispenses only
    pub item: Option<Item>,
    pub recorded_at: DateTime<Utc>,
}

impl Operation {
    pub fn new(kind: OperationKind, amount: Units, balance_after: Units) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence: 0,
            kind,
            amount,
            balance_after,
            item: None,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Signed effect on the balance: deposits add, everything else takes away.
    pub fn balance_delta(&self) -> i128 {
        match self.kind {
            OperationKind::Deposit => i128::from(self.amount),
            OperationKind::Withdrawal | OperationKind::Dispense => -i128::from(self.amount),
        }
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Operation, OperationKind, Units};

/// Session totals. Totals are `u128`: a single deposit can be close to
/// `u64::MAX`, and withdrawals let the same money be counted again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_deposited: u128,
    pub total_withdrawn: u128,
    pub total_spent: u128,
    pub souvenirs_dispensed: u64,
    pub per_tier: Vec<TierSummary>,
    pub balance: Units,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSummary {
    pub price: Units,
    pub count: u64,
}

impl SessionSummary {
    /// Aggregate a journal. `balance` is the net of all balance movements.
    pub fn from_operations(operations: &[Operation]) -> Self {
        let mut summary = SessionSummary::default();
        let mut per_tier: BTreeMap<Units, u64> = BTreeMap::new();
        let mut net: i128 = 0;

        for op in operations {
            let amount = u128::from(op.amount);
            match op.kind {
                OperationKind::Deposit => summary.total_deposited += amount,
                OperationKind::Withdrawal => summary.total_withdrawn += amount,
                OperationKind::Dispense => {
                    summary.total_spent += amount;
                    summary.souvenirs_dispensed += 1;
                    *per_tier.entry(op.amount).or_insert(0) += 1;
                }
            }
            net += op.balance_delta();
        }

        // A ledger journal never takes the balance below zero or past u64::MAX.
        summary.balance = Units::try_from(net).unwrap_or_default();
        summary.per_tier = per_tier
            .into_iter()
            .map(|(price, count)| TierSummary { price, count })
            .collect();
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;

    #[test]
    fn test_empty_journal() {
        assert_eq!(
            SessionSummary::from_operations(&[]),
            SessionSummary::default()
        );
    }

    #[test]
    fn test_totals_balance_out() {
        let item = Item::new("Mug", "images/mug.png");
        let ops = vec![
            Operation::new(OperationKind::Deposit, 100, 100),
            Operation::new(OperationKind::Dispense, 30, 70).with_item(item.clone()),
            Operation::new(OperationKind::Dispense, 10, 60).with_item(item.clone()),
            Operation::new(OperationKind::Dispense, 30, 30).with_item(item),
            Operation::new(OperationKind::Withdrawal, 30, 0),
            Operation::new(OperationKind::Deposit, 5, 5),
        ];

        let summary = SessionSummary::from_operations(&ops);
        assert_eq!(summary.total_deposited, 105);
        assert_eq!(summary.total_spent, 70);
        assert_eq!(summary.total_withdrawn, 30);
        assert_eq!(summary.souvenirs_dispensed, 3);
        assert_eq!(summary.balance, 5);
        assert_eq!(
            summary.per_tier,
            vec![
                TierSummary {
                    price: 10,
                    count: 1
                },
                TierSummary {
                    price: 30,
                    count: 2
                },
            ]
        );
        assert_eq!(
            summary.total_deposited - summary.total_withdrawn - summary.total_spent,
            u128::from(summary.balance)
        );
        assert_eq!(summary.balance, ops.last().unwrap().balance_after);
    }

    #[test]
    fn test_totals_do_not_overflow_on_large_cycles() {
        let max = i64::MAX as Units;
        let mut ops = Vec::new();
        for _ in 0..3 {
            ops.push(Operation::new(OperationKind::Deposit, max, max));
            ops.push(Operation::new(OperationKind::Withdrawal, max, 0));
        }
        ops.push(Operation::new(OperationKind::Deposit, max, max));

        let summary = SessionSummary::from_operations(&ops);
        assert_eq!(summary.total_deposited, 4 * u128::from(max));
        assert_eq!(summary.total_withdrawn, 3 * u128::from(max));
        assert_eq!(summary.balance, max);
        assert_eq!(
            summary.total_deposited - summary.total_withdrawn - summary.total_spent,
            u128::from(summary.balance)
        );
    }
}

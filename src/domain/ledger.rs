use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::{Catalog, Item, Units};

/// Everything that can go wrong in a single ledger operation.
/// None of these are fatal: the ledger is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VendingError {
    #[error("Please enter a valid amount.")]
    InvalidAmount,

    #[error("No funds to withdraw.")]
    NoFunds,

    #[error("Insufficient funds.")]
    InsufficientFunds { balance: Units, price: Units },

    #[error("No souvenirs are sold for {0} ₽.")]
    UnknownTier(Units),
}

/// Outcome of a successful dispense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispensed {
    pub item: Item,
    pub price: Units,
    pub balance: Units,
}

/// The machine's money and assortment.
///
/// Holds a single non-negative balance and an immutable catalog. All state
/// changes go through `deposit`, `withdraw` and `dispense`; a failed call never
/// touches the balance.
#[derive(Debug)]
pub struct VendingLedger<R: Rng = StdRng> {
    catalog: Catalog,
    balance: Units,
    rng: R,
}

impl VendingLedger<StdRng> {
    /// Create an empty ledger whose item selection is seeded from OS entropy.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_rng(catalog, StdRng::from_entropy())
    }

    /// Create an empty ledger with reproducible item selection.
    pub fn seeded(catalog: Catalog, seed: u64) -> Self {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> VendingLedger<R> {
    pub fn with_rng(catalog: Catalog, rng: R) -> Self {
        Self {
            catalog,
            balance: 0,
            rng,
        }
    }

    pub fn balance(&self) -> Units {
        self.balance
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Add `amount` to the balance and return the new balance.
    /// Only strictly positive amounts are accepted.
    pub fn deposit(&mut self, amount: i64) -> Result<Units, VendingError> {
        if amount <= 0 {
            return Err(VendingError::InvalidAmount);
        }

        let balance = self
            .balance
            .checked_add(amount.unsigned_abs())
            .ok_or(VendingError::InvalidAmount)?;
        self.balance = balance;
        Ok(balance)
    }

    /// Pay out the whole balance at once. Returns the amount paid out.
    pub fn withdraw(&mut self) -> Result<Units, VendingError> {
        if self.balance == 0 {
            return Err(VendingError::NoFunds);
        }
        Ok(std::mem::take(&mut self.balance))
    }

    /// Charge `tier` and hand out one of its items, chosen uniformly at random.
    /// Items are never used up: every call samples the full tier again.
    pub fn dispense(&mut self, tier: Units) -> Result<Dispensed, VendingError> {
        let items = self
            .catalog
            .items(tier)
            .ok_or(VendingError::UnknownTier(tier))?;

        if self.balance < tier {
            return Err(VendingError::InsufficientFunds {
                balance: self.balance,
                price: tier,
            });
        }

        // Tiers are checked non-empty when the catalog is built.
        let item = items[self.rng.gen_range(0..items.len())].clone();

        self.balance -= tier;
        Ok(Dispensed {
            item,
            price: tier,
            balance: self.balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> VendingLedger {
        VendingLedger::seeded(Catalog::default(), 7)
    }

    fn tier_names(ledger: &VendingLedger, tier: Units) -> Vec<String> {
        ledger
            .catalog()
            .items(tier)
            .unwrap()
            .iter()
            .map(|item| item.name.clone())
            .collect()
    }

    #[test]
    fn test_new_ledger_is_empty() {
        let ledger = VendingLedger::new(Catalog::default());
        assert_eq!(ledger.balance(), 0);
    }

    #[test]
    fn test_deposits_accumulate() {
        let mut ledger = ledger();
        assert_eq!(ledger.deposit(10), Ok(10));
        assert_eq!(ledger.deposit(20), Ok(30));
        assert_eq!(ledger.balance(), 30);
    }

    #[test]
    fn test_deposit_rejects_non_positive() {
        let mut ledger = ledger();
        ledger.deposit(15).unwrap();

        for amount in [0, -1, -100, i64::MIN] {
            assert_eq!(ledger.deposit(amount), Err(VendingError::InvalidAmount));
            assert_eq!(ledger.balance(), 15);
        }
    }

    #[test]
    fn test_deposit_rejects_overflow() {
        let mut ledger = ledger();
        ledger.deposit(i64::MAX).unwrap();
        ledger.deposit(i64::MAX).unwrap();
        assert_eq!(ledger.deposit(i64::MAX), Err(VendingError::InvalidAmount));
        assert_eq!(ledger.balance(), 2 * i64::MAX as u64);
    }

    #[test]
    fn test_withdraw_clears_balance() {
        let mut ledger = ledger();
        ledger.deposit(50).unwrap();
        assert_eq!(ledger.withdraw(), Ok(50));
        assert_eq!(ledger.balance(), 0);
    }

    #[test]
    fn test_withdraw_without_funds() {
        let mut ledger = ledger();
        assert_eq!(ledger.withdraw(), Err(VendingError::NoFunds));
        assert_eq!(ledger.withdraw(), Err(VendingError::NoFunds));
        assert_eq!(ledger.balance(), 0);
    }

    #[test]
    fn test_dispense_insufficient_funds() {
        let mut ledger = ledger();
        ledger.deposit(5).unwrap();
        assert_eq!(
            ledger.dispense(10),
            Err(VendingError::InsufficientFunds {
                balance: 5,
                price: 10
            })
        );
        assert_eq!(ledger.balance(), 5);
    }

    #[test]
    fn test_dispense_exact_balance() {
        let mut ledger = ledger();
        ledger.deposit(10).unwrap();

        let dispensed = ledger.dispense(10).unwrap();
        assert!(tier_names(&ledger, 10).contains(&dispensed.item.name));
        assert_eq!(dispensed.price, 10);
        assert_eq!(dispensed.balance, 0);
        assert_eq!(ledger.balance(), 0);
    }

    #[test]
    fn test_dispense_picks_from_tier_bounds() {
        let single = Item::new("Pin", "pin.png");
        let catalog = Catalog::new(vec![
            (5, vec![single.clone()]),
            (7, vec![Item::new("A", "a.png"), Item::new("B", "b.png")]),
        ])
        .unwrap();
        let mut ledger = VendingLedger::seeded(catalog, 1);
        ledger.deposit(1000).unwrap();

        for _ in 0..20 {
            assert_eq!(ledger.dispense(5).unwrap().item, single);
        }

        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..100 {
            seen.insert(ledger.dispense(7).unwrap().item.name);
        }
        assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(ledger.balance(), 1000 - 20 * 5 - 100 * 7);
    }

    #[test]
    fn test_dispense_unknown_tier() {
        let mut ledger = ledger();
        ledger.deposit(100).unwrap();
        assert_eq!(ledger.dispense(99), Err(VendingError::UnknownTier(99)));
        assert_eq!(ledger.balance(), 100);
    }

    #[test]
    fn test_unknown_tier_checked_before_funds() {
        let mut ledger = ledger();
        assert_eq!(ledger.dispense(0), Err(VendingError::UnknownTier(0)));
    }

    #[test]
    fn test_same_seed_same_items() {
        let mut a = ledger();
        let mut b = ledger();
        a.deposit(400).unwrap();
        b.deposit(400).unwrap();

        for tier in [10, 20, 30, 40, 10, 20, 30, 40] {
            assert_eq!(a.dispense(tier), b.dispense(tier));
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            VendingError::InvalidAmount.to_string(),
            "Please enter a valid amount."
        );
        assert_eq!(VendingError::NoFunds.to_string(), "No funds to withdraw.");
        assert_eq!(
            VendingError::InsufficientFunds {
                balance: 0,
                price: 10
            }
            .to_string(),
            "Insufficient funds."
        );
        assert_eq!(
            VendingError::UnknownTier(99).to_string(),
            "No souvenirs are sold for 99 ₽."
        );
    }
}

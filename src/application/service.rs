use log::{info, warn};
use rand::Rng;
use rand::rngs::StdRng;

use crate::domain::{
    Catalog, Item, Operation, OperationKind, Units, VendingError, VendingLedger, format_units,
    parse_amount,
};

use super::{AppError, SessionSummary};

/// Application service wrapping the vending ledger.
/// This is the primary interface for any client (CLI, tests, a GUI front end).
///
/// It validates raw user input, forwards to the ledger, and keeps an in-memory
/// journal of every operation that succeeded.
pub struct MachineService<R: Rng = StdRng> {
    ledger: VendingLedger<R>,
    journal: Vec<Operation>,
}

/// Result of a deposit
#[derive(Debug, Clone)]
pub struct DepositReceipt {
    pub operation: Operation,
    pub amount: Units,
    pub balance: Units,
}

/// Result of a withdrawal
#[derive(Debug, Clone)]
pub struct WithdrawalReceipt {
    pub operation: Operation,
    pub amount: Units,
}

/// Result of buying a souvenir
#[derive(Debug, Clone)]
pub struct DispenseReceipt {
    pub operation: Operation,
    pub item: Item,
    pub price: Units,
    pub balance: Units,
}

impl MachineService<StdRng> {
    /// Create a service with an empty ledger and entropy-seeded dispensing.
    pub fn new(catalog: Catalog) -> Self {
        Self::from_ledger(VendingLedger::new(catalog))
    }

    /// Create a service whose dispense sequence is reproducible.
    pub fn with_seed(catalog: Catalog, seed: u64) -> Self {
        Self::from_ledger(VendingLedger::seeded(catalog, seed))
    }
}

impl<R: Rng> MachineService<R> {
    pub fn with_rng(catalog: Catalog, rng: R) -> Self {
        Self::from_ledger(VendingLedger::with_rng(catalog, rng))
    }

    fn from_ledger(ledger: VendingLedger<R>) -> Self {
        Self {
            ledger,
            journal: Vec::new(),
        }
    }

    pub fn balance(&self) -> Units {
        self.ledger.balance()
    }

    pub fn catalog(&self) -> &Catalog {
        self.ledger.catalog()
    }

    /// All successful operations of this session, oldest first.
    pub fn journal(&self) -> &[Operation] {
        &self.journal
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_operations(&self.journal)
    }

    // ========================
    // Money operations
    // ========================

    /// Deposit a parsed amount.
    pub fn deposit(&mut self, amount: i64) -> Result<DepositReceipt, AppError> {
        let balance = self.ledger.deposit(amount).inspect_err(|e| {
            warn!("deposit of {} rejected: {}", amount, e);
        })?;
        let amount = amount.unsigned_abs();

        let operation = self.record(Operation::new(OperationKind::Deposit, amount, balance));
        info!(
            "deposited {} (balance {})",
            format_units(amount),
            format_units(balance)
        );

        Ok(DepositReceipt {
            operation,
            amount,
            balance,
        })
    }

    /// Deposit an amount typed by the user.
    /// Anything that is not a positive whole number is an invalid amount.
    pub fn deposit_input(&mut self, input: &str) -> Result<DepositReceipt, AppError> {
        let amount = parse_amount(input).map_err(|e| {
            warn!("deposit input {:?} rejected: {}", input, e);
            VendingError::InvalidAmount
        })?;
        self.deposit(amount)
    }

    /// Pay out the whole balance.
    pub fn withdraw(&mut self) -> Result<WithdrawalReceipt, AppError> {
        let amount = self.ledger.withdraw().inspect_err(|e| {
            warn!("withdrawal rejected: {}", e);
        })?;

        let operation = self.record(Operation::new(OperationKind::Withdrawal, amount, 0));
        info!("withdrew {}", format_units(amount));

        Ok(WithdrawalReceipt { operation, amount })
    }

    // ========================
    // Souvenir operations
    // ========================

    /// Buy a random souvenir from the tier priced at `tier`.
    pub fn dispense(&mut self, tier: Units) -> Result<DispenseReceipt, AppError> {
        let dispensed = self.ledger.dispense(tier).inspect_err(|e| {
            warn!("dispense from tier {} rejected: {}", tier, e);
        })?;

        let operation = self.record(
            Operation::new(OperationKind::Dispense, dispensed.price, dispensed.balance)
                .with_item(dispensed.item.clone()),
        );
        info!(
            "dispensed {:?} for {} (balance {})",
            dispensed.item.name,
            format_units(dispensed.price),
            format_units(dispensed.balance)
        );

        Ok(DispenseReceipt {
            operation,
            item: dispensed.item,
            price: dispensed.price,
            balance: dispensed.balance,
        })
    }

    fn record(&mut self, operation: Operation) -> Operation {
        let sequence = self.journal.len() as u64 + 1;
        let operation = operation.with_sequence(sequence);
        self.journal.push(operation.clone());
        operation
    }
}

// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use souvenir_machine::MachineService;
use souvenir_machine::cli::Session;
use souvenir_machine::domain::{Catalog, Units, VendingLedger};

pub const SEED: u64 = 2024;

/// Ledger over the stock catalog with a fixed seed
pub fn test_ledger() -> VendingLedger {
    VendingLedger::seeded(Catalog::default(), SEED)
}

/// Service over the stock catalog with a fixed seed
pub fn test_service() -> MachineService {
    MachineService::with_seed(Catalog::default(), SEED)
}

/// Names of the items sold in `tier`
pub fn tier_names(catalog: &Catalog, tier: Units) -> Vec<String> {
    catalog
        .items(tier)
        .unwrap_or_default()
        .iter()
        .map(|item| item.name.clone())
        .collect()
}

/// Feed `script` (one command per line) to a session and return everything it printed
pub fn run_script(service: &mut MachineService, script: &str) -> String {
    let mut output = Vec::new();
    Session::new(service)
        .run(script.as_bytes(), &mut output)
        .expect("session failed");
    String::from_utf8(output).expect("session output is not UTF-8")
}

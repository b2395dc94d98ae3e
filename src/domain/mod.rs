mod catalog;
mod journal;
mod ledger;
mod money;

pub use catalog::*;
pub use journal::*;
pub use ledger::*;
pub use money::*;

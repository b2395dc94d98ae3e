// Application layer - use cases on top of the vending ledger.
// Clients (CLI session, tests) talk to `MachineService`, never to the ledger directly.

pub mod error;
pub mod report;
pub mod service;

pub use error::*;
pub use report::*;
pub use service::*;

//! Ledger core: aggregation, reconciliation, rates, sites, and the
//! snapshot/write-queue machinery they run on.

pub mod aggregate;
pub mod ledger;
pub mod log;
pub mod places;
pub mod rates;
pub mod reconcile;
pub mod writer;

pub use ledger::Ledger;
pub use rates::{PolicyRates, RateLookup, RatePolicy};
pub use reconcile::SaveOutcome;
pub use writer::{ErrorBus, WriteFailure, WriteOp};

//! Batch scheduling over an input table.
//!
//! Entries are read eagerly, processed by an [`ItemPipeline`] under a fixed
//! concurrency cap, and their outcomes are written to two ledgers (one for
//! successes, one for failures) in completion order.
//!
//! [`ItemPipeline`]: crate::pipeline::ItemPipeline

mod error;
mod input;
mod ledger;
mod scheduler;

pub use error::{InputError, LedgerError};
pub use input::{parse_entries, read_entries};
pub use ledger::Ledgers;
pub use scheduler::{BatchScheduler, BatchSummary};

//! Persistence layer
//!
//! SQLite-based storage for captured leads.

mod database;
mod leads;

pub use database::{Database, SharedDatabase};
pub use leads::{Lead, LeadStore, LeadSummary};

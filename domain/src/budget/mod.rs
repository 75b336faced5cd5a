//! Budget accounting
//!
//! The [`BudgetLedger`] gates phase admission against a hard ceiling and
//! accumulates actual spend; the [`PricingTable`] converts token usage into
//! integer cents.

pub mod ledger;
pub mod pricing;

pub use ledger::{Admission, BudgetLedger};
pub use pricing::{PricingTable, ReviewerPricing};

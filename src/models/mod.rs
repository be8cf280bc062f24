mod filter;
mod range;
mod transaction;

pub use filter::TransactionFilter;
pub use range::DateRange;
pub use transaction::{Transaction, TransactionType};

use super::{Transaction, TransactionType};

/// In-memory filter behind the transaction table. Every criterion left as
/// `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    /// Case-insensitive; matched against the description and the amount as
    /// text, either as stored (`75.5`) or with two decimals (`75.50`).
    pub search: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        if self.kind.is_some_and(|k| k != txn.kind) {
            return false;
        }
        if self.category.as_deref().is_some_and(|c| c != txn.category) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                txn.description.to_lowercase().contains(&term)
                    || txn.amount.to_string().contains(&term)
                    || format!("{:.2}", txn.amount).contains(&term)
            }
            _ => true,
        }
    }

    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|t| self.matches(t))
            .cloned()
            .collect()
    }
}

pub(crate) const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    date        TEXT NOT NULL,
    description TEXT NOT NULL,
    amount      REAL NOT NULL,
    type        TEXT NOT NULL,
    category    TEXT NOT NULL
);
"#;

/// Applied only after the table's columns have been checked.
pub(crate) const CREATE_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
CREATE INDEX IF NOT EXISTS idx_transactions_description ON transactions(description);
"#;

/// Columns an existing `transactions` table must have for this program to
/// read and write it.
pub(crate) const REQUIRED_COLUMNS: &[&str] =
    &["id", "date", "description", "amount", "type", "category"];

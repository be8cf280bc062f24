//! Financial summaries derived from the full transaction set.
//!
//! Nothing is cached: each call reads the repository again, so results always
//! match what is stored. The `*_of` functions hold the arithmetic and work on
//! any slice of transactions.
use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::db::Repository;
use crate::error::Result;
use crate::models::{DateRange, Transaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FinancialSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
}

/// Parallel series for the monthly performance chart. All three vectors have
/// the same length, one entry per month that has data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonthlySummary {
    pub labels: Vec<String>,
    pub income: Vec<Decimal>,
    pub expenses: Vec<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: Decimal,
}

/// Dashboard targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Goals {
    pub sales_goal: f64,
    pub expense_limit: f64,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            sales_goal: 50_000.0,
            expense_limit: 40_000.0,
        }
    }
}

/// Progress towards [`Goals`], as fractions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GoalProgress {
    /// Income over the sales goal. May exceed 1.0.
    pub sales_ratio: f64,
    /// Share of the expense limit still unspent, clamped at 0.0.
    pub expense_headroom: f64,
}

pub struct Analytics<'a> {
    repo: &'a Repository,
}

impl<'a> Analytics<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self { repo }
    }

    pub fn financial_summary(&self, range: Option<DateRange>) -> Result<FinancialSummary> {
        let txns = self.repo.list_all()?;
        let summary = financial_summary_of(&txns, range);
        debug!(?range, ?summary, "computed financial summary");
        Ok(summary)
    }

    pub fn monthly_summary(&self, range: Option<DateRange>) -> Result<MonthlySummary> {
        let txns = self.repo.list_all()?;
        let summary = monthly_summary_of(&txns, range);
        debug!(?range, months = summary.labels.len(), "computed monthly summary");
        Ok(summary)
    }

    pub fn expenses_by_category(&self, range: Option<DateRange>) -> Result<Vec<CategoryTotal>> {
        let txns = self.repo.list_all()?;
        let totals = expenses_by_category_of(&txns, range);
        debug!(?range, categories = totals.len(), "computed expenses by category");
        Ok(totals)
    }

    /// Number of transactions inside `range`.
    pub fn transaction_count(&self, range: Option<DateRange>) -> Result<usize> {
        let txns = self.repo.list_all()?;
        Ok(txns.iter().filter(|t| in_range(t, range)).count())
    }

    pub fn goal_progress(&self, range: Option<DateRange>, goals: &Goals) -> Result<GoalProgress> {
        let summary = self.financial_summary(range)?;
        Ok(goal_progress_of(&summary, goals))
    }

    pub fn break_even_point(
        &self,
        fixed_costs: f64,
        price_per_unit: f64,
        variable_cost_per_unit: f64,
    ) -> f64 {
        break_even_point(fixed_costs, price_per_unit, variable_cost_per_unit)
    }
}

fn in_range(txn: &Transaction, range: Option<DateRange>) -> bool {
    range.map_or(true, |r| r.contains(txn.date))
}

pub fn financial_summary_of(txns: &[Transaction], range: Option<DateRange>) -> FinancialSummary {
    let mut summary = FinancialSummary::default();
    for txn in txns.iter().filter(|t| in_range(t, range)) {
        match txn.kind {
            TransactionType::Income => summary.total_income += txn.amount,
            TransactionType::Expense => summary.total_expenses += txn.amount,
        }
    }
    summary.net_profit = summary.total_income - summary.total_expenses;
    summary
}

struct MonthBucket {
    label: String,
    income: Decimal,
    expenses: Decimal,
}

pub fn monthly_summary_of(txns: &[Transaction], range: Option<DateRange>) -> MonthlySummary {
    // Keyed by (year, month) so iteration is chronological.
    let mut months: BTreeMap<(i32, u32), MonthBucket> = BTreeMap::new();
    for txn in txns.iter().filter(|t| in_range(t, range)) {
        let bucket = months
            .entry((txn.date.year(), txn.date.month()))
            .or_insert_with(|| MonthBucket {
                label: txn.date.format("%b %y").to_string(),
                income: Decimal::ZERO,
                expenses: Decimal::ZERO,
            });
        match txn.kind {
            TransactionType::Income => bucket.income += txn.amount,
            TransactionType::Expense => bucket.expenses += txn.amount,
        }
    }

    let mut summary = MonthlySummary::default();
    for bucket in months.into_values() {
        summary.labels.push(bucket.label);
        summary.income.push(bucket.income);
        summary.expenses.push(bucket.expenses);
    }
    summary
}

/// Expense totals per category, ordered by category name.
pub fn expenses_by_category_of(txns: &[Transaction], range: Option<DateRange>) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for txn in txns
        .iter()
        .filter(|t| t.is_expense() && in_range(t, range))
    {
        *totals.entry(txn.category.as_str()).or_insert(Decimal::ZERO) += txn.amount;
    }
    totals
        .into_iter()
        .map(|(category, total_amount)| CategoryTotal {
            category: category.to_string(),
            total_amount,
        })
        .collect()
}

/// Units that must be sold to cover `fixed_costs`.
///
/// Returns `f64::INFINITY` when each unit sold does not earn anything over
/// its variable cost, or when the margin is not a number.
pub fn break_even_point(fixed_costs: f64, price_per_unit: f64, variable_cost_per_unit: f64) -> f64 {
    let margin = price_per_unit - variable_cost_per_unit;
    if margin.is_nan() || margin <= 0.0 {
        return f64::INFINITY;
    }
    fixed_costs / margin
}

pub fn goal_progress_of(summary: &FinancialSummary, goals: &Goals) -> GoalProgress {
    let income = summary.total_income.to_f64().unwrap_or(0.0);
    let expenses = summary.total_expenses.to_f64().unwrap_or(0.0);

    let sales_ratio = if goals.sales_goal > 0.0 {
        income / goals.sales_goal
    } else {
        0.0
    };
    let expense_headroom = if goals.expense_limit > 0.0 {
        (1.0 - expenses / goals.expense_limit).max(0.0)
    } else {
        0.0
    };

    GoalProgress {
        sales_ratio,
        expense_headroom,
    }
}

use anyhow::{bail, Context, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::io::Write;

use bookkeeper::analytics::{self, Analytics};
use bookkeeper::format::{format_amount, format_percent, format_units, truncate};
use bookkeeper::models::{DateRange, Transaction, TransactionFilter, TransactionType};
use bookkeeper::{Config, Repository};

use crate::cli::{AddArgs, Command, EditArgs, ListArgs, RangeArgs};

pub(crate) fn as_cli(command: Option<Command>, repo: &Repository, config: &Config) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(
        command.unwrap_or(Command::Summary(RangeArgs::default())),
        repo,
        config,
        &mut out,
    )
}

pub(crate) fn execute(
    command: Command,
    repo: &Repository,
    config: &Config,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Add(args) => cli_add(args, repo, config, out),
        Command::Edit(args) => cli_edit(args, repo, config, out),
        Command::Delete { id } => cli_delete(id, repo, out),
        Command::Show { id } => cli_show(id, repo, config, out),
        Command::List(args) => cli_list(args, repo, config, out),
        Command::Descriptions => cli_descriptions(repo, out),
        Command::Categories { kind } => cli_categories(kind, config, out),
        Command::Summary(range) => cli_summary(&range, repo, config, out),
        Command::Monthly(range) => cli_monthly(&range, repo, config, out),
        Command::Expenses(range) => cli_expenses(&range, repo, config, out),
        Command::BreakEven {
            fixed_costs,
            price_per_unit,
            variable_cost_per_unit,
        } => cli_break_even(fixed_costs, price_per_unit, variable_cost_per_unit, config, out),
    }
}

fn cli_add(args: AddArgs, repo: &Repository, config: &Config, out: &mut impl Write) -> Result<()> {
    let description = args.description.trim().to_string();
    let previous = repo.get_latest_by_description(&description)?;
    if previous.is_some() {
        tracing::debug!(%description, "pre-filling from previous transaction");
    }

    let kind = args
        .kind
        .or(previous.as_ref().map(|p| p.kind))
        .context("--type is required for a new description")?;
    let amount = args
        .amount
        .or(previous.as_ref().map(|p| p.amount))
        .context("--amount is required for a new description")?;
    let category = match (args.category, &previous) {
        (Some(c), _) => c.trim().to_string(),
        (None, Some(p)) => p.category.clone(),
        (None, None) => bail!("--category is required for a new description"),
    };
    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let stored = repo.create(&Transaction::new(date, description, amount, kind, category))?;
    if !config
        .suggested_categories(kind)
        .iter()
        .any(|c| *c == stored.category)
    {
        tracing::info!(category = %stored.category, "category is not in the suggested list");
    }

    writeln!(out, "Saved transaction {}", stored.id.unwrap_or_default())?;
    print_transaction(&stored, config, out)
}

fn cli_edit(args: EditArgs, repo: &Repository, config: &Config, out: &mut impl Write) -> Result<()> {
    let Some(mut txn) = repo.get_by_id(args.id)? else {
        bail!("Transaction {} not found", args.id);
    };

    if let Some(d) = args.date {
        txn.date = d;
    }
    if let Some(desc) = args.description {
        txn.description = desc.trim().to_string();
    }
    if let Some(a) = args.amount {
        txn.amount = a;
    }
    if let Some(k) = args.kind {
        txn.kind = k;
    }
    if let Some(c) = args.category {
        txn.category = c.trim().to_string();
    }

    repo.update(&txn)?;
    writeln!(out, "Updated transaction {}", args.id)?;
    print_transaction(&txn, config, out)
}

fn cli_delete(id: i64, repo: &Repository, out: &mut impl Write) -> Result<()> {
    if repo.get_by_id(id)?.is_none() {
        writeln!(out, "No transaction {id}")?;
        return Ok(());
    }
    repo.delete(id)?;
    writeln!(out, "Deleted transaction {id}")?;
    Ok(())
}

fn cli_show(id: i64, repo: &Repository, config: &Config, out: &mut impl Write) -> Result<()> {
    match repo.get_by_id(id)? {
        Some(txn) => print_transaction(&txn, config, out),
        None => bail!("Transaction {id} not found"),
    }
}

fn print_transaction(txn: &Transaction, config: &Config, out: &mut impl Write) -> Result<()> {
    writeln!(out, "  ID:          {}", txn.id.unwrap_or_default())?;
    writeln!(out, "  Date:        {}", txn.date)?;
    writeln!(out, "  Description: {}", txn.description)?;
    writeln!(out, "  Amount:      {}", format_amount(txn.amount, &config.currency_symbol))?;
    writeln!(out, "  Type:        {}", txn.kind)?;
    writeln!(out, "  Category:    {}", txn.category)?;
    Ok(())
}

fn cli_list(args: ListArgs, repo: &Repository, config: &Config, out: &mut impl Write) -> Result<()> {
    let filter = TransactionFilter {
        kind: args.kind,
        category: args.category,
        search: args.search,
    };
    let mut txns = filter.apply(&repo.list_all()?);
    if let Some(limit) = args.limit {
        txns.truncate(limit);
    }
    if txns.is_empty() {
        writeln!(out, "No transactions")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<5} {:<10} {:<28} {:<8} {:<20} {:>14}",
        "ID", "Date", "Description", "Type", "Category", "Amount"
    )?;
    writeln!(out, "{}", "─".repeat(90))?;
    for txn in &txns {
        writeln!(
            out,
            "{:<5} {:<10} {:<28} {:<8} {:<20} {:>14}",
            txn.id.unwrap_or_default(),
            txn.date,
            truncate(&txn.description, 28),
            txn.kind.label(),
            truncate(&txn.category, 20),
            format_amount(txn.amount, &config.currency_symbol),
        )?;
    }
    Ok(())
}

fn cli_descriptions(repo: &Repository, out: &mut impl Write) -> Result<()> {
    for description in repo.list_unique_descriptions()? {
        writeln!(out, "{description}")?;
    }
    Ok(())
}

fn cli_categories(kind: Option<TransactionType>, config: &Config, out: &mut impl Write) -> Result<()> {
    let kinds: &[TransactionType] = match &kind {
        Some(k) => std::slice::from_ref(k),
        None => TransactionType::all(),
    };
    for k in kinds {
        writeln!(out, "{k}:")?;
        for name in config.suggested_categories(*k) {
            writeln!(out, "  {name}")?;
        }
    }
    Ok(())
}

fn period_label(range: Option<DateRange>) -> String {
    range.map_or_else(|| "all time".to_string(), |r| r.to_string())
}

fn cli_summary(range: &RangeArgs, repo: &Repository, config: &Config, out: &mut impl Write) -> Result<()> {
    let range = range.to_range()?;
    let analytics = Analytics::new(repo);
    let summary = analytics.financial_summary(range)?;
    let progress = analytics.goal_progress(range, &config.goals)?;
    let count = analytics.transaction_count(range)?;
    let symbol = &config.currency_symbol;

    writeln!(out, "Bookkeeper - {}", period_label(range))?;
    writeln!(out, "{}", "─".repeat(40))?;
    writeln!(out, "  Income:       {}", format_amount(summary.total_income, symbol))?;
    writeln!(out, "  Expenses:     {}", format_amount(summary.total_expenses, symbol))?;
    writeln!(out, "  Net profit:   {}", format_amount(summary.net_profit, symbol))?;
    writeln!(out, "  Transactions: {count}")?;
    writeln!(out)?;
    writeln!(
        out,
        "  Sales goal:      {} of {}",
        format_percent(progress.sales_ratio),
        format_goal(config.goals.sales_goal, symbol),
    )?;
    writeln!(
        out,
        "  Expense control: {} of {} left",
        format_percent(progress.expense_headroom),
        format_goal(config.goals.expense_limit, symbol),
    )?;
    Ok(())
}

fn format_goal(goal: f64, symbol: &str) -> String {
    Decimal::try_from(goal)
        .map(|g| format_amount(g, symbol))
        .unwrap_or_else(|_| format!("{symbol}{goal}"))
}

fn cli_monthly(range: &RangeArgs, repo: &Repository, config: &Config, out: &mut impl Write) -> Result<()> {
    let range = range.to_range()?;
    let monthly = Analytics::new(repo).monthly_summary(range)?;
    if monthly.labels.is_empty() {
        writeln!(out, "No transactions for {}", period_label(range))?;
        return Ok(());
    }

    let symbol = &config.currency_symbol;
    writeln!(out, "{:<8} {:>16} {:>16} {:>16}", "Month", "Income", "Expenses", "Net")?;
    writeln!(out, "{}", "─".repeat(59))?;
    for ((label, income), expenses) in monthly
        .labels
        .iter()
        .zip(&monthly.income)
        .zip(&monthly.expenses)
    {
        writeln!(
            out,
            "{:<8} {:>16} {:>16} {:>16}",
            label,
            format_amount(*income, symbol),
            format_amount(*expenses, symbol),
            format_amount(*income - *expenses, symbol),
        )?;
    }
    Ok(())
}

fn cli_expenses(range: &RangeArgs, repo: &Repository, config: &Config, out: &mut impl Write) -> Result<()> {
    let range = range.to_range()?;
    let totals = Analytics::new(repo).expenses_by_category(range)?;
    if totals.is_empty() {
        writeln!(out, "No expenses for {}", period_label(range))?;
        return Ok(());
    }

    let grand_total: Decimal = totals.iter().map(|t| t.total_amount).sum();
    let symbol = &config.currency_symbol;
    writeln!(out, "Expenses by category - {}", period_label(range))?;
    for total in &totals {
        let share = total
            .total_amount
            .checked_div(grand_total)
            .and_then(|r| r.to_f64())
            .unwrap_or(0.0);
        writeln!(
            out,
            "  {:<24} {:>14} {:>5}",
            truncate(&total.category, 24),
            format_amount(total.total_amount, symbol),
            format_percent(share),
        )?;
    }
    writeln!(out, "  {:<24} {:>14}", "Total", format_amount(grand_total, symbol))?;
    Ok(())
}

fn cli_break_even(
    fixed_costs: f64,
    price_per_unit: f64,
    variable_cost_per_unit: f64,
    config: &Config,
    out: &mut impl Write,
) -> Result<()> {
    let units = analytics::break_even_point(fixed_costs, price_per_unit, variable_cost_per_unit);
    writeln!(out, "Break-even point: {} units", format_units(units))?;
    if units.is_infinite() {
        writeln!(
            out,
            "  Unreachable: price per unit does not cover the variable cost per unit."
        )?;
    } else if let Some(revenue) = Decimal::try_from(units)
        .ok()
        .zip(Decimal::try_from(price_per_unit).ok())
        .and_then(|(u, p)| u.checked_mul(p))
    {
        writeln!(
            out,
            "  Revenue at break-even: {}",
            format_amount(revenue.round_dp(2), &config.currency_symbol)
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

//! Account-level summary statistics

use crate::error::{JournalError, Result};
use crate::types::{GroupedRow, ProfitBasis, Trade, TradingSession};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// High-level stats over one journal window.
#[derive(Debug, Clone, Default)]
pub struct AccountStats {
    pub wins: usize,
    pub total_trades: usize,
    pub stopped_out: usize,
    pub risk_managed: usize,
    pub trades_by_asset: BTreeMap<String, usize>,
    pub trades_by_session: BTreeMap<TradingSession, usize>,
    /// Rounded sum of the configured profit column over the detailed rows.
    pub pnl: Decimal,
    /// Always non-negative; `None` when the window has no losing rows to
    /// divide by.
    pub profit_factor: Option<Decimal>,
}

/// Reduce the aggregated trade table and the detailed (grouped, non-orphan)
/// rows into account stats.
///
/// Fails when the detailed set is empty or carries no initial balance
/// snapshot; no meaningful report can be produced from that.
pub fn build_stats(
    trades: &[Trade],
    detailed: &[GroupedRow],
    basis: ProfitBasis,
) -> Result<AccountStats> {
    let pnl = account_pnl(detailed, basis)?;
    let profit_factor = profit_factor(detailed, basis);

    let wins = trades
        .iter()
        .filter(|t| basis.of_trade(t) > Decimal::ZERO)
        .count();
    let stopped_out = trades.iter().filter(|t| t.stopped_out).count();
    let risk_managed = trades.iter().filter(|t| t.risk_managed).count();

    let mut trades_by_asset: BTreeMap<String, usize> = BTreeMap::new();
    for trade in trades {
        *trades_by_asset.entry(trade.symbol.clone()).or_default() += 1;
    }

    // a trade active in two sessions counts once per session
    let mut trades_by_session: BTreeMap<TradingSession, usize> = BTreeMap::new();
    for session in trades.iter().flat_map(|t| t.sessions.iter()) {
        *trades_by_session.entry(*session).or_default() += 1;
    }

    Ok(AccountStats {
        wins,
        total_trades: trades.len(),
        stopped_out,
        risk_managed,
        trades_by_asset,
        trades_by_session,
        pnl,
        profit_factor,
    })
}

fn account_pnl(detailed: &[GroupedRow], basis: ProfitBasis) -> Result<Decimal> {
    if detailed.is_empty() {
        return Err(JournalError::Dataset(
            "the detailed dataset is empty, unable to compute the account's total PnL".to_string(),
        ));
    }

    if detailed[0].row.account_balance.is_none() {
        return Err(JournalError::Dataset(
            "the initial wallet balance must be a valid number".to_string(),
        ));
    }

    Ok(detailed
        .iter()
        .filter_map(|r| basis.of_row(&r.row))
        .sum::<Decimal>()
        .round_dp(2)
        .normalize())
}

/// `-(Σ profits ≥ 0) / (Σ profits < 0)`, oriented positive. The loss sum is
/// negative by construction, so the sign flip lands non-negative.
fn profit_factor(detailed: &[GroupedRow], basis: ProfitBasis) -> Option<Decimal> {
    let profits: Vec<Decimal> = detailed.iter().filter_map(|r| basis.of_row(&r.row)).collect();

    let total_profits: Decimal = profits.iter().filter(|p| **p >= Decimal::ZERO).sum();
    let total_losses: Decimal = profits.iter().filter(|p| **p < Decimal::ZERO).sum();

    if total_losses.is_zero() {
        return None;
    }

    Some((total_profits / total_losses).round_dp(2) * dec!(-1))
}

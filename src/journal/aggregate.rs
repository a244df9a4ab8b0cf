//! Per-group reduction of execution rows into trade records

use crate::config::EntryPolicy;
use crate::journal::sessions_at;
use crate::types::{ExecutionRow, OrderAction, Trade};
use crate::utils::humanize_duration;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use thiserror::Error;

/// A trade group that could not be reduced. The run continues without it.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GroupError {
    #[error("trade group {0} has no New Order rows")]
    NoEntryRows(i64),

    #[error("trade group {0} has no usable account balance snapshot")]
    MissingBalance(i64),
}

/// Settings threaded into every group reduction.
///
/// `now` anchors the duration of still-open trades so reductions stay
/// deterministic and testable.
#[derive(Debug, Clone)]
pub struct AggregateSettings {
    pub entry_policy: EntryPolicy,
    pub risk_threshold: Decimal,
    pub now: DateTime<Utc>,
}

/// Reduce every trade group independently.
///
/// A malformed group yields its error instead of aborting the run; callers
/// log the failures and keep the successes.
pub fn aggregate_groups(
    groups: &BTreeMap<i64, Vec<ExecutionRow>>,
    settings: &AggregateSettings,
) -> Vec<Result<Trade, GroupError>> {
    groups
        .iter()
        .map(|(group_id, rows)| aggregate_group(*group_id, rows, settings))
        .collect()
}

/// Reduce one group's rows (date-ascending) into a single [`Trade`].
pub fn aggregate_group(
    group_id: i64,
    rows: &[ExecutionRow],
    settings: &AggregateSettings,
) -> Result<Trade, GroupError> {
    let entries: Vec<&ExecutionRow> = filter_by_action(rows, OrderAction::NewOrder);
    let stops: Vec<&ExecutionRow> = filter_by_action(rows, OrderAction::StopLoss);
    let takes: Vec<&ExecutionRow> = filter_by_action(rows, OrderAction::TakeProfit);

    if entries.is_empty() {
        return Err(GroupError::NoEntryRows(group_id));
    }

    let (entry_price, entry_date) = entry_values(&entries, settings.entry_policy);
    let decimal_cases = entry_price.normalize().scale();
    let sessions = sessions_at(entry_date);

    let quantity: Decimal = entries.iter().filter_map(|r| r.quantity).sum();
    let gross_profit: Decimal = rows
        .iter()
        .filter_map(|r| r.gross_profit)
        .sum::<Decimal>()
        .round_dp(2);
    let realized_profit: Decimal = rows
        .iter()
        .filter_map(|r| r.realized_profit)
        .sum::<Decimal>()
        .round_dp(2);

    let (preset_sl, fully_closed_sl, sl_closed_size) =
        closed_kpis(&entries, &stops, |r| r.stop_loss, settings.entry_policy);
    // the TP trigger price is not reported; only the SL one drives KPIs
    let (preset_tp, _, tp_closed_size) =
        closed_kpis(&entries, &takes, |r| r.take_profit, settings.entry_policy);
    let total_closed_size = sl_closed_size + tp_closed_size;

    let sl_weighted = weighted_exit(&stops, total_closed_size, decimal_cases);
    let tp_weighted = weighted_exit(&takes, total_closed_size, decimal_cases);
    let combined = sl_weighted + tp_weighted;
    // zero combined exit means "no exit yet", not an exit at price zero
    let exit_price = (combined > Decimal::ZERO).then_some(combined);

    let take_profits_taken: Vec<Decimal> = takes.iter().map(|r| r.exec_price).collect();

    let is_closed = quantity <= total_closed_size;
    let closed_date = if is_closed {
        rows.last().map(|r| r.exec_date)
    } else {
        None
    };
    let duration = humanize_duration(entry_date, closed_date.unwrap_or(settings.now));

    let trade_result: i8 = if gross_profit > Decimal::ZERO {
        1
    } else if gross_profit < Decimal::ZERO {
        -1
    } else {
        0
    };

    let initial_balance = rows
        .first()
        .and_then(|r| r.account_balance)
        .filter(|b| !b.is_zero())
        .ok_or(GroupError::MissingBalance(group_id))?;

    let stopped_out = fully_closed_sl.is_some();

    // risk is unknowable (and moot) for a winner that never had a preset SL;
    // otherwise fall back to the price the stop actually triggered at
    let sl_for_risk = preset_sl.or(fully_closed_sl);
    let mut risk = None;
    let mut risk_managed = false;
    if !(preset_sl.is_none() && trade_result == 1) {
        if let Some(sl_price) = sl_for_risk {
            let fraction = ((entry_price - sl_price).abs() * quantity / initial_balance)
                .round_dp(2)
                .abs();
            risk_managed = fraction <= settings.risk_threshold;
            risk = Some(fraction);
        }
    }

    let first = &rows[0];
    Ok(Trade {
        symbol: first.symbol.clone(),
        side: first.side,
        entry_price,
        entry_date,
        quantity,
        preset_stop_loss: preset_sl,
        triggered_stop_loss: fully_closed_sl,
        preset_take_profit: preset_tp,
        take_profits_taken,
        exit_price,
        is_closed,
        closed_date,
        duration,
        gross_profit,
        realized_profit,
        trade_result,
        risk,
        risk_managed,
        stopped_out,
        sessions,
        initial_balance,
    })
}

fn filter_by_action(rows: &[ExecutionRow], action: OrderAction) -> Vec<&ExecutionRow> {
    rows.iter().filter(|r| r.action == action).collect()
}

/// Entry price under the configured policy, and the earliest entry date.
fn entry_values(entries: &[&ExecutionRow], policy: EntryPolicy) -> (Decimal, DateTime<Utc>) {
    let price = match policy {
        EntryPolicy::First => entries[0].exec_price,
        EntryPolicy::Average => {
            entries.iter().map(|r| r.exec_price).sum::<Decimal>() / Decimal::from(entries.len())
        }
    };
    let date = entries
        .iter()
        .map(|r| r.exec_date)
        .min()
        .expect("entries is non-empty");

    (price, date)
}

/// Preset close price, fully-closing trigger price, and total closed size
/// for one close type (stop loss or take profit).
///
/// The preset comes from the entry rows' order fields and is forced back to
/// `None` when the group has no close rows of that type. The trigger price
/// is the close whose resulting remaining size is exactly zero.
fn closed_kpis(
    entries: &[&ExecutionRow],
    closes: &[&ExecutionRow],
    preset_field: impl Fn(&ExecutionRow) -> Option<Decimal>,
    policy: EntryPolicy,
) -> (Option<Decimal>, Option<Decimal>, Decimal) {
    let presets: Vec<Decimal> = entries.iter().filter_map(|r| preset_field(r)).collect();

    let preset = if presets.is_empty() || closes.is_empty() {
        None
    } else {
        Some(match policy {
            EntryPolicy::First => presets[0],
            EntryPolicy::Average => {
                presets.iter().sum::<Decimal>() / Decimal::from(presets.len())
            }
        })
    };

    let closed_size: Decimal = closes.iter().filter_map(|r| r.closed_size).sum();

    let fully_closed_price = closes
        .iter()
        .find(|r| r.remaining_size == Some(Decimal::ZERO))
        .map(|r| r.exec_price);

    (preset, fully_closed_price, closed_size)
}

/// Weighted average exit over one close type:
/// `Σ (closed_size_i / total) * price_i`, degenerating to unit weights when
/// the total closed size is not positive.
fn weighted_exit(closes: &[&ExecutionRow], total_closed_size: Decimal, dp: u32) -> Decimal {
    closes
        .iter()
        .map(|r| {
            let closed = r.closed_size.unwrap_or_default();
            let weight = if total_closed_size > Decimal::ZERO {
                closed / total_closed_size
            } else {
                closed
            };
            weight * r.exec_price
        })
        .sum::<Decimal>()
        .round_dp(dp)
}

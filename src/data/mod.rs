//! Dataset merging and field mapping
//!
//! Joins the three raw datasets on their order/execution identifiers,
//! drops exchange-side anomalies, and maps the native fields into typed
//! [`ExecutionRow`]s sorted by execution date — establishing the ordering
//! invariant the grouper relies on. The core never sees a raw field name.

pub mod raw;

use crate::journal::classify_action;
use crate::types::{ExecutionRow, GroupedRow, ProfitBasis, Side};
use crate::utils::{parse_decimal, parse_millis};
use raw::{ExecutionRecord, OrderRecord, TransactionRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use tracing::{debug, warn};

/// The three datasets one journal window is built from.
#[derive(Debug, Clone, Default)]
pub struct RawDatasets {
    pub executions: Vec<ExecutionRecord>,
    pub transactions: Vec<TransactionRecord>,
    pub orders: Vec<OrderRecord>,
}

/// Merge the raw datasets into classified, date-sorted execution rows.
///
/// The transaction log drives the merge: each entry is paired with its fill
/// via `tradeId == execId` and with its order via `orderId`. Entries with
/// no matching fill are duplicates or anomalies on the exchange side;
/// entries whose fill is not of type `Trade` are funding or settlement
/// events. Both are dropped and counted, never raised.
pub fn build_rows(raw: &RawDatasets) -> Vec<ExecutionRow> {
    let executions: HashMap<&str, &ExecutionRecord> = raw
        .executions
        .iter()
        .map(|e| (e.exec_id.as_str(), e))
        .collect();
    let orders: HashMap<&str, &OrderRecord> =
        raw.orders.iter().map(|o| (o.order_id.as_str(), o)).collect();

    let mut rows = Vec::with_capacity(raw.transactions.len());
    let mut unmatched = 0usize;
    let mut non_trade = 0usize;
    let mut no_order = 0usize;
    let mut malformed = 0usize;

    for tx in &raw.transactions {
        let Some(execution) = executions.get(tx.trade_id.as_str()) else {
            unmatched += 1;
            continue;
        };
        if execution.exec_type != "Trade" {
            non_trade += 1;
            continue;
        }
        let Some(order) = orders.get(tx.order_id.as_str()) else {
            no_order += 1;
            continue;
        };

        match map_row(tx, execution, order) {
            Some(row) => rows.push(row),
            None => malformed += 1,
        }
    }

    if unmatched + non_trade + no_order + malformed > 0 {
        debug!(
            unmatched, non_trade, no_order, malformed,
            "dropped transaction-log entries while merging"
        );
    }

    rows.sort_by_key(|r| r.exec_date);
    rows
}

fn map_row(
    tx: &TransactionRecord,
    execution: &ExecutionRecord,
    order: &OrderRecord,
) -> Option<ExecutionRow> {
    let side = match tx.side.as_str() {
        "Buy" => Side::Long,
        "Sell" => Side::Short,
        other => {
            warn!(symbol = %tx.symbol, side = other, "unrecognized side, dropping row");
            return None;
        }
    };

    let exec_price = parse_decimal(&execution.exec_price)?;
    let exec_date = parse_millis(&tx.transaction_time)?;
    let gross_profit = parse_decimal(&tx.cash_flow);

    Some(ExecutionRow {
        symbol: tx.symbol.clone(),
        side,
        action: classify_action(execution.create_type.as_deref(), gross_profit),
        tx_type: tx.tx_type.clone(),
        exec_price,
        exec_date,
        quantity: parse_decimal(&execution.exec_qty),
        closed_size: parse_decimal(&execution.closed_size),
        remaining_size: parse_decimal(&tx.size),
        stop_loss: parse_decimal(&order.stop_loss),
        take_profit: parse_decimal(&order.take_profit),
        gross_profit,
        realized_profit: parse_decimal(&tx.change),
        account_balance: parse_decimal(&tx.cash_balance),
    })
}

/// A grouped row enriched with its running ROI for the detailed view.
#[derive(Debug, Clone)]
pub struct DetailedRow {
    pub row: ExecutionRow,
    pub trade_group: i64,
    pub roi_pct: Option<Decimal>,
}

/// Attach a per-row ROI column to the (non-orphan) grouped rows.
///
/// Each row's profit is taken against the previous row's balance snapshot.
/// The first row has no previous balance, so its ROI is reconstructed from
/// its own post-trade balance; this also flags deposits/withdrawals that
/// would otherwise skew later KPIs.
pub fn detail_rows(grouped: &[GroupedRow], basis: ProfitBasis) -> Vec<DetailedRow> {
    let hundred = dec!(100);
    let mut previous_balance: Option<Decimal> = None;

    grouped
        .iter()
        .map(|g| {
            let profit = basis.of_row(&g.row);
            let roi_pct = match (profit, previous_balance) {
                (Some(profit), Some(prev)) if !prev.is_zero() => Some(profit * hundred / prev),
                (Some(profit), None) => g.row.account_balance.filter(|b| !b.is_zero()).map(
                    |balance| -hundred + (profit + balance) * hundred / balance,
                ),
                _ => None,
            };
            previous_balance = g.row.account_balance;

            DetailedRow {
                row: g.row.clone(),
                trade_group: g.trade_group,
                roi_pct,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderAction;

    fn execution(exec_id: &str, order_id: &str, exec_type: &str, create_type: &str) -> ExecutionRecord {
        ExecutionRecord {
            symbol: "BTCUSDT".to_string(),
            side: "Buy".to_string(),
            order_id: order_id.to_string(),
            exec_id: exec_id.to_string(),
            exec_type: exec_type.to_string(),
            create_type: Some(create_type.to_string()),
            order_type: "Market".to_string(),
            stop_order_type: String::new(),
            exec_time: "1700000000000".to_string(),
            exec_price: "42000.5".to_string(),
            exec_qty: "0.5".to_string(),
            closed_size: "0".to_string(),
            exec_fee: "1.2".to_string(),
        }
    }

    fn transaction(trade_id: &str, order_id: &str) -> TransactionRecord {
        TransactionRecord {
            symbol: "BTCUSDT".to_string(),
            side: "Buy".to_string(),
            tx_type: "TRADE".to_string(),
            order_id: order_id.to_string(),
            trade_id: trade_id.to_string(),
            transaction_time: "1700000000000".to_string(),
            qty: "0.5".to_string(),
            size: "0.5".to_string(),
            cash_flow: "0".to_string(),
            change: "-1.2".to_string(),
            cash_balance: "10000".to_string(),
            fee: "1.2".to_string(),
        }
    }

    fn order(order_id: &str) -> OrderRecord {
        OrderRecord {
            symbol: "BTCUSDT".to_string(),
            order_id: order_id.to_string(),
            side: "Buy".to_string(),
            created_time: "1700000000000".to_string(),
            order_status: "Filled".to_string(),
            stop_loss: "41000".to_string(),
            take_profit: String::new(),
        }
    }

    #[test]
    fn test_merge_joins_all_three_datasets() {
        let raw = RawDatasets {
            executions: vec![execution("e1", "o1", "Trade", "CreateByUser")],
            transactions: vec![transaction("e1", "o1")],
            orders: vec![order("o1")],
        };

        let rows = build_rows(&raw);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.side, Side::Long);
        assert_eq!(row.action, OrderAction::NewOrder);
        assert_eq!(row.stop_loss, Some(Decimal::from(41000)));
        assert_eq!(row.take_profit, None);
        assert_eq!(row.account_balance, Some(Decimal::from(10000)));
    }

    #[test]
    fn test_merge_drops_unmatched_and_non_trade_entries() {
        let raw = RawDatasets {
            executions: vec![
                execution("e1", "o1", "Trade", "CreateByUser"),
                execution("e2", "o2", "Funding", "CreateByUser"),
            ],
            transactions: vec![
                transaction("e1", "o1"),
                transaction("e2", "o2"),
                // duplicate anomaly: no execution carries this trade id
                transaction("missing", "o1"),
            ],
            orders: vec![order("o1"), order("o2")],
        };

        let rows = build_rows(&raw);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_merge_requires_order_history_match() {
        let raw = RawDatasets {
            executions: vec![execution("e1", "o1", "Trade", "CreateByUser")],
            transactions: vec![transaction("e1", "o1")],
            orders: vec![],
        };

        assert!(build_rows(&raw).is_empty());
    }

    #[test]
    fn test_rows_sorted_by_date() {
        let mut late = transaction("e1", "o1");
        late.transaction_time = "1700000300000".to_string();
        let mut early = transaction("e2", "o1");
        early.transaction_time = "1700000100000".to_string();

        let raw = RawDatasets {
            executions: vec![
                execution("e1", "o1", "Trade", "CreateByUser"),
                execution("e2", "o1", "Trade", "CreateByUser"),
            ],
            transactions: vec![late, early],
            orders: vec![order("o1")],
        };

        let rows = build_rows(&raw);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].exec_date <= rows[1].exec_date);
    }

    #[test]
    fn test_roi_first_row_uses_own_balance() {
        let row = ExecutionRow {
            symbol: "BTCUSDT".to_string(),
            side: Side::Long,
            action: OrderAction::NewOrder,
            tx_type: "TRADE".to_string(),
            exec_price: Decimal::from(100),
            exec_date: chrono::Utc::now(),
            quantity: Some(Decimal::ONE),
            closed_size: None,
            remaining_size: None,
            stop_loss: None,
            take_profit: None,
            gross_profit: Some(Decimal::from(50)),
            realized_profit: Some(Decimal::from(50)),
            account_balance: Some(Decimal::from(1050)),
        };
        let grouped = vec![GroupedRow {
            row,
            trade_group: 1,
        }];

        let detailed = detail_rows(&grouped, ProfitBasis::Realized);
        // -100 + (50 + 1050) * 100 / 1050 = 4.7619...
        let roi = detailed[0].roi_pct.unwrap();
        assert_eq!(roi.round_dp(2), dec!(4.76));
    }

    #[test]
    fn test_roi_later_rows_use_previous_balance() {
        let first = ExecutionRow {
            symbol: "BTCUSDT".to_string(),
            side: Side::Long,
            action: OrderAction::NewOrder,
            tx_type: "TRADE".to_string(),
            exec_price: Decimal::from(100),
            exec_date: chrono::Utc::now(),
            quantity: Some(Decimal::ONE),
            closed_size: None,
            remaining_size: None,
            stop_loss: None,
            take_profit: None,
            gross_profit: Some(Decimal::ZERO),
            realized_profit: Some(Decimal::ZERO),
            account_balance: Some(Decimal::from(1000)),
        };
        let mut second = first.clone();
        second.realized_profit = Some(Decimal::from(20));
        second.account_balance = Some(Decimal::from(1020));

        let grouped = vec![
            GroupedRow { row: first, trade_group: 1 },
            GroupedRow { row: second, trade_group: 1 },
        ];

        let detailed = detail_rows(&grouped, ProfitBasis::Realized);
        // 20 * 100 / 1000
        assert_eq!(detailed[1].roi_pct.unwrap(), Decimal::from(2));
    }
}

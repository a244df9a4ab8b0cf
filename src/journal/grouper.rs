//! Trade-group assignment over a date-sorted row stream
//!
//! Tracks open positions per `(symbol, side)` and stamps every row with the
//! group id of the position lifecycle it belongs to. The input MUST be
//! sorted ascending by execution date: the position state is
//! order-dependent and out-of-order rows silently corrupt the assignment.

use crate::types::{ExecutionRow, GroupedRow, OrderAction, Side};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Group id assigned to close events with no matching open position.
pub const ORPHAN_GROUP: i64 = -1;

/// Running state for one open position lifecycle.
#[derive(Debug)]
struct OpenPosition {
    group: i64,
    remaining_quantity: Decimal,
}

/// Assign a trade-group id to every row.
///
/// A `New Order` opens (or scales into) the position on its own
/// `(symbol, side)`; a close row deducts from the position on the opposite
/// side, since its fill side is the inverse of the side it closes. A
/// position whose remaining quantity reaches exactly zero is removed, so
/// the next entry on that key starts a fresh group.
pub fn assign_groups(rows: Vec<ExecutionRow>) -> Vec<GroupedRow> {
    let mut open_positions: HashMap<(String, Side), OpenPosition> = HashMap::new();
    let mut next_group: i64 = 0;

    rows.into_iter()
        .map(|row| {
            let trade_group = match row.action {
                OrderAction::NewOrder => {
                    let key = (row.symbol.clone(), row.side);
                    let quantity = row.quantity.unwrap_or_default();
                    match open_positions.get_mut(&key) {
                        Some(position) => {
                            position.remaining_quantity += quantity;
                            position.group
                        }
                        None => {
                            next_group += 1;
                            open_positions.insert(
                                key,
                                OpenPosition {
                                    group: next_group,
                                    remaining_quantity: quantity,
                                },
                            );
                            next_group
                        }
                    }
                }
                OrderAction::TakeProfit | OrderAction::StopLoss => {
                    let key = (row.symbol.clone(), row.side.opposite());
                    match open_positions.get_mut(&key) {
                        Some(position) => {
                            position.remaining_quantity -= row.closed_size.unwrap_or_default();
                            let group = position.group;
                            if position.remaining_quantity == Decimal::ZERO {
                                open_positions.remove(&key);
                            }
                            group
                        }
                        None => ORPHAN_GROUP,
                    }
                }
                OrderAction::Unknown => ORPHAN_GROUP,
            };

            GroupedRow { row, trade_group }
        })
        .collect()
}

/// Bucket grouped rows by trade group, dropping orphans.
///
/// Returns the groups in id order plus the number of orphaned rows that
/// were excluded.
pub fn collect_groups(rows: &[GroupedRow]) -> (BTreeMap<i64, Vec<ExecutionRow>>, usize) {
    let mut groups: BTreeMap<i64, Vec<ExecutionRow>> = BTreeMap::new();
    let mut orphans = 0usize;

    for grouped in rows {
        if grouped.trade_group == ORPHAN_GROUP {
            orphans += 1;
            continue;
        }
        groups
            .entry(grouped.trade_group)
            .or_default()
            .push(grouped.row.clone());
    }

    (groups, orphans)
}

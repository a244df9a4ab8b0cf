//! Row classification from exchange order-creation metadata

use crate::types::OrderAction;
use rust_decimal::Decimal;

pub const CREATE_BY_CLOSING: &str = "CreateByClosing";
pub const CREATE_BY_STOP_LOSS: &str = "CreateByStopLoss";
pub const CREATE_BY_USER: &str = "CreateByUser";

/// Label a raw row with its action.
///
/// A closing order is a take profit when it realized a positive cash flow
/// and a stop loss otherwise; the exchange does not distinguish the two in
/// its creation type. Anything unrecognized (including a missing creation
/// type) passes through as [`OrderAction::Unknown`] rather than failing.
pub fn classify_action(create_type: Option<&str>, cash_flow: Option<Decimal>) -> OrderAction {
    match create_type.unwrap_or("") {
        CREATE_BY_CLOSING => {
            if cash_flow.unwrap_or_default() > Decimal::ZERO {
                OrderAction::TakeProfit
            } else {
                OrderAction::StopLoss
            }
        }
        CREATE_BY_STOP_LOSS => OrderAction::StopLoss,
        CREATE_BY_USER => OrderAction::NewOrder,
        _ => OrderAction::Unknown,
    }
}

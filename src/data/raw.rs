//! Raw exchange records with native field names
//!
//! One struct per dataset endpoint. Numeric values arrive as strings and
//! stay strings here; the merger parses them leniently while mapping into
//! [`crate::types::ExecutionRow`].

use serde::Deserialize;

/// One fill from the execution-list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub symbol: String,
    #[serde(default)]
    pub side: String,
    pub order_id: String,
    pub exec_id: String,
    /// `Trade` for fills; funding and settlement events carry other values.
    #[serde(default)]
    pub exec_type: String,
    #[serde(default)]
    pub create_type: Option<String>,
    #[serde(default)]
    pub order_type: String,
    #[serde(default)]
    pub stop_order_type: String,
    #[serde(default)]
    pub exec_time: String,
    #[serde(default)]
    pub exec_price: String,
    #[serde(default)]
    pub exec_qty: String,
    #[serde(default)]
    pub closed_size: String,
    #[serde(default)]
    pub exec_fee: String,
}

/// One entry from the account transaction-log endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub symbol: String,
    #[serde(default)]
    pub side: String,
    /// `TRADE` for fills; transfers and settlements carry other values.
    #[serde(rename = "type", default)]
    pub tx_type: String,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub trade_id: String,
    #[serde(default)]
    pub transaction_time: String,
    #[serde(default)]
    pub qty: String,
    /// Position size remaining after this event.
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub cash_flow: String,
    #[serde(default)]
    pub change: String,
    #[serde(default)]
    pub cash_balance: String,
    #[serde(default)]
    pub fee: String,
}

/// One order from the order-history endpoint, carrying the preset close
/// prices attached at placement.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub symbol: String,
    pub order_id: String,
    #[serde(default)]
    pub side: String,
    #[serde(default)]
    pub created_time: String,
    #[serde(default)]
    pub order_status: String,
    #[serde(default)]
    pub stop_loss: String,
    #[serde(default)]
    pub take_profit: String,
}

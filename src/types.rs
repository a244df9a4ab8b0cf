//! Core domain types shared across the pipeline

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position side, mapped from the exchange's `Buy`/`Sell` at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// The side a close fill deducts from: a Short close row reduces a
    /// Long position and vice versa.
    pub fn opposite(&self) -> Side {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "Long"),
            Side::Short => write!(f, "Short"),
        }
    }
}

/// Classified row action, derived from the exchange's creation-type and
/// cash-flow fields. All grouping and aggregation branches match on this
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderAction {
    NewOrder,
    StopLoss,
    TakeProfit,
    Unknown,
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderAction::NewOrder => write!(f, "New Order"),
            OrderAction::StopLoss => write!(f, "Stop Loss"),
            OrderAction::TakeProfit => write!(f, "Take Profit"),
            OrderAction::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One fill/order event after merging and field mapping.
///
/// Numeric fields the exchange may omit (or send empty) are `Option`s; the
/// aggregation rules define per-field how a missing value is treated.
/// `exec_date` must be non-decreasing across the sequence handed to the
/// grouper; the merger establishes this by sorting, the core does not
/// re-validate it.
#[derive(Debug, Clone)]
pub struct ExecutionRow {
    pub symbol: String,
    pub side: Side,
    pub action: OrderAction,
    pub tx_type: String,
    pub exec_price: Decimal,
    pub exec_date: DateTime<Utc>,
    pub quantity: Option<Decimal>,
    pub closed_size: Option<Decimal>,
    pub remaining_size: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    pub gross_profit: Option<Decimal>,
    pub realized_profit: Option<Decimal>,
    pub account_balance: Option<Decimal>,
}

/// An execution row with its assigned trade-group id.
///
/// Group `-1` marks an orphaned close (no matching open position); orphans
/// are excluded from aggregation and statistics.
#[derive(Debug, Clone)]
pub struct GroupedRow {
    pub row: ExecutionRow,
    pub trade_group: i64,
}

/// A real-world trading-hours window a trade entry can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradingSession {
    Sydney,
    Tokyo,
    London,
    NewYork,
}

impl TradingSession {
    pub fn label(&self) -> &'static str {
        match self {
            TradingSession::Sydney => "Sydney",
            TradingSession::Tokyo => "Tokyo",
            TradingSession::London => "London",
            TradingSession::NewYork => "New York",
        }
    }
}

impl fmt::Display for TradingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One aggregated trade lifecycle, the unit of reporting.
#[derive(Debug, Clone)]
pub struct Trade {
    pub symbol: String,
    pub side: Side,
    pub entry_price: Decimal,
    pub entry_date: DateTime<Utc>,
    pub quantity: Decimal,
    pub preset_stop_loss: Option<Decimal>,
    pub triggered_stop_loss: Option<Decimal>,
    pub preset_take_profit: Option<Decimal>,
    pub take_profits_taken: Vec<Decimal>,
    /// Weighted average exit; `None` means "no exit yet", not zero.
    pub exit_price: Option<Decimal>,
    pub is_closed: bool,
    pub closed_date: Option<DateTime<Utc>>,
    pub duration: String,
    pub gross_profit: Decimal,
    pub realized_profit: Decimal,
    /// `+1` win, `-1` loss, `0` breakeven/ongoing.
    pub trade_result: i8,
    pub risk: Option<Decimal>,
    pub risk_managed: bool,
    pub stopped_out: bool,
    pub sessions: Vec<TradingSession>,
    pub initial_balance: Decimal,
}

/// Which profit column drives win counting, P&L and profit factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfitBasis {
    Realized,
    Gross,
}

impl ProfitBasis {
    pub fn of_trade(&self, trade: &Trade) -> Decimal {
        match self {
            ProfitBasis::Realized => trade.realized_profit,
            ProfitBasis::Gross => trade.gross_profit,
        }
    }

    pub fn of_row(&self, row: &ExecutionRow) -> Option<Decimal> {
        match self {
            ProfitBasis::Realized => row.realized_profit,
            ProfitBasis::Gross => row.gross_profit,
        }
    }
}

impl FromStr for ProfitBasis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "realized" | "realized profit" => Ok(ProfitBasis::Realized),
            "gross" | "gross profit" => Ok(ProfitBasis::Gross),
            other => Err(format!("unsupported profit column '{other}'")),
        }
    }
}

impl fmt::Display for ProfitBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitBasis::Realized => write!(f, "Realized Profit"),
            ProfitBasis::Gross => write!(f, "Gross Profit"),
        }
    }
}

/// Journal timeframe, selecting how many days of history one report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Daily => write!(f, "Daily"),
            Timeframe::Weekly => write!(f, "Weekly"),
            Timeframe::Monthly => write!(f, "Monthly"),
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Timeframe::Daily),
            "weekly" => Ok(Timeframe::Weekly),
            "monthly" => Ok(Timeframe::Monthly),
            other => Err(format!("unsupported timeframe '{other}'")),
        }
    }
}

//! Markdown table rendering
//!
//! Cell values carry the journal's inline markup (colored spans, checkbox
//! cells, session tags) so the rendered file works with the same CSS
//! snippets the journal app ships.

use crate::data::DetailedRow;
use crate::types::{OrderAction, Side, Trade, TradingSession};
use crate::utils::format_signed_pct;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const AGGREGATED_COLUMNS: &[&str] = &[
    "Symbol",
    "Side",
    "Closed",
    "Stopped Out",
    "Risk Managed",
    "Result",
    "Quantity",
    "Session",
    "Entry Price",
    "Entry Date",
    "Exit Price",
    "Closed Date",
    "Duration",
    "SL Set",
    "SL Triggered",
    "Take Profits",
    "Risk",
    "Gross Profit",
    "Realized Profit",
    "Attachments",
    "Confluence",
    "Remarks",
];

pub const DETAILED_COLUMNS: &[&str] = &[
    "Symbol",
    "Type",
    "Action",
    "Side",
    "Quantity",
    "Price",
    "Date",
    "Gross Profit",
    "Realized Profit",
    "Wallet Balance",
    "ROI(%)",
    "Confluence",
    "Remarks",
];

/// Pad every column to its widest cell so the raw markdown stays readable.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect();
    out.push_str(&format!("| {} |\n", header_cells.join(" | ")));

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("| {} |\n", separator.join(" | ")));

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:<width$}", c, width = widths[i]))
            .collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    out
}

/// The per-trade view.
pub fn aggregated_table(trades: &[Trade], risk_threshold: Decimal) -> String {
    let rows: Vec<Vec<String>> = trades
        .iter()
        .map(|t| {
            vec![
                fmt_symbol(&t.symbol),
                fmt_side(t.side),
                fmt_checkbox(t.is_closed),
                fmt_checkbox(t.stopped_out),
                fmt_checkbox(t.risk_managed),
                fmt_result(t.trade_result),
                t.quantity.to_string(),
                fmt_sessions(&t.sessions),
                t.entry_price.to_string(),
                fmt_date(Some(t.entry_date)),
                t.exit_price.map(|p| p.to_string()).unwrap_or_default(),
                fmt_date(t.closed_date),
                fmt_duration(&t.duration),
                fmt_sl_set(t.preset_stop_loss),
                fmt_sl_triggered(t.triggered_stop_loss),
                fmt_take_profits(&t.take_profits_taken),
                fmt_risk(t.risk, risk_threshold),
                fmt_profit(t.gross_profit),
                fmt_profit(t.realized_profit),
                String::new(),
                String::new(),
                String::new(),
            ]
        })
        .collect();

    render_table(AGGREGATED_COLUMNS, &rows)
}

/// The per-fill view.
pub fn detailed_table(rows: &[DetailedRow]) -> String {
    let table_rows: Vec<Vec<String>> = rows
        .iter()
        .map(|d| {
            let r = &d.row;
            vec![
                fmt_symbol(&r.symbol),
                r.tx_type.clone(),
                fmt_action(r.action),
                fmt_side(r.side),
                r.quantity.map(|q| q.to_string()).unwrap_or_default(),
                r.exec_price.to_string(),
                fmt_date(Some(r.exec_date)),
                fmt_profit(r.gross_profit.unwrap_or_default().round_dp(2)),
                fmt_profit(r.realized_profit.unwrap_or_default().round_dp(2)),
                r.account_balance
                    .map(|b| b.round_dp(2).to_string())
                    .unwrap_or_default(),
                fmt_roi(d.roi_pct),
                String::new(),
                String::new(),
            ]
        })
        .collect();

    render_table(DETAILED_COLUMNS, &table_rows)
}

fn fmt_symbol(symbol: &str) -> String {
    format!("**{symbol}**")
}

fn fmt_side(side: Side) -> String {
    match side {
        Side::Long => {
            r#"<span style="color: green; font-weight: bold;">Long<span/>"#.to_string()
        }
        Side::Short => {
            r#"<span style="color: red; font-weight: bold;">Short<span/>"#.to_string()
        }
    }
}

fn fmt_action(action: OrderAction) -> String {
    match action {
        OrderAction::StopLoss => r#"<span style="color: red;">Stop Loss<span/>"#.to_string(),
        OrderAction::TakeProfit => {
            r#"<span style="color: green;">Take Profit<span/>"#.to_string()
        }
        other => other.to_string(),
    }
}

fn fmt_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(d) => format!("_{}_", d.format("%Y-%m-%d %H:%M:%S")),
        None => String::new(),
    }
}

fn fmt_duration(duration: &str) -> String {
    if duration.is_empty() {
        String::new()
    } else {
        format!("*{duration}*")
    }
}

fn fmt_profit(value: Decimal) -> String {
    if value < Decimal::ZERO {
        format!(r#"<span style="color: red;">{value}<span/>"#)
    } else if value > Decimal::ZERO {
        format!(r#"<span style="color: green;">+{value}<span/>"#)
    } else {
        value.to_string()
    }
}

fn fmt_roi(roi: Option<Decimal>) -> String {
    let Some(roi) = roi else {
        return String::new();
    };
    let formatted = format_signed_pct(roi);
    if formatted.starts_with('+') {
        format!(r#"<span style="color: green;">{formatted}<span/>"#)
    } else {
        format!(r#"<span style="color: red;">{formatted}<span/>"#)
    }
}

fn fmt_checkbox(checked: bool) -> String {
    if checked {
        r#"<center><input type="checkbox" checked><center/>"#.to_string()
    } else {
        r#"<center><input type="checkbox"><center/>"#.to_string()
    }
}

fn fmt_result(result: i8) -> String {
    match result {
        1 => r#"<span class="tag-win">Win</span>"#.to_string(),
        -1 => r#"<span class="tag-loss">Loss</span>"#.to_string(),
        _ => String::new(),
    }
}

fn fmt_risk(risk: Option<Decimal>, threshold: Decimal) -> String {
    let Some(risk) = risk else {
        return String::new();
    };
    let pct = (risk * dec!(100)).round_dp(2);
    if risk <= threshold {
        format!(r#"<span style="color: green;">{pct}%<span/>"#)
    } else {
        format!(r#"<span style="color: red;">{pct}%<span/>"#)
    }
}

fn fmt_sl_set(preset: Option<Decimal>) -> String {
    match preset {
        Some(p) => p.to_string(),
        None => r#"<span style="color: red;">None<span/>"#.to_string(),
    }
}

fn fmt_sl_triggered(triggered: Option<Decimal>) -> String {
    match triggered {
        Some(p) => p.to_string(),
        None => "None".to_string(),
    }
}

fn fmt_take_profits(taken: &[Decimal]) -> String {
    if taken.is_empty() {
        return r#"<span style="color: red;">None<span/>"#.to_string();
    }
    taken
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" / ")
}

fn fmt_sessions(sessions: &[TradingSession]) -> String {
    sessions
        .iter()
        .map(|s| match s {
            TradingSession::Sydney => r#"<span class="tag-session-syd">SYD</span>"#,
            TradingSession::Tokyo => r#"<span class="tag-session-asia">TOK</span>"#,
            TradingSession::London => r#"<span class="tag-session-ldn">LDN</span>"#,
            TradingSession::NewYork => r#"<span class="tag-session-ny">NY</span>"#,
        })
        .collect::<Vec<_>>()
        .join("")
}

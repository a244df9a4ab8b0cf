//! Mermaid pie chart rendering
//!
//! Mermaid assigns `pie1..pieN` theme colors to slices ordered by value,
//! largest first, regardless of declaration order, so the color scheme is
//! mapped after sorting the data.

use crate::journal::AccountStats;
use tracing::warn;

const DEFAULT_SLICE_COLOR: &str = "#808080";

const PERFORMANCE_SCHEME: &[(&str, &str)] = &[("Wins", "#36A2EB"), ("Losses", "#89CFF0")];

const STOPPED_OUT_SCHEME: &[(&str, &str)] =
    &[("Stopped Out", "#89CFF0"), ("Not Stopped", "#36A2EB")];

const RISK_SCHEME: &[(&str, &str)] = &[("Managed", "#36A2EB"), ("Not Managed", "#89CFF0")];

const SESSION_SCHEME: &[(&str, &str)] = &[
    ("Sydney", "#FF0000"),
    ("Tokyo", "#FFA500"),
    ("London", "#90EE90"),
    ("New York", "#4a12cc"),
];

const ASSET_SCHEME: &[(&str, &str)] = &[
    ("BTCUSD", "#FFA500"),
    ("BTCUSDT", "#FFA500"),
    ("BTCPERP", "#FFA500"),
    ("ETHUSDT", "#0000FF"),
    ("SOLUSDT", "#4a12cc"),
    ("XRPUSDT", "#A9A9A9"),
    ("ADAUSDT", "#00008B"),
    ("LINKUSDT", "#36A2EB"),
    ("XLMUSDT", "#808080"),
    ("SUIUSDT", "#36A2EB"),
    ("AVAXUSDT", "#FF0000"),
    ("NEARUSDT", "#90EE90"),
    ("DOGEUSDT", "#deb485"),
    ("PEPEUSDT", "#008000"),
];

/// Render one named chart from the stats, or `None` when no template
/// exists for that name.
pub fn build_chart(name: &str, stats: &AccountStats) -> Option<String> {
    let losses = complement(stats.total_trades, stats.wins);
    match name {
        "Performance" | "Win Ratio" => Some(pie_chart(
            name,
            &[
                ("Wins".to_string(), stats.wins),
                ("Losses".to_string(), losses),
            ],
            PERFORMANCE_SCHEME,
        )),
        "Stopped Out" => Some(pie_chart(
            name,
            &[
                ("Stopped Out".to_string(), stats.stopped_out),
                (
                    "Not Stopped".to_string(),
                    complement(stats.total_trades, stats.stopped_out),
                ),
            ],
            STOPPED_OUT_SCHEME,
        )),
        "Risk Management" => Some(pie_chart(
            name,
            &[
                ("Managed".to_string(), stats.risk_managed),
                (
                    "Not Managed".to_string(),
                    complement(stats.total_trades, stats.risk_managed),
                ),
            ],
            RISK_SCHEME,
        )),
        "Trades By Session" => {
            let data: Vec<(String, usize)> = stats
                .trades_by_session
                .iter()
                .map(|(session, count)| (session.label().to_string(), *count))
                .collect();
            Some(pie_chart(name, &data, SESSION_SCHEME))
        }
        "Trades By Asset" => {
            let data: Vec<(String, usize)> = stats
                .trades_by_asset
                .iter()
                .map(|(symbol, count)| (symbol.clone(), *count))
                .collect();
            Some(pie_chart(name, &data, ASSET_SCHEME))
        }
        other => {
            warn!(chart = other, "no chart template with this name");
            None
        }
    }
}

/// Count of trades NOT in the given bucket, guarded against inconsistent
/// inputs so a chart never renders a negative slice.
fn complement(total: usize, count: usize) -> usize {
    if total > 0 && total >= count {
        total - count
    } else {
        0
    }
}

/// One mermaid pie block with theme colors matched to value-sorted slices.
pub fn pie_chart(title: &str, data: &[(String, usize)], scheme: &[(&str, &str)]) -> String {
    let mut sorted: Vec<&(String, usize)> = data.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    let theme_vars: Vec<String> = sorted
        .iter()
        .enumerate()
        .map(|(i, (label, _))| {
            let color = scheme
                .iter()
                .find(|(name, _)| name == label)
                .map(|(_, color)| *color)
                .unwrap_or(DEFAULT_SLICE_COLOR);
            format!("'pie{}': '{}'", i + 1, color)
        })
        .collect();

    let slices: Vec<String> = data
        .iter()
        .map(|(label, value)| format!("    \"{label}\" : {value}"))
        .collect();

    format!(
        "```mermaid\n%%{{init: {{'themeVariables': {{{}}}}}}}%%\npie title {}\n{}\n```\n",
        theme_vars.join(", "),
        title,
        slices.join("\n")
    )
}

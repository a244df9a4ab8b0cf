//! Configuration loading and validation
//!
//! All tunables live in a TOML file; API credentials come from the
//! environment only (a `.env` file is honored). Invalid values that have a
//! safe default are replaced with a warning at load time rather than
//! aborting the run.

use crate::error::Result;
use crate::types::ProfitBasis;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing::warn;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file, allowing `JOURNAL__`-prefixed
    /// environment variables to override individual keys.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("JOURNAL").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// Exchange API endpoints and HTTP behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_execution_endpoint")]
    pub execution_endpoint: String,
    #[serde(default = "default_transaction_log_endpoint")]
    pub transaction_log_endpoint: String,
    #[serde(default = "default_order_history_endpoint")]
    pub order_history_endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            execution_endpoint: default_execution_endpoint(),
            transaction_log_endpoint: default_transaction_log_endpoint(),
            order_history_endpoint: default_order_history_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.bybit.com".to_string()
}

fn default_execution_endpoint() -> String {
    "/v5/execution/list".to_string()
}

fn default_transaction_log_endpoint() -> String {
    "/v5/account/transaction-log".to_string()
}

fn default_order_history_endpoint() -> String {
    "/v5/order/history".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// How entry price and preset close prices are reduced when a trade group
/// has several `New Order` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPolicy {
    First,
    #[serde(alias = "avg")]
    Average,
}

/// Journal content and KPI settings.
#[derive(Debug, Clone, Deserialize)]
pub struct JournalConfig {
    #[serde(default = "default_journal_name")]
    pub name: String,
    #[serde(default = "default_risk_threshold")]
    pub risk_threshold: Decimal,
    #[serde(default = "default_entry_calc")]
    pub entry_calc: EntryPolicy,
    #[serde(default = "default_profits_by")]
    pub compute_profits_by: String,
    #[serde(default = "default_report_dir")]
    pub report_dir: String,
    #[serde(default)]
    pub tables: Vec<TableSpec>,
    #[serde(default)]
    pub charts: Vec<ChartSpec>,
    #[serde(default = "default_display_order")]
    pub display_order: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub css_classes: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            name: default_journal_name(),
            risk_threshold: default_risk_threshold(),
            entry_calc: default_entry_calc(),
            compute_profits_by: default_profits_by(),
            report_dir: default_report_dir(),
            tables: Vec::new(),
            charts: Vec::new(),
            display_order: default_display_order(),
            tags: Vec::new(),
            css_classes: Vec::new(),
            links: Vec::new(),
        }
    }
}

impl JournalConfig {
    /// The configured profit column, falling back to realized profit with a
    /// warning when the value is unsupported.
    pub fn profit_basis(&self) -> ProfitBasis {
        match self.compute_profits_by.parse() {
            Ok(basis) => basis,
            Err(e) => {
                warn!("{e}, computing profits by '{}'", ProfitBasis::Realized);
                ProfitBasis::Realized
            }
        }
    }

    /// Tables to render; an empty config falls back to the two standard
    /// views.
    pub fn tables_or_default(&self) -> Vec<TableSpec> {
        if !self.tables.is_empty() {
            return self.tables.clone();
        }
        vec![
            TableSpec {
                name: "Aggregated View".to_string(),
                kind: TableKind::Aggregated,
            },
            TableSpec {
                name: "Detailed View".to_string(),
                kind: TableKind::Detailed,
            },
        ]
    }

    /// Charts to render; an empty config falls back to the standard set.
    pub fn charts_or_default(&self) -> Vec<ChartSpec> {
        if !self.charts.is_empty() {
            return self.charts.clone();
        }
        ["Performance", "Stopped Out", "Risk Management", "Trades By Session", "Trades By Asset"]
            .iter()
            .map(|name| ChartSpec {
                name: name.to_string(),
                kind: ChartKind::Pie,
            })
            .collect()
    }
}

fn default_journal_name() -> String {
    "{timeframe} Journal {date} {pnl}".to_string()
}

fn default_risk_threshold() -> Decimal {
    dec!(0.01)
}

fn default_entry_calc() -> EntryPolicy {
    EntryPolicy::First
}

fn default_profits_by() -> String {
    "realized".to_string()
}

fn default_report_dir() -> String {
    "reports".to_string()
}

fn default_display_order() -> Vec<String> {
    vec!["tables".to_string(), "charts".to_string()]
}

/// A table section of the journal.
#[derive(Debug, Clone, Deserialize)]
pub struct TableSpec {
    pub name: String,
    #[serde(rename = "type", default = "default_table_kind")]
    pub kind: TableKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Aggregated,
    Detailed,
}

fn default_table_kind() -> TableKind {
    TableKind::Detailed
}

/// A chart section of the journal.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartSpec {
    pub name: String,
    #[serde(rename = "type", default = "default_chart_kind")]
    pub kind: ChartKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Line,
}

fn default_chart_kind() -> ChartKind {
    ChartKind::Pie
}

/// Logging output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub log_to_file: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_to_file: false,
            log_dir: default_log_dir(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

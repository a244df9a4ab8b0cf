//! Tests for configuration

#[cfg(test)]
mod tests {
    use super::super::config::*;
    use crate::types::ProfitBasis;
    use rust_decimal_macros::dec;

    #[test]
    fn test_journal_config_defaults() {
        let config: JournalConfig = toml::from_str("").unwrap();
        assert_eq!(config.risk_threshold, dec!(0.01));
        assert_eq!(config.entry_calc, EntryPolicy::First);
        assert_eq!(config.compute_profits_by, "realized");
        assert_eq!(config.report_dir, "reports");
        assert_eq!(config.name, "{timeframe} Journal {date} {pnl}");
        assert_eq!(config.display_order, vec!["tables", "charts"]);
        assert!(config.tables.is_empty());
        assert!(config.charts.is_empty());
    }

    #[test]
    fn test_journal_config_overrides() {
        let toml_str = r#"
risk_threshold = 0.02
entry_calc = "average"
compute_profits_by = "gross"
report_dir = "~/journals"
"#;
        let config: JournalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.risk_threshold, dec!(0.02));
        assert_eq!(config.entry_calc, EntryPolicy::Average);
        assert_eq!(config.profit_basis(), ProfitBasis::Gross);
        assert_eq!(config.report_dir, "~/journals");
    }

    #[test]
    fn test_entry_calc_avg_alias() {
        let config: JournalConfig = toml::from_str(r#"entry_calc = "avg""#).unwrap();
        assert_eq!(config.entry_calc, EntryPolicy::Average);
    }

    #[test]
    fn test_unsupported_profit_column_falls_back() {
        let config: JournalConfig =
            toml::from_str(r#"compute_profits_by = "net worth""#).unwrap();
        assert_eq!(config.profit_basis(), ProfitBasis::Realized);
    }

    #[test]
    fn test_table_specs() {
        let toml_str = r#"
[[tables]]
name = "Aggregated View"
type = "aggregated"

[[tables]]
name = "My Custom View"
"#;
        let config: JournalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.tables.len(), 2);
        assert_eq!(config.tables[0].kind, TableKind::Aggregated);
        // unspecified table type defaults to the detailed view
        assert_eq!(config.tables[1].kind, TableKind::Detailed);

        let rendered = config.tables_or_default();
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[1].name, "My Custom View");
    }

    #[test]
    fn test_default_tables_when_none_configured() {
        let config: JournalConfig = toml::from_str("").unwrap();
        let tables = config.tables_or_default();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "Aggregated View");
        assert_eq!(tables[1].name, "Detailed View");
    }

    #[test]
    fn test_chart_specs() {
        let toml_str = r#"
[[charts]]
name = "Performance"
type = "pie"

[[charts]]
name = "Equity"
type = "line"
"#;
        let config: JournalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.charts.len(), 2);
        assert_eq!(config.charts[0].kind, ChartKind::Pie);
        assert_eq!(config.charts[1].kind, ChartKind::Line);
    }

    #[test]
    fn test_default_charts_when_none_configured() {
        let config: JournalConfig = toml::from_str("").unwrap();
        let charts = config.charts_or_default();
        assert_eq!(charts.len(), 5);
        assert!(charts.iter().all(|c| c.kind == ChartKind::Pie));
    }

    #[test]
    fn test_api_config_defaults() {
        let config: ApiConfig = toml::from_str("").unwrap();
        assert_eq!(config.base_url, "https://api.bybit.com");
        assert_eq!(config.execution_endpoint, "/v5/execution/list");
        assert_eq!(config.transaction_log_endpoint, "/v5/account/transaction-log");
        assert_eq!(config.order_history_endpoint, "/v5/order/history");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_logging_config_defaults() {
        let config: LoggingConfig = toml::from_str("").unwrap();
        assert_eq!(config.level, "info");
        assert!(!config.log_to_file);
        assert_eq!(config.log_dir, "logs");
    }

    #[test]
    fn test_full_config_document() {
        let toml_str = r#"
[api]
base_url = "https://api-testnet.bybit.com"

[journal]
risk_threshold = 0.015
tags = ["trading", "journal"]
css_classes = ["wide-table"]

[logging]
level = "debug"
log_to_file = true
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "https://api-testnet.bybit.com");
        assert_eq!(config.journal.risk_threshold, dec!(0.015));
        assert_eq!(config.journal.tags.len(), 2);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.log_to_file);
    }
}

//! End-to-end journal pipeline
//!
//! Fetch → merge → group → aggregate → stats → render → write. Per-group
//! anomalies are logged and skipped; dataset-level failures propagate to
//! the caller, which owns the top-level catch-and-log boundary.

use crate::client::{chunk_windows, ExecutionSource};
use crate::config::{ChartKind, Config, TableKind};
use crate::data::{build_rows, detail_rows, DetailedRow, RawDatasets};
use crate::error::Result;
use crate::journal::{
    aggregate_groups, assign_groups, build_stats, collect_groups, AccountStats,
    AggregateSettings, ORPHAN_GROUP,
};
use crate::report::{aggregated_table, build_chart, detailed_table, JournalBuilder, ReportWriter};
use crate::types::{Timeframe, Trade};
use chrono::{NaiveDate, Utc};
use futures_util::future::try_join_all;
use std::path::PathBuf;
use tracing::{info, warn};

/// Everything the renderer needs for one journal window.
pub struct JournalData {
    pub detailed: Vec<DetailedRow>,
    pub trades: Vec<Trade>,
    pub stats: AccountStats,
}

pub struct JournalPipeline {
    config: Config,
    date: NaiveDate,
    timeframe: Timeframe,
}

impl JournalPipeline {
    pub fn new(config: Config, date: NaiveDate, timeframe: Timeframe) -> Self {
        Self {
            config,
            date,
            timeframe,
        }
    }

    /// Fetch the three datasets, all date chunks of each concurrently.
    pub async fn fetch(&self, source: &dyn ExecutionSource) -> Result<RawDatasets> {
        let windows = chunk_windows(self.date, self.timeframe);
        info!(
            chunks = windows.len(),
            date = %self.date,
            timeframe = %self.timeframe,
            "fetching account history"
        );

        let executions = try_join_all(windows.iter().map(|w| source.fetch_executions(w)));
        let transactions = try_join_all(windows.iter().map(|w| source.fetch_transaction_log(w)));
        let orders = try_join_all(windows.iter().map(|w| source.fetch_order_history(w)));

        let (executions, transactions, orders) =
            tokio::try_join!(executions, transactions, orders)?;

        Ok(RawDatasets {
            executions: executions.into_iter().flatten().collect(),
            transactions: transactions.into_iter().flatten().collect(),
            orders: orders.into_iter().flatten().collect(),
        })
    }

    /// Run the core over the raw datasets.
    pub fn build(&self, raw: &RawDatasets) -> Result<JournalData> {
        let rows = build_rows(raw);
        let grouped = assign_groups(rows);

        let (groups, orphans) = collect_groups(&grouped);
        if orphans > 0 {
            warn!(
                orphans,
                "excluded close events with no matching open position"
            );
        }

        let settings = AggregateSettings {
            entry_policy: self.config.journal.entry_calc,
            risk_threshold: self.config.journal.risk_threshold,
            now: Utc::now(),
        };

        let mut trades = Vec::with_capacity(groups.len());
        for result in aggregate_groups(&groups, &settings) {
            match result {
                Ok(trade) => trades.push(trade),
                Err(e) => warn!("unable to process KPIs for one of the trade groups: {e}"),
            }
        }

        let basis = self.config.journal.profit_basis();
        let grouped: Vec<_> = grouped
            .into_iter()
            .filter(|g| g.trade_group != ORPHAN_GROUP)
            .collect();
        let stats = build_stats(&trades, &grouped, basis)?;
        let detailed = detail_rows(&grouped, basis);

        Ok(JournalData {
            detailed,
            trades,
            stats,
        })
    }

    /// Render the journal title and document body.
    pub fn render(&self, data: &JournalData) -> (String, String) {
        let journal = &self.config.journal;
        let builder = JournalBuilder::new(self.timeframe, self.date, "Bybit", data.stats.pnl);

        let tables: Vec<(String, String)> = journal
            .tables_or_default()
            .into_iter()
            .map(|spec| {
                let body = match spec.kind {
                    TableKind::Aggregated => {
                        aggregated_table(&data.trades, journal.risk_threshold)
                    }
                    TableKind::Detailed => detailed_table(&data.detailed),
                };
                (spec.name, body)
            })
            .collect();

        let mut charts: Vec<(String, String)> = Vec::new();
        for spec in journal.charts_or_default() {
            match spec.kind {
                ChartKind::Pie => {
                    if let Some(body) = build_chart(&spec.name, &data.stats) {
                        charts.push((spec.name, body));
                    }
                }
                ChartKind::Line => {
                    warn!(chart = %spec.name, "line charts are not supported yet, skipping");
                }
            }
        }

        let title = builder.format_title(&journal.name);
        let content = builder.build(&tables, &charts, journal);

        (title, content)
    }

    /// Full run: fetch, build, render, write. Returns the report path.
    pub async fn run(&self, source: &dyn ExecutionSource) -> Result<PathBuf> {
        let raw = self.fetch(source).await?;
        let data = self.build(&raw)?;
        let (title, content) = self.render(&data);

        let writer = ReportWriter::new(&self.config.journal.report_dir, self.timeframe)?;
        writer.write(&title, &content)
    }
}

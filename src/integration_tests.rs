//! End-to-end pipeline tests over a scripted data source

#[cfg(test)]
mod tests {
    use crate::client::{ExecutionSource, FetchWindow};
    use crate::config::Config;
    use crate::data::raw::{ExecutionRecord, OrderRecord, TransactionRecord};
    use crate::error::Result;
    use crate::pipeline::JournalPipeline;
    use crate::types::Timeframe;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    /// Replays one canned trade (entry + stop-out) for every window.
    struct ScriptedSource;

    fn execution(
        exec_id: &str,
        order_id: &str,
        create_type: &str,
        price: &str,
        qty: &str,
        closed: &str,
    ) -> ExecutionRecord {
        ExecutionRecord {
            symbol: "BTCUSDT".to_string(),
            side: String::new(),
            order_id: order_id.to_string(),
            exec_id: exec_id.to_string(),
            exec_type: "Trade".to_string(),
            create_type: Some(create_type.to_string()),
            order_type: "Market".to_string(),
            stop_order_type: String::new(),
            exec_time: "1700000000000".to_string(),
            exec_price: price.to_string(),
            exec_qty: qty.to_string(),
            closed_size: closed.to_string(),
            exec_fee: "0.05".to_string(),
        }
    }

    fn transaction(
        trade_id: &str,
        order_id: &str,
        side: &str,
        time: &str,
        cash_flow: &str,
        change: &str,
        balance: &str,
        size: &str,
    ) -> TransactionRecord {
        TransactionRecord {
            symbol: "BTCUSDT".to_string(),
            side: side.to_string(),
            tx_type: "TRADE".to_string(),
            order_id: order_id.to_string(),
            trade_id: trade_id.to_string(),
            transaction_time: time.to_string(),
            qty: String::new(),
            size: size.to_string(),
            cash_flow: cash_flow.to_string(),
            change: change.to_string(),
            cash_balance: balance.to_string(),
            fee: "0.05".to_string(),
        }
    }

    #[async_trait]
    impl ExecutionSource for ScriptedSource {
        async fn fetch_executions(&self, _window: &FetchWindow) -> Result<Vec<ExecutionRecord>> {
            Ok(vec![
                execution("e1", "o1", "CreateByUser", "100", "1", "0"),
                execution("e2", "o2", "CreateByClosing", "90", "1", "1"),
            ])
        }

        async fn fetch_transaction_log(
            &self,
            _window: &FetchWindow,
        ) -> Result<Vec<TransactionRecord>> {
            Ok(vec![
                transaction("e1", "o1", "Buy", "1700000000000", "0", "-0.05", "1000", "1"),
                transaction("e2", "o2", "Sell", "1700003600000", "-10", "-10.05", "989.9", "0"),
            ])
        }

        async fn fetch_order_history(&self, _window: &FetchWindow) -> Result<Vec<OrderRecord>> {
            Ok(vec![
                OrderRecord {
                    symbol: "BTCUSDT".to_string(),
                    order_id: "o1".to_string(),
                    side: "Buy".to_string(),
                    created_time: "1700000000000".to_string(),
                    order_status: "Filled".to_string(),
                    stop_loss: "90".to_string(),
                    take_profit: String::new(),
                },
                OrderRecord {
                    symbol: "BTCUSDT".to_string(),
                    order_id: "o2".to_string(),
                    side: "Sell".to_string(),
                    created_time: "1700003600000".to_string(),
                    order_status: "Filled".to_string(),
                    stop_loss: String::new(),
                    take_profit: String::new(),
                },
            ])
        }
    }

    fn pipeline(timeframe: Timeframe) -> JournalPipeline {
        let config: Config = toml::from_str("").unwrap();
        let date = NaiveDate::from_ymd_opt(2023, 11, 14).unwrap();
        JournalPipeline::new(config, date, timeframe)
    }

    #[tokio::test]
    async fn test_full_build_reconstructs_one_stopped_out_trade() {
        let pipeline = pipeline(Timeframe::Daily);
        let raw = pipeline.fetch(&ScriptedSource).await.unwrap();
        let data = pipeline.build(&raw).unwrap();

        assert_eq!(data.trades.len(), 1);
        let trade = &data.trades[0];
        assert_eq!(trade.entry_price, dec!(100));
        assert!(trade.stopped_out);
        assert!(trade.is_closed);
        assert_eq!(trade.trade_result, -1);
        assert_eq!(trade.risk, Some(dec!(0.01)));
        assert!(trade.risk_managed);

        assert_eq!(data.stats.total_trades, 1);
        assert_eq!(data.stats.wins, 0);
        assert_eq!(data.stats.stopped_out, 1);
        // realized changes: -0.05 + -10.05
        assert_eq!(data.stats.pnl, dec!(-10.1));
        assert_eq!(data.detailed.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_flattens_all_window_chunks() {
        // January spans five 7-day chunks; the scripted source replays the
        // same page for each
        let config: Config = toml::from_str("").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let pipeline = JournalPipeline::new(config, date, Timeframe::Monthly);
        let raw = pipeline.fetch(&ScriptedSource).await.unwrap();
        assert_eq!(raw.executions.len(), 10);
        assert_eq!(raw.transactions.len(), 10);
    }

    #[tokio::test]
    async fn test_render_produces_titled_document() {
        let pipeline = pipeline(Timeframe::Daily);
        let raw = pipeline.fetch(&ScriptedSource).await.unwrap();
        let data = pipeline.build(&raw).unwrap();
        let (title, content) = pipeline.render(&data);

        assert_eq!(title, "Daily Journal 2023-11-14 (-10.1%)");
        assert!(content.starts_with("---\n"));
        assert!(content.contains("## Aggregated View"));
        assert!(content.contains("## Detailed View"));
        assert!(content.contains("pie title Performance"));
        assert!(content.contains("**BTCUSDT**"));
    }
}

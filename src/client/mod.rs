//! Exchange API client
//!
//! Cursor-paginated, HMAC-signed GET requests against the three account
//! history endpoints. A journal window larger than the exchange's maximum
//! query range is split into day chunks which are fetched concurrently by
//! the pipeline.

pub mod auth;

use crate::config::ApiConfig;
use crate::data::raw::{ExecutionRecord, OrderRecord, TransactionRecord};
use crate::error::Result;
use async_trait::async_trait;
use self::auth::RequestSigner;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::types::Timeframe;

/// The exchange caps history queries at 7-day ranges.
pub const DAYS_PAGINATION_SIZE: u32 = 7;

const ACCEPTED_RET_CODES: &[i64] = &[0];

/// One `startTime`/`endTime` request range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Days of history one journal covers, anchored at the given start date.
pub fn window_days(start: NaiveDate, timeframe: Timeframe) -> u32 {
    match timeframe {
        Timeframe::Daily => 1,
        Timeframe::Weekly => 7,
        Timeframe::Monthly => {
            let next_month = if start.month() == 12 {
                NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
            }
            .expect("valid first-of-month date");
            let days_in_month = next_month.pred_opt().expect("valid last-of-month date").day();
            days_in_month - start.day() + 1
        }
    }
}

/// Split the journal window into exchange-sized request chunks.
pub fn chunk_windows(start: NaiveDate, timeframe: Timeframe) -> Vec<FetchWindow> {
    let total_days = window_days(start, timeframe);
    let mut windows = Vec::new();
    let mut offset = 0u32;

    while offset < total_days {
        let span = DAYS_PAGINATION_SIZE.min(total_days - offset);
        let window_start = (start + chrono::Duration::days(offset as i64))
            .and_hms_opt(0, 0, 0)
            .expect("valid midnight")
            .and_utc();
        windows.push(FetchWindow {
            start: window_start,
            end: window_start + chrono::Duration::days(span as i64),
        });
        offset += span;
    }

    windows
}

/// Source of the three account-history datasets. The HTTP client implements
/// this; tests drive the pipeline with a scripted source instead.
#[async_trait]
pub trait ExecutionSource: Send + Sync {
    async fn fetch_executions(&self, window: &FetchWindow) -> Result<Vec<ExecutionRecord>>;
    async fn fetch_transaction_log(&self, window: &FetchWindow) -> Result<Vec<TransactionRecord>>;
    async fn fetch_order_history(&self, window: &FetchWindow) -> Result<Vec<OrderRecord>>;
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(rename = "retCode")]
    ret_code: i64,
    #[serde(rename = "retMsg", default)]
    ret_msg: String,
    result: Option<ApiResult<T>>,
}

#[derive(Debug, Deserialize)]
struct ApiResult<T> {
    #[serde(default = "Vec::new")]
    list: Vec<T>,
    #[serde(rename = "nextPageCursor")]
    next_page_cursor: Option<String>,
}

/// Bybit V5 account-history client.
#[derive(Clone)]
pub struct BybitClient {
    http: Client,
    api: ApiConfig,
    signer: RequestSigner,
}

impl BybitClient {
    pub fn new(api: ApiConfig, signer: RequestSigner) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(api.timeout_secs))
            .build()?;

        Ok(Self { http, api, signer })
    }

    fn signed_params(&self, window: &FetchWindow, cursor: Option<&str>) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("api_key".to_string(), self.signer.api_key().to_string());
        params.insert("category".to_string(), "linear".to_string());
        params.insert(
            "timestamp".to_string(),
            Utc::now().timestamp_millis().to_string(),
        );
        params.insert(
            "startTime".to_string(),
            window.start.timestamp_millis().to_string(),
        );
        params.insert(
            "endTime".to_string(),
            window.end.timestamp_millis().to_string(),
        );
        if let Some(cursor) = cursor {
            params.insert("cursor".to_string(), cursor.to_string());
        }

        let signature = self.signer.sign(&params);
        params.insert("sign".to_string(), signature);
        params
    }

    /// Fetch every page of one endpoint for one window.
    ///
    /// A non-accepted internal return code stops pagination with a warning
    /// and yields what was gathered so far; partial data is tolerated, a
    /// transport error is not.
    async fn fetch_paginated<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        window: &FetchWindow,
    ) -> Result<Vec<T>> {
        let url = format!("{}{}", self.api.base_url.trim_end_matches('/'), endpoint);
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let params = self.signed_params(window, cursor.as_deref());
            let response = self
                .http
                .get(&url)
                .query(&params)
                .send()
                .await?
                .error_for_status()?;

            let body: ApiResponse<T> = response.json().await?;
            if !ACCEPTED_RET_CODES.contains(&body.ret_code) {
                warn!(
                    code = body.ret_code,
                    msg = %body.ret_msg,
                    endpoint,
                    "unable to process request, keeping pages fetched so far"
                );
                return Ok(records);
            }

            let Some(result) = body.result else {
                break;
            };
            debug!(endpoint, page_len = result.list.len(), "fetched page");
            records.extend(result.list);

            match result.next_page_cursor.filter(|c| !c.is_empty()) {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl ExecutionSource for BybitClient {
    async fn fetch_executions(&self, window: &FetchWindow) -> Result<Vec<ExecutionRecord>> {
        self.fetch_paginated(&self.api.execution_endpoint, window).await
    }

    async fn fetch_transaction_log(&self, window: &FetchWindow) -> Result<Vec<TransactionRecord>> {
        self.fetch_paginated(&self.api.transaction_log_endpoint, window).await
    }

    async fn fetch_order_history(&self, window: &FetchWindow) -> Result<Vec<OrderRecord>> {
        self.fetch_paginated(&self.api.order_history_endpoint, window).await
    }
}

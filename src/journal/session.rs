//! Trading session windows
//!
//! Fixed UTC trading-hours windows used to tag when a trade was opened.
//! Windows overlap, so an entry can belong to several sessions; one falling
//! in no window yields an empty set.

use crate::types::TradingSession;
use chrono::{DateTime, NaiveTime, Utc};

fn session_windows() -> [(TradingSession, NaiveTime, NaiveTime); 4] {
    let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).expect("valid session time");
    [
        // Sydney spans midnight
        (TradingSession::Sydney, hm(22, 0), hm(8, 0)),
        (TradingSession::Tokyo, hm(0, 0), hm(8, 0)),
        (TradingSession::London, hm(8, 0), hm(17, 0)),
        (TradingSession::NewYork, hm(14, 30), hm(20, 0)),
    ]
}

/// Sessions whose window contains the given datetime's time of day.
pub fn sessions_at(date: DateTime<Utc>) -> Vec<TradingSession> {
    let time = date.time();

    session_windows()
        .iter()
        .filter(|(_, start, end)| {
            if start > end {
                // midnight wrap
                time >= *start || time < *end
            } else {
                time >= *start && time < *end
            }
        })
        .map(|(session, _, _)| *session)
        .collect()
}

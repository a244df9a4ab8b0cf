//! Journal document assembly
//!
//! Builds the final markdown document out of rendered tables and charts:
//! properties frontmatter, ordered content sections, a notes callout, tags
//! and wiki-link footer.

pub mod chart;
pub mod table;
pub mod writer;

pub use chart::build_chart;
pub use table::{aggregated_table, detailed_table};
pub use writer::ReportWriter;

use crate::config::JournalConfig;
use crate::types::Timeframe;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

/// Assembles one journal document.
pub struct JournalBuilder {
    timeframe: Timeframe,
    date: NaiveDate,
    exchange: String,
    pnl: Decimal,
}

impl JournalBuilder {
    pub fn new(timeframe: Timeframe, date: NaiveDate, exchange: &str, pnl: Decimal) -> Self {
        Self {
            timeframe,
            date,
            exchange: exchange.to_string(),
            pnl,
        }
    }

    /// Fill the `{timeframe}` / `{date}` / `{pnl}` arguments of the
    /// configured title template. Unknown arguments are left untouched.
    pub fn format_title(&self, template: &str) -> String {
        let pnl = if self.pnl > Decimal::ZERO {
            format!("(+{}%)", self.pnl)
        } else {
            format!("({}%)", self.pnl)
        };

        template
            .replace("{timeframe}", &self.timeframe.to_string())
            .replace("{date}", &self.date.to_string())
            .replace("{pnl}", &pnl)
    }

    /// Frontmatter properties block.
    fn properties(&self, css_classes: &[String]) -> String {
        let today = Utc::now().date_naive();
        let mut block = String::from("---\n");
        block.push_str(&format!("Timeframe: {}\n", self.timeframe));
        block.push_str(&format!("Exchange: {}\n", self.exchange));
        block.push_str(&format!(
            "Profitable: {}\n",
            self.pnl > Decimal::ZERO
        ));
        block.push_str(&format!("DateCreated: {today}\n"));
        block.push_str(&format!("DateUpdated: {today}\n"));
        if !css_classes.is_empty() {
            block.push_str("cssclasses:\n");
            for class in css_classes {
                block.push_str(&format!("   - {class}\n"));
            }
        }
        block.push_str("---\n");
        block
    }

    fn tags(&self, tags: &[String]) -> String {
        tags.iter()
            .map(|t| format!("#{t}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn footer(&self, links: &[String]) -> String {
        links
            .iter()
            .map(|l| format!("[[{l}]]"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Assemble the document: sections follow the configured display order.
    pub fn build(
        &self,
        tables: &[(String, String)],
        charts: &[(String, String)],
        journal: &JournalConfig,
    ) -> String {
        let mut content_sections: Vec<String> = Vec::new();
        for section in &journal.display_order {
            match section.as_str() {
                "tables" => {
                    for (title, body) in tables {
                        content_sections.push(format!("## {title}\n\n{body}"));
                    }
                }
                "charts" => {
                    for (title, body) in charts {
                        content_sections.push(format!("## {title}\n\n{body}"));
                    }
                }
                _ => {}
            }
        }

        format!(
            "{}\n{}\n\n> [!NOTE] Other Details\n\n{}\n\n{}\n",
            self.properties(&journal.css_classes),
            content_sections.join("\n\n"),
            self.tags(&journal.tags),
            self.footer(&journal.links)
        )
    }
}

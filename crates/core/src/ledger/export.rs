//! Delimited-text rendering of ledger views.

use csv::WriterBuilder;

use super::ledger_model::{FundSummary, PartnerAttribution};
use crate::errors::{Error, Result};
use crate::utils::decimal_utils::{format_decimal, round_display};

pub const SUMMARY_HEADER: [&str; 9] = [
    "fund",
    "contributions",
    "withdrawals",
    "net_capital",
    "realized_pnl",
    "total_equity",
    "return_pct",
    "open_trades",
    "closed_trades",
];

pub const PARTNERS_HEADER: [&str; 6] = [
    "partner",
    "net_capital",
    "participation_pct",
    "allocated_pnl",
    "total",
    "return_pct",
];

/// One header row and one data row. Money and ratios are rounded to display
/// precision and written without trailing zeros.
pub fn summary_to_csv(summary: &FundSummary) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(SUMMARY_HEADER)?;
    writer.write_record([
        summary.fund.clone(),
        cell(summary.contributions),
        cell(summary.withdrawals),
        cell(summary.net_capital),
        cell(summary.realized_pnl),
        cell(summary.total_equity),
        cell(summary.return_pct),
        summary.open_trades.to_string(),
        summary.closed_trades.to_string(),
    ])?;
    finish(writer)
}

/// Header plus one row per partner, in the order given.
pub fn partners_to_csv(rows: &[PartnerAttribution]) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(PARTNERS_HEADER)?;
    for row in rows {
        writer.write_record([
            row.partner.clone(),
            cell(row.net_capital),
            cell(row.participation_pct),
            cell(row.allocated_pnl),
            cell(row.total),
            cell(row.return_pct),
        ])?;
    }
    finish(writer)
}

fn cell(value: rust_decimal::Decimal) -> String {
    format_decimal(round_display(value))
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Unexpected(format!("Failed to flush export: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Unexpected(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_summary_csv_rounds_to_two_places() {
        let summary = FundSummary {
            fund: "Alpha".to_string(),
            contributions: dec!(3000),
            withdrawals: dec!(0),
            net_capital: dec!(3000),
            realized_pnl: dec!(100),
            total_equity: dec!(3100),
            return_pct: dec!(3.333333333),
            open_trades: 1,
            closed_trades: 2,
        };

        let text = summary_to_csv(&summary).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), SUMMARY_HEADER.join(","));
        assert_eq!(lines.next().unwrap(), "Alpha,3000,0,3000,100,3100,3.33,1,2");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_partners_csv_keeps_order_and_quotes() {
        let rows = vec![
            PartnerAttribution {
                partner: "Doe, Jane".to_string(),
                net_capital: dec!(1000),
                participation_share: dec!(0.25),
                participation_pct: dec!(25),
                allocated_pnl: dec!(100),
                total: dec!(1100),
                return_pct: dec!(10),
            },
            PartnerAttribution {
                partner: "Y".to_string(),
                net_capital: dec!(3000),
                participation_share: dec!(0.75),
                participation_pct: dec!(75),
                allocated_pnl: dec!(300),
                total: dec!(3300),
                return_pct: dec!(10),
            },
        ];

        let text = partners_to_csv(&rows).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "\"Doe, Jane\",1000,25,100,1100,10");
        assert_eq!(lines[2], "Y,3000,75,300,3300,10");
    }

    #[test]
    fn test_partners_csv_empty_has_header_only() {
        let text = partners_to_csv(&[]).unwrap();
        assert_eq!(text.trim_end(), PARTNERS_HEADER.join(","));
    }
}

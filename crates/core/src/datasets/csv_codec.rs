//! Reading and writing the flat CSV tables.
//!
//! The same decoder serves persisted files and uploads: a header row whose
//! columns are a subset of the dataset header, then one record per row.
//! Absent optional columns take defaults; absent required columns make every
//! row fail. Any failing row rejects the whole input.

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::debug;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

use super::datasets_model::Dataset;
use super::schema::validate_columns;
use crate::constants::FIRST_TRADE_ID;
use crate::errors::{Error, Result, ValidationError};
use crate::movements::{CapitalMovement, MovementKind};
use crate::trades::{canonical_strategy, TradeOutcome, TradeRecord};
use crate::utils::decimal_utils::{format_decimal, parse_decimal};
use crate::utils::time_utils::{format_date, parse_date};

/// Rows of a dataset plus the expected columns the input did not carry.
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    pub rows: Vec<T>,
    pub defaulted_columns: Vec<String>,
}

/// Strips a UTF-8 byte order mark and rejects invalid UTF-8.
fn decode_text(content: &[u8]) -> Result<&str> {
    let without_bom = content.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(content);
    std::str::from_utf8(without_bom).map_err(|e| {
        Error::Validation(ValidationError::InvalidInput(format!(
            "Invalid UTF-8 encoding at byte {}",
            e.valid_up_to()
        )))
    })
}

/// A header-addressed view over one record.
struct Row<'a> {
    number: usize,
    columns: &'a HashMap<String, usize>,
    record: &'a StringRecord,
}

impl<'a> Row<'a> {
    /// The trimmed cell, `None` when the column is absent or the cell is blank.
    fn optional(&self, column: &str) -> Option<&'a str> {
        self.columns
            .get(column)
            .and_then(|&i| self.record.get(i))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn required(&self, column: &str) -> Result<&'a str> {
        self.optional(column)
            .ok_or_else(|| self.invalid(format!("missing value for '{}'", column)))
    }

    fn decimal(&self, column: &str) -> Result<Decimal> {
        let raw = self.required(column)?;
        parse_decimal(raw, column).map_err(|e| self.invalid(e.to_string()))
    }

    fn decimal_or_zero(&self, column: &str) -> Result<Decimal> {
        match self.optional(column) {
            Some(raw) => parse_decimal(raw, column).map_err(|e| self.invalid(e.to_string())),
            None => Ok(Decimal::ZERO),
        }
    }

    fn date(&self) -> Result<chrono::NaiveDate> {
        let raw = self.required("date")?;
        parse_date(raw).map_err(|e| self.invalid(format!("'{}': {}", raw, e)))
    }

    fn invalid(&self, message: String) -> Error {
        Error::Validation(ValidationError::InvalidRow {
            row: self.number,
            message,
        })
    }
}

/// Parses the header, applies the subset rule and hands each non-blank
/// record to `parse_row`.
fn decode_rows<T>(
    dataset: Dataset,
    content: &[u8],
    mut parse_row: impl FnMut(&Row<'_>) -> Result<T>,
) -> Result<Decoded<T>> {
    let text = decode_text(content)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "The {} data has no header row",
            dataset
        ))));
    }
    let defaulted_columns = validate_columns(dataset, &headers)?;
    let columns: HashMap<String, usize> = headers
        .into_iter()
        .enumerate()
        .map(|(i, h)| (h, i))
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let number = idx + 2;
        let record = result.map_err(|e| {
            Error::Validation(ValidationError::InvalidRow {
                row: number,
                message: e.to_string(),
            })
        })?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let row = Row {
            number,
            columns: &columns,
            record: &record,
        };
        rows.push(parse_row(&row)?);
    }

    debug!(
        "Decoded {} {} rows, defaulted columns: {:?}",
        rows.len(),
        dataset,
        defaulted_columns
    );
    Ok(Decoded {
        rows,
        defaulted_columns,
    })
}

pub fn decode_movements(content: &[u8]) -> Result<Decoded<CapitalMovement>> {
    decode_rows(Dataset::Movements, content, |row| {
        let kind: MovementKind = row
            .required("kind")?
            .parse()
            .map_err(|e: ValidationError| row.invalid(e.to_string()))?;
        let movement = CapitalMovement {
            fund: row.required("fund")?.to_string(),
            partner: row.required("partner")?.to_string(),
            external_id: row.optional("external_id").map(str::to_string),
            date: row.date()?,
            kind,
            amount: row.decimal("amount")?,
        };
        movement
            .validate()
            .map_err(|e| row.invalid(e.to_string()))?;
        Ok(movement)
    })
}

/// Decodes trades. Derived amounts are always recomputed from the value
/// columns; rows without an id get the next free id of their fund.
pub fn decode_trades(content: &[u8]) -> Result<Decoded<TradeRecord>> {
    let decoded = decode_rows(Dataset::Trades, content, |row| {
        let id = match row.optional("id") {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| row.invalid(format!("'{}' is not a valid trade id", raw)))?,
            ),
            None => None,
        };
        let outcome = match row.optional("outcome") {
            Some(raw) => raw
                .parse::<TradeOutcome>()
                .map_err(|e| row.invalid(e.to_string()))?,
            None => TradeOutcome::Open,
        };
        let mut record = TradeRecord {
            id: id.unwrap_or_default(),
            fund: row.required("fund")?.to_string(),
            date: row.date()?,
            asset: row.required("asset")?.to_string(),
            strategy: canonical_strategy(row.required("strategy")?),
            broker: row.optional("broker").unwrap_or_default().to_string(),
            position_value: row.decimal("position_value")?,
            take_profit_pct: row.decimal("take_profit_pct")?,
            stop_loss_pct: row.decimal("stop_loss_pct")?,
            fee: row.decimal_or_zero("fee")?,
            take_profit_amount: Decimal::ZERO,
            stop_loss_amount: Decimal::ZERO,
            outcome,
        };
        record.validate().map_err(|e| row.invalid(e.to_string()))?;
        record
            .recompute_targets()
            .map_err(|e| row.invalid(e.to_string()))?;
        Ok((row.number, id, record))
    })?;

    Ok(Decoded {
        rows: assign_trade_ids(decoded.rows)?,
        defaulted_columns: decoded.defaulted_columns,
    })
}

/// Checks id uniqueness per fund and numbers the rows that came without one.
fn assign_trade_ids(pending: Vec<(usize, Option<u64>, TradeRecord)>) -> Result<Vec<TradeRecord>> {
    let exhausted = |row: usize, fund: &str| {
        Error::Validation(ValidationError::InvalidRow {
            row,
            message: format!("no trade id left after this row in fund '{}'", fund),
        })
    };

    let mut taken: HashSet<(String, u64)> = HashSet::new();
    let mut next_id: HashMap<String, u64> = HashMap::new();
    for (number, id, record) in &pending {
        if let Some(id) = id {
            if !taken.insert((record.fund.clone(), *id)) {
                return Err(Error::Validation(ValidationError::InvalidRow {
                    row: *number,
                    message: format!("duplicate trade id {} in fund '{}'", id, record.fund),
                }));
            }
            let following = id
                .checked_add(1)
                .ok_or_else(|| exhausted(*number, &record.fund))?;
            let next = next_id.entry(record.fund.clone()).or_insert(FIRST_TRADE_ID);
            *next = (*next).max(following);
        }
    }

    let mut rows = Vec::with_capacity(pending.len());
    for (number, id, mut record) in pending {
        if id.is_none() {
            let next = next_id.entry(record.fund.clone()).or_insert(FIRST_TRADE_ID);
            record.id = *next;
            *next = next
                .checked_add(1)
                .ok_or_else(|| exhausted(number, &record.fund))?;
        }
        rows.push(record);
    }
    Ok(rows)
}

/// Decodes the fund registry. Blank and repeated names are dropped.
pub fn decode_funds(content: &[u8]) -> Result<Decoded<String>> {
    let mut decoded = decode_rows(Dataset::Funds, content, |row| {
        Ok(row.required("fund")?.to_string())
    })?;
    let mut seen = HashSet::new();
    decoded.rows.retain(|name| seen.insert(name.clone()));
    Ok(decoded)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| Error::Unexpected(format!("Failed to flush CSV buffer: {}", e)))
}

pub fn encode_movements(movements: &[CapitalMovement]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(Dataset::Movements.header())?;
    for m in movements {
        writer.write_record([
            m.fund.as_str(),
            m.partner.as_str(),
            m.external_id.as_deref().unwrap_or_default(),
            format_date(m.date).as_str(),
            m.kind.as_str(),
            format_decimal(m.amount).as_str(),
        ])?;
    }
    finish(writer)
}

pub fn encode_trades(trades: &[TradeRecord]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(Dataset::Trades.header())?;
    for t in trades {
        writer.write_record([
            t.id.to_string(),
            t.fund.clone(),
            format_date(t.date),
            t.asset.clone(),
            t.strategy.clone(),
            t.broker.clone(),
            format_decimal(t.position_value),
            format_decimal(t.take_profit_pct),
            format_decimal(t.stop_loss_pct),
            format_decimal(t.fee),
            format_decimal(t.take_profit_amount),
            format_decimal(t.stop_loss_amount),
            t.outcome.as_str().to_string(),
        ])?;
    }
    finish(writer)
}

pub fn encode_funds(names: &[String]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(Dataset::Funds.header())?;
    for name in names {
        writer.write_record([name.as_str()])?;
    }
    finish(writer)
}

//! Capital movement domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::MAX_AMOUNT;
use crate::utils::decimal_utils::ensure_within;
use crate::{errors::ValidationError, Error, Result};

/// Direction of a capital movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    Contribution,
    Withdrawal,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Contribution => "Contribution",
            MovementKind::Withdrawal => "Withdrawal",
        }
    }

    /// Sign applied to the amount when aggregating.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            MovementKind::Contribution => amount,
            MovementKind::Withdrawal => -amount,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = ValidationError;

    /// Accepts the canonical labels plus the legacy `Aporte`/`Retiro` ones.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contribution" | "aporte" => Ok(MovementKind::Contribution),
            "withdrawal" | "retiro" => Ok(MovementKind::Withdrawal),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown movement kind '{}'",
                other
            ))),
        }
    }
}

/// A partner's contribution to or withdrawal from a fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalMovement {
    pub fund: String,
    pub partner: String,
    pub external_id: Option<String>,
    pub date: NaiveDate,
    pub kind: MovementKind,
    pub amount: Decimal,
}

impl CapitalMovement {
    /// Amount with the sign implied by the kind.
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }

    /// Checks the row-level invariants shared by every entry path.
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.fund, &self.partner, self.amount)
    }
}

/// A movement together with its position among the fund's rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedMovement {
    pub index: usize,
    #[serde(flatten)]
    pub movement: CapitalMovement,
}

/// Input model for registering a movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovement {
    pub fund: String,
    pub partner: String,
    pub external_id: Option<String>,
    pub date: NaiveDate,
    pub kind: MovementKind,
    pub amount: Decimal,
}

impl NewMovement {
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.fund, &self.partner, self.amount)
    }
}

impl From<NewMovement> for CapitalMovement {
    fn from(new: NewMovement) -> Self {
        Self {
            fund: new.fund.trim().to_string(),
            partner: new.partner.trim().to_string(),
            external_id: normalize_optional(new.external_id),
            date: new.date,
            kind: new.kind,
            amount: new.amount,
        }
    }
}

/// Full replacement of a movement's non-key fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementUpdate {
    pub partner: String,
    pub external_id: Option<String>,
    pub date: NaiveDate,
    pub kind: MovementKind,
    pub amount: Decimal,
}

impl MovementUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.partner.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "partner".to_string(),
            )));
        }
        check_amount(self.amount)
    }

    /// Applies the update, keeping the fund.
    pub fn apply_to(self, movement: &mut CapitalMovement) {
        movement.partner = self.partner.trim().to_string();
        movement.external_id = normalize_optional(self.external_id);
        movement.date = self.date;
        movement.kind = self.kind;
        movement.amount = self.amount;
    }
}

fn validate_fields(fund: &str, partner: &str, amount: Decimal) -> Result<()> {
    if fund.trim().is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "fund".to_string(),
        )));
    }
    if partner.trim().is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "partner".to_string(),
        )));
    }
    check_amount(amount)
}

fn check_amount(amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(Error::Validation(ValidationError::NegativeAmount(
            "amount".to_string(),
        )));
    }
    ensure_within(amount, MAX_AMOUNT, "amount")?;
    Ok(())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

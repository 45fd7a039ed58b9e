//! Fund domain models.

use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// A named pool of capital. Funds carry no attributes beyond their name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    pub name: String,
}

/// Input model for registering a fund.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFund {
    pub name: String,
}

impl NewFund {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Fund name cannot be empty".to_string(),
            )));
        }
        Ok(())
    }

    /// The name as it will be stored.
    pub fn normalized_name(&self) -> String {
        self.name.trim().to_string()
    }
}

//! Allow-list of trade strategies.
//!
//! Strategy is an open set of labels that grows over time, so it is modelled
//! as a validated string rather than a closed enum.

use super::trades_constants::{DEFAULT_STRATEGIES, STRATEGY_ALIASES};
use super::trades_errors::TradeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyCatalog {
    entries: Vec<String>,
}

impl Default for StrategyCatalog {
    fn default() -> Self {
        Self {
            entries: DEFAULT_STRATEGIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl StrategyCatalog {
    /// Default strategies extended with configured extras.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::default();
        for item in extra {
            catalog.add(item.as_ref());
        }
        catalog
    }

    /// Adds a strategy. Blank or already known labels are ignored.
    pub fn add(&mut self, strategy: &str) {
        let label = strategy.trim().to_lowercase();
        if label.is_empty() || self.entries.contains(&label) {
            return;
        }
        self.entries.push(label);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Resolves raw input to its canonical label (case-insensitive, aliases applied).
    pub fn resolve(&self, raw: &str) -> Result<String, TradeError> {
        let label = canonical_strategy(raw);
        if self.entries.contains(&label) {
            Ok(label)
        } else {
            Err(TradeError::UnknownStrategy(raw.trim().to_string()))
        }
    }
}

/// Lower-cases and trims a label and maps legacy aliases, without checking
/// it against any allow-list. Used when loading stored or uploaded rows.
pub fn canonical_strategy(raw: &str) -> String {
    let label = raw.trim().to_lowercase();
    STRATEGY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == label)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(label)
}

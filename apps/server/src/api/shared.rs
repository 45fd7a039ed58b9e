use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use fundbook_core::trades::{canonical_strategy, TradeFilter};
use utoipa::IntoParams;

/// Query string accepted by trade listings and P/L views.
///
/// `broker` and `strategy` take comma-separated lists.
#[derive(Debug, Default, serde::Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TradeQuery {
    /// First trade date, inclusive.
    pub from: Option<NaiveDate>,
    /// Last trade date, inclusive.
    pub to: Option<NaiveDate>,
    pub broker: Option<String>,
    pub strategy: Option<String>,
}

impl TradeQuery {
    pub fn into_filter(self) -> TradeFilter {
        TradeFilter {
            from: self.from,
            to: self.to,
            brokers: self.broker.as_deref().and_then(split_list),
            strategies: self
                .strategy
                .as_deref()
                .and_then(split_list)
                .map(|items| items.iter().map(|s| canonical_strategy(s)).collect()),
        }
    }
}

fn split_list(raw: &str) -> Option<Vec<String>> {
    let items: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    (!items.is_empty()).then_some(items)
}

/// A CSV body served as a download.
pub fn csv_attachment(file_name: &str, body: impl Into<String>) -> Response {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{safe}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body.into(),
    )
        .into_response()
}

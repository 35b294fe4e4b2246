//! The query model: the per-panel query object stored by Grafana, its
//! default values, and the resolved payload handed to the transport.

use std::fmt;

use grafana_plugin_sdk::backend;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::time_format;

/// Time field name used when a query does not name one.
pub const DEFAULT_TIME_FIELD: &str = "time";
/// Timezone used when a query does not name one.
pub const DEFAULT_TIMEZONE: &str = "Asia/Shanghai";
/// Java-style time format used when a query does not name one.
pub const DEFAULT_TIME_FORMAT: &str = "yyyy-MM-dd HH:mm:ss";
/// Numeric value field name used when a query does not name one.
pub const DEFAULT_NUMBER_FIELD: &str = "qpm";

/// How the results of a query should be shaped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    /// Shape results as one or more time series.
    #[default]
    TimeSeries,
    /// Shape results as a table.
    Table,
}

impl Format {
    /// The selectable formats, in the order the query editor offers them.
    pub const ALL: [Self; 2] = [Self::TimeSeries, Self::Table];
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeSeries => f.write_str("TimeSeries"),
            Self::Table => f.write_str("Table"),
        }
    }
}

/// One panel's query, as stored and sent by Grafana.
///
/// Every field is optional: the stored object only contains what the user
/// has explicitly edited, and absent fields are overlaid with defaults at
/// use time (see [`SlsQuery::resolve`]) rather than written back. Unknown
/// fields in incoming JSON (the host's `refId`, `hide`, and so on) are
/// ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlsQuery {
    /// The SLS query text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_text: Option<String>,
    /// The output format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    /// Field holding the x-axis timestamps of a time series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_field: Option<String>,
    /// Timezone in which the time field is parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Java-style pattern in which the time field is parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
    /// Field holding the y-axis values of a time series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_field: Option<String>,
}

/// The effective value of an optional query field.
///
/// Both absent and empty fields fall back to the default: the stored
/// object may contain `""` after the user clears an input, and that
/// counts as unset.
pub(crate) fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

impl SlsQuery {
    /// Overlay this query onto the defaults, producing the effective query.
    ///
    /// A field set on the query wins; anything absent (or empty) takes its
    /// default. This computes a new value and never mutates or stores the
    /// defaults back onto the query itself.
    pub fn resolve(&self) -> ResolvedQuery {
        ResolvedQuery {
            query_text: self.query_text.clone().unwrap_or_default(),
            format: self.format.unwrap_or_default(),
            time_field: or_default(&self.time_field, DEFAULT_TIME_FIELD).to_owned(),
            timezone: or_default(&self.timezone, DEFAULT_TIMEZONE).to_owned(),
            time_format: or_default(&self.time_format, DEFAULT_TIME_FORMAT).to_owned(),
            number_field: or_default(&self.number_field, DEFAULT_NUMBER_FIELD).to_owned(),
        }
    }
}

/// An [`SlsQuery`] with every optional field made concrete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedQuery {
    /// The SLS query text (empty if the user has not entered one).
    pub query_text: String,
    /// The output format.
    pub format: Format,
    /// Field holding the x-axis timestamps of a time series.
    pub time_field: String,
    /// Timezone in which the time field is parsed.
    pub timezone: String,
    /// Java-style pattern in which the time field is parsed.
    pub time_format: String,
    /// Field holding the y-axis values of a time series.
    pub number_field: String,
}

impl Default for ResolvedQuery {
    fn default() -> Self {
        SlsQuery::default().resolve()
    }
}

/// The fully resolved form of one query, as handed to the transport.
///
/// This is the query after the defaults overlay, with the time format
/// converted to a `chrono` strftime pattern and the panel's time range
/// flattened to epoch seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPayload {
    /// The SLS query text.
    pub query_text: String,
    /// The output format.
    pub format: Format,
    /// Field holding the x-axis timestamps of a time series.
    pub time_field: String,
    /// Timezone in which the time field is parsed.
    pub timezone: String,
    /// strftime pattern in which the time field is parsed.
    pub time_format: String,
    /// Field holding the y-axis values of a time series.
    pub number_field: String,
    /// Start of the queried window, in epoch seconds.
    pub from: i64,
    /// End of the queried window, in epoch seconds.
    pub to: i64,
    /// Maximum number of points the panel can render.
    pub max_data_points: i64,
}

impl QueryPayload {
    /// Resolve one incoming data query into the payload for the transport.
    pub fn from_query(query: &backend::DataQuery<SlsQuery>) -> Self {
        let resolved = query.query.resolve();
        let payload = Self {
            query_text: resolved.query_text,
            format: resolved.format,
            time_field: resolved.time_field,
            timezone: resolved.timezone,
            time_format: time_format::to_strftime(&resolved.time_format),
            number_field: resolved.number_field,
            from: query.time_range.from.timestamp(),
            to: query.time_range.to.timestamp(),
            max_data_points: query.max_data_points,
        };
        debug!(
            query_text = %payload.query_text,
            format = %payload.format,
            time_field = %payload.time_field,
            timezone = %payload.timezone,
            time_format = %payload.time_format,
            number_field = %payload.number_field,
            from = payload.from,
            to = payload.to,
            max_data_points = payload.max_data_points,
            "Resolved query payload",
        );
        payload
    }
}

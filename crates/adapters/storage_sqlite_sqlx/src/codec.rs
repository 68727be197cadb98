//! Column encoding shared by the repositories.

use chrono::SecondsFormat;
use clinic_domain::extra::ExtraFields;
use clinic_domain::price::Price;
use clinic_domain::time::{Timestamp, parse_rfc3339};

/// Wrap any decoding failure as a [`sqlx::Error::Decode`].
pub(crate) fn decode_err(err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub(crate) fn encode_time(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn decode_time(value: &str) -> Result<Timestamp, sqlx::Error> {
    parse_rfc3339(value).map_err(decode_err)
}

pub(crate) fn decode_price(value: f64) -> Result<Price, sqlx::Error> {
    Price::new(value).map_err(decode_err)
}

pub(crate) fn decode_extra(value: &str) -> Result<ExtraFields, sqlx::Error> {
    serde_json::from_str(value).map_err(decode_err)
}

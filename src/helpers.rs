use std::{fmt, io, str::FromStr};

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use crate::error::Error;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Accepts RFC 3339 as well as naive timestamps, which are taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, Error> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(date) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(date.and_utc());
        }
    }

    Err(Error::DecodeDateTimeError(value.to_owned()))
}

pub fn deserialize_timestamp<'de, D>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_timestamp(&value).map_err(de::Error::custom)
}

pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value {
        Some(v) if !v.trim().is_empty() => {
            parse_timestamp(&v).map(Some).map_err(de::Error::custom)
        },
        _ => Ok(None),
    }
}

pub fn parse_decimal(value: &str) -> Result<BigDecimal, Error> {
    Ok(BigDecimal::from_str(value.trim())?)
}

fn decimal_from_value<E>(value: Value) -> Result<Option<BigDecimal>, E>
where
    E: de::Error,
{
    // numbers go through their shortest text form, so 700.1 stays 700.1
    // instead of the nearest binary double
    let text = match value {
        Value::Null => return Ok(None),
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        other => {
            return Err(E::custom(format!("expected a decimal, got {}", other)))
        },
    };

    parse_decimal(&text).map(Some).map_err(E::custom)
}

/// Monetary field sent either as a decimal string or as a JSON number.
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    decimal_from_value(value)?
        .ok_or_else(|| de::Error::custom("expected a decimal, got null"))
}

pub fn deserialize_optional_decimal<'de, D>(
    deserializer: D,
) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    decimal_from_value(value)
}

/// `0x1234...abcd` form used in tables.
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_char_boundary(6) {
        return address.to_owned();
    }

    let tail = address.len() - 4;
    if !address.is_char_boundary(tail) {
        return address.to_owned();
    }

    format!("{}...{}", &address[..6], &address[tail..])
}

/// Splits a comma separated env value, dropping empty items.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_owned())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VolumeInterval {
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

impl VolumeInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeInterval::Hour => "hour",
            VolumeInterval::Day => "day",
            VolumeInterval::Week => "week",
            VolumeInterval::Month => "month",
        }
    }
}

impl fmt::Display for VolumeInterval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VolumeInterval {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<VolumeInterval, Self::Err> {
        match value.to_lowercase().as_str() {
            "hour" => Ok(VolumeInterval::Hour),
            "day" => Ok(VolumeInterval::Day),
            "week" => Ok(VolumeInterval::Week),
            "month" => Ok(VolumeInterval::Month),
            _ => Err(io::Error::other("Interval not supported")),
        }
    }
}

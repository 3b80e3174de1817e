//! Serde helpers for the WSFEv1 wire conventions.

use serde::{Deserialize, Deserializer, Serializer};

const DATE_FORMAT: &str = "%Y%m%d";

/// Dates travel as `yyyymmdd` strings.
pub(crate) mod afip_date {
    use chrono::NaiveDate;

    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = RawDate::deserialize(d)?;
        parse(&raw.into_string()).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse(s: &str) -> Result<NaiveDate, String> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map_err(|e| format!("invalid yyyymmdd date {s:?}: {e}"))
    }

    /// SOAP clients sometimes hand dates over as numbers.
    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum RawDate {
        Text(String),
        Number(u64),
    }

    impl RawDate {
        pub(super) fn into_string(self) -> String {
            match self {
                Self::Text(s) => s,
                Self::Number(n) => n.to_string(),
            }
        }
    }
}

/// Optional `yyyymmdd` dates. Empty strings stand for "no date".
pub(crate) mod afip_date_opt {
    use chrono::NaiveDate;

    use super::afip_date::{RawDate, parse};
    use super::*;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.collect_str(&d.format(DATE_FORMAT)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let Some(raw) = Option::<RawDate>::deserialize(d)? else {
            return Ok(None);
        };
        let s = raw.into_string();
        if s.trim().is_empty() {
            return Ok(None);
        }
        parse(&s).map(Some).map_err(serde::de::Error::custom)
    }
}

/// Integers travel as numbers, or as text when the SOAP client builds its
/// tree from XML.
pub(crate) mod afip_int {
    use std::fmt::Display;
    use std::str::FromStr;

    use super::*;

    pub fn deserialize<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let raw = RawInt::deserialize(d)?;
        parse(&raw.into_string()).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse<T>(s: &str) -> Result<T, String>
    where
        T: FromStr,
        T::Err: Display,
    {
        s.trim()
            .parse()
            .map_err(|e| format!("invalid integer {s:?}: {e}"))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum RawInt {
        Unsigned(u64),
        Signed(i64),
        Text(String),
    }

    impl RawInt {
        pub(super) fn into_string(self) -> String {
            match self {
                Self::Unsigned(n) => n.to_string(),
                Self::Signed(n) => n.to_string(),
                Self::Text(s) => s,
            }
        }
    }
}

/// Optional integers. Empty text stands for "absent".
pub(crate) mod afip_int_opt {
    use std::fmt::Display;
    use std::str::FromStr;

    use super::afip_int::{RawInt, parse};
    use super::*;

    pub fn deserialize<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let Some(raw) = Option::<RawInt>::deserialize(d)? else {
            return Ok(None);
        };
        let s = raw.into_string();
        if s.trim().is_empty() {
            return Ok(None);
        }
        parse(&s).map(Some).map_err(serde::de::Error::custom)
    }
}

/// Repeated XML elements come back from SOAP clients as a bare object when
/// there is exactly one of them, and as an array otherwise.
pub(crate) mod one_or_many {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    pub fn deserialize<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(match Option::<OneOrMany<T>>::deserialize(d)? {
            Some(OneOrMany::Many(v)) => v,
            Some(OneOrMany::One(v)) => vec![v],
            None => Vec::new(),
        })
    }
}

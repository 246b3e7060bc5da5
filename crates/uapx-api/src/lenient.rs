// Permissive numeric decoding
//
// Some firmware builds emit `"cpu": "12.5"`, others `"cpu": 12.5`, and the
// same firmware mixes both across fields. These helpers are attached with
// `#[serde(deserialize_with)]` only to the fields known to vary; every other
// field in the document decodes strictly. A string that is not a number is
// still an error, never a silent zero.
//
// Independently of that, any field may be `null` on some firmware.
// `null_as_default` maps it to the field's zero value without loosening
// the type check.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use serde::de::{self, Unexpected, Visitor};

/// Numeric target of a permissive field.
trait Lenient: Sized + FromStr + Default {
    const EXPECTING: &'static str;

    fn from_i64(v: i64) -> Option<Self>;
    fn from_u64(v: u64) -> Option<Self>;
    fn from_f64(v: f64) -> Option<Self>;
}

impl Lenient for f64 {
    const EXPECTING: &'static str = "a number or a numeric string";

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn from_i64(v: i64) -> Option<Self> {
        Some(v as f64)
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn from_u64(v: u64) -> Option<Self> {
        Some(v as f64)
    }

    fn from_f64(v: f64) -> Option<Self> {
        Some(v)
    }
}

impl Lenient for i64 {
    const EXPECTING: &'static str = "an integer or an integer string";

    fn from_i64(v: i64) -> Option<Self> {
        Some(v)
    }

    fn from_u64(v: u64) -> Option<Self> {
        i64::try_from(v).ok()
    }

    fn from_f64(_: f64) -> Option<Self> {
        None
    }
}

struct LenientVisitor<T>(PhantomData<T>);

impl<'de, T: Lenient> Visitor<'de> for LenientVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(T::EXPECTING)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
        T::from_i64(v).ok_or_else(|| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
        T::from_u64(v).ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<T, E> {
        T::from_f64(v).ok_or_else(|| E::invalid_value(Unexpected::Float(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        v.trim()
            .parse()
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }

    // Firmware reports `null` for counters it has not sampled yet.
    fn visit_unit<E: de::Error>(self) -> Result<T, E> {
        Ok(T::default())
    }
}

/// Decode an `f64` from a JSON number or a numeric JSON string.
pub(crate) fn float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    deserializer.deserialize_any(LenientVisitor(PhantomData))
}

/// Decode an `i64` from a JSON integer or an integer JSON string.
pub(crate) fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    deserializer.deserialize_any(LenientVisitor(PhantomData))
}

/// Decode `T` strictly, treating JSON `null` as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

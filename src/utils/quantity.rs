//! Kubernetes-style storage quantities ("10Gi", "500Mi", "1G", "1.5Gi", "1e9")

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

const KI: u64 = 1 << 10;

/// Binary suffixes, largest first so formatting picks the widest exact unit.
const BINARY_SUFFIXES: [(&str, u64); 6] = [
    ("Ei", KI * KI * KI * KI * KI * KI),
    ("Pi", KI * KI * KI * KI * KI),
    ("Ti", KI * KI * KI * KI),
    ("Gi", KI * KI * KI),
    ("Mi", KI * KI),
    ("Ki", KI),
];

const DECIMAL_SUFFIXES: [(&str, u64); 6] = [
    ("E", 1_000_000_000_000_000_000),
    ("P", 1_000_000_000_000_000),
    ("T", 1_000_000_000_000),
    ("G", 1_000_000_000),
    ("M", 1_000_000),
    ("k", 1_000),
];

static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d+))?(?:[eE]([+-]?\d+)|([KMGTPE]i|[kMGTPE]))?$")
        .expect("quantity regex is valid")
});

/// A storage size in bytes.
///
/// Parses Kubernetes resource quantities, including fractional and exponent
/// forms, as long as they name a whole number of bytes ("1.5Gi" parses,
/// "1.5" does not). Always formats canonically, so two equal sizes render
/// identically no matter how they were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Quantity(u64);

impl Quantity {
    #[inline]
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn bytes(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for Quantity {
    fn from(bytes: u64) -> Self {
        Self(bytes)
    }
}

fn multiplier(suffix: &str) -> Option<u64> {
    BINARY_SUFFIXES
        .iter()
        .chain(DECIMAL_SUFFIXES.iter())
        .find(|(s, _)| *s == suffix)
        .map(|(_, m)| *m)
}

impl FromStr for Quantity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidQuantity(s.to_string());
        let caps = QUANTITY_RE.captures(s.trim()).ok_or_else(invalid)?;

        // The value is numerator / 10^scale, kept exact in u128.
        let fraction = caps.get(2).map_or("", |m| m.as_str());
        let mut numerator: u128 = format!("{}{fraction}", &caps[1])
            .parse()
            .map_err(|_| invalid())?;
        let mut scale = u32::try_from(fraction.len()).map_err(|_| invalid())?;

        if let Some(exponent) = caps.get(3) {
            let exponent: i32 = exponent.as_str().parse().map_err(|_| invalid())?;
            if exponent >= 0 {
                numerator = 10u128
                    .checked_pow(exponent.unsigned_abs())
                    .and_then(|pow| numerator.checked_mul(pow))
                    .ok_or_else(invalid)?;
            } else {
                scale = scale
                    .checked_add(exponent.unsigned_abs())
                    .ok_or_else(invalid)?;
            }
        }

        if let Some(suffix) = caps.get(4) {
            let mult = multiplier(suffix.as_str()).ok_or_else(invalid)?;
            numerator = numerator
                .checked_mul(u128::from(mult))
                .ok_or_else(invalid)?;
        }

        let denominator = 10u128.checked_pow(scale).ok_or_else(invalid)?;
        if numerator % denominator != 0 {
            return Err(invalid());
        }
        u64::try_from(numerator / denominator)
            .map(Self::from)
            .map_err(|_| invalid())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (suffix, mult) in BINARY_SUFFIXES {
            if self.0 >= mult && self.0 % mult == 0 {
                return write!(f, "{}{suffix}", self.0 / mult);
            }
        }
        write!(f, "{}", self.0)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct QuantityVisitor;

impl Visitor<'_> for QuantityVisitor {
    type Value = Quantity;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a quantity string such as \"10Gi\" or a non-negative byte count")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Quantity, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Quantity, E> {
        Ok(v.into())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Quantity, E> {
        u64::try_from(v)
            .map(Quantity)
            .map_err(|_| E::custom(format!("negative quantity: {v}")))
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(QuantityVisitor)
    }
}

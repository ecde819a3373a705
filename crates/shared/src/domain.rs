use std::{
    fmt,
    iter::Sum,
    ops::{Add, Mul},
};

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize,
};

use crate::error::ProductCodeError;

/// Whole yen. Serializes as an integer; decodes from any finite non-negative
/// JSON number, rounding half-up, since totals may be computed in floating point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Yen(pub u64);

impl<'de> Deserialize<'de> for Yen {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(YenVisitor)
    }
}

struct YenVisitor;

impl Visitor<'_> for YenVisitor {
    type Value = Yen;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a finite non-negative number of yen")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Yen, E> {
        Ok(Yen(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Yen, E> {
        u64::try_from(v)
            .map(Yen)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Yen, E> {
        // Above 2^64 the cast would saturate silently.
        if !v.is_finite() || v < 0.0 || v >= u64::MAX as f64 {
            return Err(E::invalid_value(de::Unexpected::Float(v), &self));
        }
        Ok(Yen((v + 0.5).floor() as u64))
    }
}

impl fmt::Display for Yen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}円", self.0)
    }
}

impl Add for Yen {
    type Output = Yen;

    fn add(self, rhs: Yen) -> Yen {
        Yen(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Yen {
    type Output = Yen;

    fn mul(self, rhs: u32) -> Yen {
        Yen(self.0.saturating_mul(u64::from(rhs)))
    }
}

impl Sum for Yen {
    fn sum<I: Iterator<Item = Yen>>(iter: I) -> Yen {
        iter.fold(Yen::default(), Add::add)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCode(String);

impl ProductCode {
    /// Trims scanner noise and rejects blank input.
    pub fn parse(raw: &str) -> Result<Self, ProductCodeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProductCodeError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub code: ProductCode,
    pub name: String,
    pub price: Yen,
    pub quantity: u32,
}

impl LineItem {
    pub fn single(code: ProductCode, name: impl Into<String>, price: Yen) -> Self {
        Self {
            code,
            name: name.into(),
            price,
            quantity: 1,
        }
    }

    pub fn subtotal(&self) -> Yen {
        self.price * self.quantity
    }
}

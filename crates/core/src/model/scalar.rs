use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Largest integer every JSON implementation represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Upper speed bound shared by both formats; in v1 it doubles as the drop sentinel.
pub const SPEED_LIMIT: f64 = 99999.0;

/// The two speed domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedRange {
    /// v1 chunk speed: `[0, 99999]`, endpoints are "drop" sentinels.
    Inclusive,
    /// v3 clip speed: `(0, 99999)`.
    Exclusive,
}

impl SpeedRange {
    pub fn contains(self, speed: f64) -> bool {
        match self {
            Self::Inclusive => (0.0..=SPEED_LIMIT).contains(&speed),
            Self::Exclusive => speed > 0.0 && speed < SPEED_LIMIT,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Inclusive => "[0, 99999]",
            Self::Exclusive => "(0, 99999)",
        }
    }
}

pub fn is_unit_float(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RationalError {
    #[error("decimal form is not allowed, write it as a fraction like \"30000/1001\"")]
    Decimal,
    #[error("expected exactly one '/' separating numerator and denominator")]
    Separator,
    #[error("{0} is empty")]
    Empty(&'static str),
    #[error("{0} must contain only ASCII digits")]
    NotDigits(&'static str),
    #[error("{0} does not fit in a 64-bit signed integer")]
    Overflow(&'static str),
    #[error("denominator is zero")]
    ZeroDenominator,
}

/// An exact fraction `num/den` as written in the document.
///
/// `==` compares the written form, so `60/2 != 30/1`; use
/// [`Rational::equivalent`] for numeric equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    num: i64,
    den: i64,
}

impl Rational {
    pub fn new(num: i64, den: i64) -> Result<Self, RationalError> {
        if num < 0 {
            return Err(RationalError::NotDigits("numerator"));
        }
        if den < 0 {
            return Err(RationalError::NotDigits("denominator"));
        }
        if den == 0 {
            return Err(RationalError::ZeroDenominator);
        }
        Ok(Self { num, den })
    }

    pub fn num(&self) -> i64 {
        self.num
    }

    pub fn den(&self) -> i64 {
        self.den
    }

    pub fn equivalent(&self, other: &Rational) -> bool {
        i128::from(self.num) * i128::from(other.den) == i128::from(other.num) * i128::from(self.den)
    }

    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

fn parse_part(part: &str, role: &'static str) -> Result<i64, RationalError> {
    if part.is_empty() {
        return Err(RationalError::Empty(role));
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RationalError::NotDigits(role));
    }
    part.parse::<i64>().map_err(|_| RationalError::Overflow(role))
}

impl FromStr for Rational {
    type Err = RationalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('.') {
            return Err(RationalError::Decimal);
        }
        let (num, den) = s.split_once('/').ok_or(RationalError::Separator)?;
        if den.contains('/') {
            return Err(RationalError::Separator);
        }
        let num = parse_part(num, "numerator")?;
        let den = parse_part(den, "denominator")?;
        Self::new(num, den)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl Serialize for Rational {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("color must start with '#'")]
    MissingHash,
    #[error("color must have 3 or 6 hex digits, found {0}")]
    Length(usize),
    #[error("'{0}' is not a hex digit")]
    NotHex(char),
}

/// A `#RGB` or `#RRGGBB` color, kept exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    pub fn black() -> Self {
        Self("#000".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').ok_or(ColorError::MissingHash)?;
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorError::NotHex(bad));
        }
        match digits.len() {
            3 | 6 => Ok(Self(s.to_string())),
            n => Err(ColorError::Length(n)),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

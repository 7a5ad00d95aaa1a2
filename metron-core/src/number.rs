//! Arbitrary precision decimal numbers using dashu
//!
//! Scaling factors and amounts are kept as base-10 floats so that literal
//! conversion constants (0.3048, 0.45359237, 273.15) stay exact and chained
//! conversions only round at the working precision.

use dashu_float::DBig;
use dashu_float::ops::Abs;
use dashu_int::IBig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Domain error: {0}")]
    DomainError(String),

    #[error("Overflow: result too large")]
    Overflow,
}

/// Working precision in significant decimal digits
pub const WORK_PRECISION: usize = 50;

/// Arbitrary precision decimal number
#[derive(Debug, Clone)]
pub struct Number {
    inner: DBig,
}

impl Number {
    fn with_work_precision(val: DBig) -> DBig {
        val.with_precision(WORK_PRECISION).value()
    }

    fn wrap(inner: DBig) -> Self {
        Self { inner }
    }

    /// Parse a decimal literal.
    ///
    /// Accepts plain decimals ("0.3048"), integer fractions ("5/9") and
    /// scientific notation ("6.02214076e23").
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();

        if let Some((num, den)) = s.split_once('/') {
            let num = Self::from_str(num)?;
            let den = Self::from_str(den)?;
            return num.checked_div(&den);
        }

        if let Some((mantissa, exp)) = s.split_once(['e', 'E']) {
            let mantissa = Self::from_str(mantissa)?;
            let exp: i32 = exp
                .trim()
                .parse()
                .map_err(|_| NumberError::ParseError(s.to_string()))?;
            let scale = DBig::from_parts(IBig::ONE, exp as isize);
            return Ok(mantissa.mul(&Self::wrap(Self::with_work_precision(scale))));
        }

        let inner: DBig = s
            .parse()
            .map_err(|_| NumberError::ParseError(s.to_string()))?;
        Ok(Self::wrap(Self::with_work_precision(inner)))
    }

    pub fn from_i64(n: i64) -> Self {
        Self::wrap(Self::with_work_precision(DBig::from(n)))
    }

    /// Exact ratio at working precision; a zero denominator is an error.
    pub fn from_ratio(num: i64, den: i64) -> Result<Self, NumberError> {
        Self::from_i64(num).checked_div(&Self::from_i64(den))
    }

    /// Create from f64 through its shortest round-trip decimal form
    pub fn from_f64(f: f64) -> Result<Self, NumberError> {
        if !f.is_finite() {
            return Err(NumberError::DomainError(format!("{} is not finite", f)));
        }
        Self::from_str(&format!("{:e}", f))
    }

    pub fn zero() -> Self {
        Self::from_i64(0)
    }

    pub fn one() -> Self {
        Self::from_i64(1)
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        self.inner == DBig::ZERO
    }

    pub fn is_one(&self) -> bool {
        self.inner == DBig::ONE
    }

    // ========== Arithmetic ==========

    pub fn add(&self, other: &Self) -> Self {
        Self::wrap(&self.inner + &other.inner)
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self::wrap(&self.inner - &other.inner)
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self::wrap(&self.inner * &other.inner)
    }

    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        Ok(Self::wrap(&self.inner / &other.inner))
    }

    /// Reciprocal, 1/x
    pub fn recip(&self) -> Result<Self, NumberError> {
        Self::one().checked_div(self)
    }

    pub fn neg(&self) -> Self {
        Self::wrap(-self.inner.clone())
    }

    /// Integer power by repeated squaring. Negative exponents divide, so a
    /// zero base with a negative exponent fails.
    pub fn pow(&self, exp: i32) -> Result<Self, NumberError> {
        let mut base = self.clone();
        let mut remaining = exp.unsigned_abs();
        let mut result = Self::one();

        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result.mul(&base);
            }
            base = base.mul(&base);
            remaining >>= 1;
        }

        if exp < 0 {
            result.recip()
        } else {
            Ok(result)
        }
    }

    pub fn abs(&self) -> Self {
        Self::wrap(Abs::abs(self.inner.clone()))
    }

    /// Relative comparison through f64, for tolerances in tests and callers.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        match (self.to_f64(), other.to_f64()) {
            (Some(a), Some(b)) => {
                let scale = a.abs().max(b.abs());
                a == b || (a - b).abs() <= tolerance * scale
            }
            _ => self == other,
        }
    }

    // ========== Conversion & Display ==========

    /// Convert to f64 (may lose precision). `None` when out of range.
    pub fn to_f64(&self) -> Option<f64> {
        let f: f64 = self.inner.to_string().parse().ok()?;
        f.is_finite().then_some(f)
    }

    /// Render with N significant figures, trailing zeros removed
    pub fn as_sigfigs(&self, sigfigs: u32) -> String {
        let Some(f) = self.to_f64() else {
            return self.inner.to_string();
        };
        if f == 0.0 {
            return "0".to_string();
        }

        let sigfigs = sigfigs.max(1) as i32;
        let exp = f.abs().log10().floor() as i32;

        if (-5..=15).contains(&exp) {
            let places = (sigfigs - exp - 1).max(0) as usize;
            trim_fraction(format!("{:.prec$}", f, prec = places))
        } else {
            let mantissa = f / 10_f64.powi(exp);
            let places = (sigfigs - 1) as usize;
            format!("{}e{}", trim_fraction(format!("{:.prec$}", mantissa, prec = places)), exp)
        }
    }
}

fn trim_fraction(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_sigfigs(15))
    }
}

impl Default for Number {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::from_i64(n)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.inner.to_string())
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.partial_cmp(&other.inner).unwrap_or(Ordering::Equal)
    }
}

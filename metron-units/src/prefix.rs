//! Decimal (SI) and binary (IEC) unit prefixes

use metron_core::Number;
use serde::{Deserialize, Serialize};

/// A multiplier that can be applied to a unit to derive a scaled unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prefix {
    Yotta,
    Zetta,
    Exa,
    Peta,
    Tera,
    Giga,
    Mega,
    Kilo,
    Hecto,
    Deka,
    Deci,
    Centi,
    Milli,
    Micro,
    Nano,
    Pico,
    Femto,
    Atto,
    Zepto,
    Yocto,
    Kibi,
    Mebi,
    Gibi,
    Tebi,
    Pebi,
    Exbi,
}

impl Prefix {
    pub const ALL: [Prefix; 26] = [
        Prefix::Yotta,
        Prefix::Zetta,
        Prefix::Exa,
        Prefix::Peta,
        Prefix::Tera,
        Prefix::Giga,
        Prefix::Mega,
        Prefix::Kilo,
        Prefix::Hecto,
        Prefix::Deka,
        Prefix::Deci,
        Prefix::Centi,
        Prefix::Milli,
        Prefix::Micro,
        Prefix::Nano,
        Prefix::Pico,
        Prefix::Femto,
        Prefix::Atto,
        Prefix::Zepto,
        Prefix::Yocto,
        Prefix::Kibi,
        Prefix::Mebi,
        Prefix::Gibi,
        Prefix::Tebi,
        Prefix::Pebi,
        Prefix::Exbi,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Prefix::Yotta => "yotta",
            Prefix::Zetta => "zetta",
            Prefix::Exa => "exa",
            Prefix::Peta => "peta",
            Prefix::Tera => "tera",
            Prefix::Giga => "giga",
            Prefix::Mega => "mega",
            Prefix::Kilo => "kilo",
            Prefix::Hecto => "hecto",
            Prefix::Deka => "deka",
            Prefix::Deci => "deci",
            Prefix::Centi => "centi",
            Prefix::Milli => "milli",
            Prefix::Micro => "micro",
            Prefix::Nano => "nano",
            Prefix::Pico => "pico",
            Prefix::Femto => "femto",
            Prefix::Atto => "atto",
            Prefix::Zepto => "zepto",
            Prefix::Yocto => "yocto",
            Prefix::Kibi => "kibi",
            Prefix::Mebi => "mebi",
            Prefix::Gibi => "gibi",
            Prefix::Tebi => "tebi",
            Prefix::Pebi => "pebi",
            Prefix::Exbi => "exbi",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Prefix::Yotta => "Y",
            Prefix::Zetta => "Z",
            Prefix::Exa => "E",
            Prefix::Peta => "P",
            Prefix::Tera => "T",
            Prefix::Giga => "G",
            Prefix::Mega => "M",
            Prefix::Kilo => "k",
            Prefix::Hecto => "h",
            Prefix::Deka => "da",
            Prefix::Deci => "d",
            Prefix::Centi => "c",
            Prefix::Milli => "m",
            Prefix::Micro => "µ",
            Prefix::Nano => "n",
            Prefix::Pico => "p",
            Prefix::Femto => "f",
            Prefix::Atto => "a",
            Prefix::Zepto => "z",
            Prefix::Yocto => "y",
            Prefix::Kibi => "Ki",
            Prefix::Mebi => "Mi",
            Prefix::Gibi => "Gi",
            Prefix::Tebi => "Ti",
            Prefix::Pebi => "Pi",
            Prefix::Exbi => "Ei",
        }
    }

    /// Power of ten for decimal prefixes, `None` for binary ones
    fn decimal_exponent(&self) -> Option<i32> {
        let exp = match self {
            Prefix::Yotta => 24,
            Prefix::Zetta => 21,
            Prefix::Exa => 18,
            Prefix::Peta => 15,
            Prefix::Tera => 12,
            Prefix::Giga => 9,
            Prefix::Mega => 6,
            Prefix::Kilo => 3,
            Prefix::Hecto => 2,
            Prefix::Deka => 1,
            Prefix::Deci => -1,
            Prefix::Centi => -2,
            Prefix::Milli => -3,
            Prefix::Micro => -6,
            Prefix::Nano => -9,
            Prefix::Pico => -12,
            Prefix::Femto => -15,
            Prefix::Atto => -18,
            Prefix::Zepto => -21,
            Prefix::Yocto => -24,
            _ => return None,
        };
        Some(exp)
    }

    /// Power of 1024 for binary prefixes
    fn binary_exponent(&self) -> i32 {
        match self {
            Prefix::Kibi => 1,
            Prefix::Mebi => 2,
            Prefix::Gibi => 3,
            Prefix::Tebi => 4,
            Prefix::Pebi => 5,
            Prefix::Exbi => 6,
            _ => 0,
        }
    }

    /// The exact multiplier this prefix stands for
    pub fn factor(&self) -> Number {
        let (base, exp) = match self.decimal_exponent() {
            Some(exp) => (Number::from_i64(10), exp),
            None => (Number::from_i64(1024), self.binary_exponent()),
        };
        // the base is never zero, so a negative exponent cannot divide by zero
        base.pow(exp).unwrap_or_else(|_| Number::one())
    }

    pub fn from_symbol(symbol: &str) -> Option<Prefix> {
        Self::ALL.iter().copied().find(|p| p.symbol() == symbol)
    }

    pub fn from_name(name: &str) -> Option<Prefix> {
        let name = name.to_lowercase();
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_factors() {
        assert_eq!(Prefix::Kilo.factor(), Number::from_i64(1000));
        assert_eq!(Prefix::Milli.factor(), Number::from_str("0.001").unwrap());
        assert_eq!(Prefix::Yocto.factor(), Number::from_str("1e-24").unwrap());
    }

    #[test]
    fn test_binary_factors() {
        assert_eq!(Prefix::Kibi.factor(), Number::from_i64(1024));
        assert_eq!(Prefix::Gibi.factor(), Number::from_i64(1_073_741_824));
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Prefix::from_symbol("k"), Some(Prefix::Kilo));
        assert_eq!(Prefix::from_symbol("Ki"), Some(Prefix::Kibi));
        assert_eq!(Prefix::from_name("Mega"), Some(Prefix::Mega));
        assert_eq!(Prefix::from_symbol("q"), None);
    }
}

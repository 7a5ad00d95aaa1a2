//! Quantity type - an amount with an associated unit of measure

use crate::error::Result;
use crate::prefix::Prefix;
use crate::system::MeasurementSystem;
use crate::UnitOfMeasure;
use metron_core::Number;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// An amount of some unit of measure. Every operation returns a new value.
#[derive(Clone)]
pub struct Quantity {
    amount: Number,
    unit: Arc<UnitOfMeasure>,
}

impl Quantity {
    /// Create a new quantity
    pub fn new(amount: Number, unit: &Arc<UnitOfMeasure>) -> Self {
        Quantity {
            amount,
            unit: unit.clone(),
        }
    }

    pub fn amount(&self) -> &Number {
        &self.amount
    }

    pub fn unit(&self) -> &Arc<UnitOfMeasure> {
        &self.unit
    }

    /// Express this quantity in another unit, applying both units' offsets
    pub fn convert(&self, target: &Arc<UnitOfMeasure>) -> Result<Quantity> {
        if self.unit.id() == target.id() {
            return Ok(self.clone());
        }

        let factor = self.unit.conversion_factor(target)?;
        let amount = self
            .amount
            .add(&self.unit.offset())
            .mul(&factor)
            .sub(&target.offset());
        Ok(Quantity::new(amount, target))
    }

    /// Convert to this unit scaled by a prefix, e.g. metres to kilometres
    pub fn convert_to_prefix(&self, prefix: Prefix, sys: &MeasurementSystem) -> Result<Quantity> {
        let target = sys.prefixed_uom(prefix, &self.unit)?;
        self.convert(&target)
    }

    /// Add two quantities, in the unit of `self`
    pub fn add(&self, other: &Quantity) -> Result<Quantity> {
        let converted = other.convert(&self.unit)?;
        Ok(Quantity::new(self.amount.add(&converted.amount), &self.unit))
    }

    /// Subtract two quantities, in the unit of `self`
    pub fn subtract(&self, other: &Quantity) -> Result<Quantity> {
        let converted = other.convert(&self.unit)?;
        Ok(Quantity::new(self.amount.sub(&converted.amount), &self.unit))
    }

    /// Multiply two quantities (units are multiplied)
    pub fn multiply(&self, other: &Quantity, sys: &MeasurementSystem) -> Result<Quantity> {
        let unit = sys.multiply(&self.unit, &other.unit)?;
        Ok(Quantity::new(self.amount.mul(&other.amount), &unit))
    }

    /// Divide two quantities (units are divided)
    pub fn divide(&self, other: &Quantity, sys: &MeasurementSystem) -> Result<Quantity> {
        let amount = self.amount.checked_div(&other.amount)?;
        let unit = sys.divide(&self.unit, &other.unit)?;
        Ok(Quantity::new(amount, &unit))
    }

    /// Raise quantity to an integer power
    pub fn power(&self, exponent: i32, sys: &MeasurementSystem) -> Result<Quantity> {
        let amount = self.amount.pow(exponent)?;
        let unit = sys.power(&self.unit, exponent)?;
        Ok(Quantity::new(amount, &unit))
    }

    /// Reciprocal amount in the inverted unit
    pub fn invert(&self, sys: &MeasurementSystem) -> Result<Quantity> {
        let amount = self.amount.recip()?;
        let unit = sys.invert(&self.unit)?;
        Ok(Quantity::new(amount, &unit))
    }

    pub fn multiply_by(&self, factor: &Number) -> Quantity {
        Quantity::new(self.amount.mul(factor), &self.unit)
    }

    pub fn divide_by(&self, divisor: &Number) -> Result<Quantity> {
        Ok(Quantity::new(self.amount.checked_div(divisor)?, &self.unit))
    }

    /// Order two quantities after converting `other` to the unit of `self`
    pub fn compare(&self, other: &Quantity) -> Result<Ordering> {
        let converted = other.convert(&self.unit)?;
        Ok(self.amount.cmp(&converted.amount))
    }

    /// Equal within the system's relative tolerance after conversion.
    /// Quantities that cannot be converted are not equal.
    pub fn approx_eq(&self, other: &Quantity, sys: &MeasurementSystem) -> bool {
        other
            .convert(&self.unit)
            .map(|converted| self.amount.approx_eq(&converted.amount, sys.config().tolerance))
            .unwrap_or(false)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.unit.symbol())
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantity")
            .field("amount", &self.amount.to_string())
            .field("unit", &self.unit.symbol())
            .finish()
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.amount == other.amount && *self.unit == *other.unit
    }
}

#[derive(Serialize)]
struct QuantityRecord<'a> {
    amount: &'a Number,
    unit: &'a str,
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        QuantityRecord {
            amount: &self.amount,
            unit: self.unit.symbol(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Unit, UnitType, UomError};

    fn num(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    fn qty(sys: &MeasurementSystem, amount: &str, unit: Unit) -> Quantity {
        Quantity::new(num(amount), &sys.uom(unit).unwrap())
    }

    #[test]
    fn test_feet_to_metres() {
        let sys = MeasurementSystem::new();
        let q = qty(&sys, "10", Unit::Foot).convert(&sys.uom(Unit::Metre).unwrap()).unwrap();
        assert_eq!(*q.amount(), num("3.048"));
        assert_eq!(q.unit().symbol(), "m");
    }

    #[test]
    fn test_fahrenheit_to_celsius() {
        let sys = MeasurementSystem::new();
        let celsius = sys.uom(Unit::Celsius).unwrap();
        let q = qty(&sys, "212", Unit::Fahrenheit).convert(&celsius).unwrap();
        assert!(q.amount().approx_eq(&num("100"), 1e-12));

        let freezing = qty(&sys, "32", Unit::Fahrenheit).convert(&celsius).unwrap();
        assert!(freezing.amount().abs().to_f64().unwrap() < 1e-12);
    }

    #[test]
    fn test_celsius_to_kelvin() {
        let sys = MeasurementSystem::new();
        let q = qty(&sys, "25", Unit::Celsius).convert(&sys.uom(Unit::Kelvin).unwrap()).unwrap();
        assert_eq!(*q.amount(), num("298.15"));
    }

    #[test]
    fn test_torque() {
        let sys = MeasurementSystem::new();
        let q = qty(&sys, "1", Unit::NewtonMetre)
            .convert(&sys.uom(Unit::FootPoundForce).unwrap())
            .unwrap();
        assert!(q.amount().approx_eq(&num("0.7375621492772656"), 1e-12));
    }

    #[test]
    fn test_hectare_to_acre() {
        let sys = MeasurementSystem::new();
        let q = qty(&sys, "1", Unit::Hectare).convert(&sys.uom(Unit::Acre).unwrap()).unwrap();
        assert!(q.amount().approx_eq(&num("2.47105"), 1e-5));
    }

    #[test]
    fn test_incompatible_conversion() {
        let sys = MeasurementSystem::new();
        let err = qty(&sys, "1", Unit::Metre)
            .convert(&sys.uom(Unit::Kilogram).unwrap())
            .unwrap_err();
        assert!(matches!(err, UomError::IncompatibleDimensions { .. }));
    }

    #[test]
    fn test_convert_to_prefix() {
        let sys = MeasurementSystem::new();
        let q = qty(&sys, "2500", Unit::Metre).convert_to_prefix(Prefix::Kilo, &sys).unwrap();
        assert_eq!(*q.amount(), num("2.5"));
        assert_eq!(q.unit().symbol(), "km");
    }

    #[test]
    fn test_add_and_subtract() {
        let sys = MeasurementSystem::new();
        let km = sys.prefixed_uom(Prefix::Kilo, &sys.uom(Unit::Metre).unwrap()).unwrap();
        let a = Quantity::new(num("1"), &km);
        let b = qty(&sys, "500", Unit::Metre);

        let sum = a.add(&b).unwrap();
        assert_eq!(*sum.amount(), num("1.5"));
        assert_eq!(sum.unit().symbol(), "km");

        let diff = a.subtract(&b).unwrap();
        assert_eq!(*diff.amount(), num("0.5"));
    }

    #[test]
    fn test_add_incompatible() {
        let sys = MeasurementSystem::new();
        let a = qty(&sys, "1", Unit::Metre);
        let b = qty(&sys, "1", Unit::Second);
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn test_multiply_and_divide() {
        let sys = MeasurementSystem::new();
        let length = qty(&sys, "5", Unit::Metre);
        let width = qty(&sys, "3", Unit::Metre);
        let area = length.multiply(&width, &sys).unwrap();
        assert_eq!(*area.amount(), Number::from_i64(15));
        assert_eq!(area.unit().base_symbol().unwrap(), "m²");

        let time = qty(&sys, "10", Unit::Second);
        let distance = qty(&sys, "100", Unit::Metre);
        let velocity = distance.divide(&time, &sys).unwrap();
        assert_eq!(*velocity.amount(), Number::from_i64(10));
        assert_eq!(velocity.unit().base_symbol().unwrap(), "m/s");
    }

    #[test]
    fn test_force_from_mass_and_acceleration() {
        let sys = MeasurementSystem::new();
        let newton = sys.uom(Unit::Newton).unwrap();
        let mass = qty(&sys, "2", Unit::Gram);
        let accel = qty(&sys, "500", Unit::MetrePerSecondSquared);

        let force = mass.multiply(&accel, &sys).unwrap();
        assert_eq!(force.unit().unit_type(), UnitType::Force);
        assert_eq!(*force.convert(&newton).unwrap().amount(), Number::one());
    }

    #[test]
    fn test_divide_by_zero() {
        let sys = MeasurementSystem::new();
        let a = qty(&sys, "1", Unit::Metre);
        let zero = qty(&sys, "0", Unit::Second);
        assert!(a.divide(&zero, &sys).is_err());
        assert!(a.divide_by(&Number::zero()).is_err());
    }

    #[test]
    fn test_power() {
        let sys = MeasurementSystem::new();
        let side = qty(&sys, "5", Unit::Metre);
        let volume = side.power(3, &sys).unwrap();
        assert_eq!(*volume.amount(), Number::from_i64(125));
        assert_eq!(volume.unit().symbol(), "m³");
    }

    #[test]
    fn test_invert() {
        let sys = MeasurementSystem::new();
        let period = qty(&sys, "4", Unit::Second);
        let frequency = period.invert(&sys).unwrap();
        assert_eq!(*frequency.amount(), num("0.25"));
        assert_eq!(frequency.unit().base_symbol().unwrap(), "1/s");
        let hz = frequency.convert(&sys.uom(Unit::Hertz).unwrap()).unwrap();
        assert_eq!(*hz.amount(), num("0.25"));
    }

    #[test]
    fn test_scalar_operations() {
        let sys = MeasurementSystem::new();
        let q = qty(&sys, "3", Unit::Foot);
        assert_eq!(*q.multiply_by(&Number::from_i64(4)).amount(), Number::from_i64(12));
        assert_eq!(*q.divide_by(&Number::from_i64(2)).unwrap().amount(), num("1.5"));
    }

    #[test]
    fn test_compare() {
        let sys = MeasurementSystem::new();
        let mile = qty(&sys, "1", Unit::Mile);
        let km = sys.prefixed_uom(Prefix::Kilo, &sys.uom(Unit::Metre).unwrap()).unwrap();
        let two_km = Quantity::new(num("2"), &km);
        assert_eq!(mile.compare(&two_km).unwrap(), Ordering::Less);
        assert_eq!(two_km.compare(&mile).unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_approx_eq() {
        let sys = MeasurementSystem::new();
        let inches = qty(&sys, "12", Unit::Inch);
        let foot = qty(&sys, "1", Unit::Foot);
        assert!(inches.approx_eq(&foot, &sys));
        assert!(!inches.approx_eq(&qty(&sys, "1", Unit::Second), &sys));
    }

    #[test]
    fn test_equality() {
        let sys = MeasurementSystem::new();
        assert_eq!(qty(&sys, "1", Unit::Metre), qty(&sys, "1.0", Unit::Metre));
        assert_ne!(qty(&sys, "1", Unit::Metre), qty(&sys, "100", Unit::Metre));
    }

    #[test]
    fn test_display_and_serialize() {
        let sys = MeasurementSystem::new();
        let q = qty(&sys, "9.81", Unit::MetrePerSecondSquared);
        assert_eq!(q.to_string(), "9.81 m/s²");

        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["unit"], "m/s²");
        assert_eq!(json["amount"].as_str().map(|s| num(s)), Some(num("9.81")));
    }
}

//! Built-in catalog of well-known units
//!
//! Canonical units are materialized on first request through the same
//! factories clients use. Dependencies are requested recursively, so
//! asking for `psi` also builds `lbf`, `in²` and everything below them.

use crate::error::Result;
use crate::system::{build, MeasurementSystem};
use crate::uom::Composition;
use crate::{UnitOfMeasure, UnitType};
use metron_core::Number;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identifier of a well-known unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    // Unity
    One,
    Percent,

    // SI
    Metre,
    Kilogram,
    Gram,
    Second,
    Minute,
    Hour,
    Day,
    Ampere,
    Kelvin,
    Celsius,
    Mole,
    Candela,
    Radian,
    Steradian,
    SquareMetre,
    CubicMetre,
    Litre,
    Hectare,
    MetrePerSecond,
    SecondSquared,
    MetrePerSecondSquared,
    Newton,
    NewtonMetre,
    Joule,
    Watt,
    Pascal,
    Hertz,
    Coulomb,
    Volt,
    Ohm,
    Lumen,
    JouleSecond,
    JoulePerKelvin,
    PerMole,
    CoulombPerMole,
    KilogramPerCubicMetre,
    WattPerSquareMetreQuarticKelvin,

    // US customary
    Inch,
    Foot,
    Yard,
    Mile,
    PoundMass,
    Ounce,
    Rankine,
    Fahrenheit,
    FootPerSecondSquared,
    PoundForce,
    FootPoundForce,
    SquareFoot,
    SquareInch,
    CubicInch,
    Acre,
    Gallon,
    Psi,
    MilePerHour,

    // Financial
    UsDollar,
    Euro,

    // Computer science
    Bit,
    Byte,
}

/// Display metadata of a catalog unit
struct Info {
    unit_type: UnitType,
    name: &'static str,
    symbol: &'static str,
    description: &'static str,
}

const fn info(
    unit_type: UnitType,
    name: &'static str,
    symbol: &'static str,
    description: &'static str,
) -> Info {
    Info {
        unit_type,
        name,
        symbol,
        description,
    }
}

impl Unit {
    pub const ALL: [Unit; 61] = [
        Unit::One,
        Unit::Percent,
        Unit::Metre,
        Unit::Kilogram,
        Unit::Gram,
        Unit::Second,
        Unit::Minute,
        Unit::Hour,
        Unit::Day,
        Unit::Ampere,
        Unit::Kelvin,
        Unit::Celsius,
        Unit::Mole,
        Unit::Candela,
        Unit::Radian,
        Unit::Steradian,
        Unit::SquareMetre,
        Unit::CubicMetre,
        Unit::Litre,
        Unit::Hectare,
        Unit::MetrePerSecond,
        Unit::SecondSquared,
        Unit::MetrePerSecondSquared,
        Unit::Newton,
        Unit::NewtonMetre,
        Unit::Joule,
        Unit::Watt,
        Unit::Pascal,
        Unit::Hertz,
        Unit::Coulomb,
        Unit::Volt,
        Unit::Ohm,
        Unit::Lumen,
        Unit::JouleSecond,
        Unit::JoulePerKelvin,
        Unit::PerMole,
        Unit::CoulombPerMole,
        Unit::KilogramPerCubicMetre,
        Unit::WattPerSquareMetreQuarticKelvin,
        Unit::Inch,
        Unit::Foot,
        Unit::Yard,
        Unit::Mile,
        Unit::PoundMass,
        Unit::Ounce,
        Unit::Rankine,
        Unit::Fahrenheit,
        Unit::FootPerSecondSquared,
        Unit::PoundForce,
        Unit::FootPoundForce,
        Unit::SquareFoot,
        Unit::SquareInch,
        Unit::CubicInch,
        Unit::Acre,
        Unit::Gallon,
        Unit::Psi,
        Unit::MilePerHour,
        Unit::UsDollar,
        Unit::Euro,
        Unit::Bit,
        Unit::Byte,
    ];

    pub fn symbol(&self) -> &'static str {
        self.info().symbol
    }

    pub fn unit_type(&self) -> UnitType {
        self.info().unit_type
    }

    fn info(&self) -> Info {
        use UnitType as T;
        match self {
            Unit::One => info(T::Unity, "one", "1", "unity"),
            Unit::Percent => info(T::Unity, "percent", "%", "one hundredth of one"),

            Unit::Metre => info(T::Length, "metre", "m", "SI base unit of length"),
            Unit::Kilogram => info(T::Mass, "kilogram", "kg", "SI base unit of mass"),
            Unit::Gram => info(T::Mass, "gram", "g", "one thousandth of a kilogram"),
            Unit::Second => info(T::Time, "second", "s", "SI base unit of time"),
            Unit::Minute => info(T::Time, "minute", "min", "60 seconds"),
            Unit::Hour => info(T::Time, "hour", "h", "60 minutes"),
            Unit::Day => info(T::Time, "day", "d", "24 hours"),
            Unit::Ampere => info(T::ElectricCurrent, "ampere", "A", "SI base unit of electric current"),
            Unit::Kelvin => info(T::Temperature, "kelvin", "K", "SI base unit of temperature"),
            Unit::Celsius => info(T::Temperature, "celsius", "°C", "kelvin offset by 273.15"),
            Unit::Mole => info(T::SubstanceAmount, "mole", "mol", "SI base unit of amount of substance"),
            Unit::Candela => info(T::LuminousIntensity, "candela", "cd", "SI base unit of luminous intensity"),
            Unit::Radian => info(T::PlaneAngle, "radian", "rad", "plane angle"),
            Unit::Steradian => info(T::SolidAngle, "steradian", "sr", "solid angle"),
            Unit::SquareMetre => info(T::Area, "square metre", "m²", "SI unit of area"),
            Unit::CubicMetre => info(T::Volume, "cubic metre", "m³", "SI unit of volume"),
            Unit::Litre => info(T::Volume, "litre", "L", "one thousandth of a cubic metre"),
            Unit::Hectare => info(T::Area, "hectare", "ha", "10000 square metres"),
            Unit::MetrePerSecond => info(T::Velocity, "metre per second", "m/s", "SI unit of velocity"),
            Unit::SecondSquared => info(T::Unclassified, "second squared", "s²", "square of a second"),
            Unit::MetrePerSecondSquared => {
                info(T::Acceleration, "metre per second squared", "m/s²", "SI unit of acceleration")
            }
            Unit::Newton => info(T::Force, "newton", "N", "force accelerating 1 kg at 1 m/s²"),
            Unit::NewtonMetre => info(T::Energy, "newton metre", "N·m", "newton times metre"),
            Unit::Joule => info(T::Energy, "joule", "J", "SI unit of energy"),
            Unit::Watt => info(T::Power, "watt", "W", "one joule per second"),
            Unit::Pascal => info(T::Pressure, "pascal", "Pa", "one newton per square metre"),
            Unit::Hertz => info(T::Frequency, "hertz", "Hz", "one cycle per second"),
            Unit::Coulomb => info(T::ElectricCharge, "coulomb", "C", "one ampere second"),
            Unit::Volt => info(T::ElectromotiveForce, "volt", "V", "one watt per ampere"),
            Unit::Ohm => info(T::ElectricResistance, "ohm", "Ω", "one volt per ampere"),
            Unit::Lumen => info(T::LuminousFlux, "lumen", "lm", "one candela steradian"),
            Unit::JouleSecond => info(T::Action, "joule second", "J·s", "unit of action"),
            Unit::JoulePerKelvin => info(T::Entropy, "joule per kelvin", "J/K", "unit of entropy"),
            Unit::PerMole => info(T::ReciprocalAmount, "per mole", "1/mol", "reciprocal amount of substance"),
            Unit::CoulombPerMole => info(T::MolarCharge, "coulomb per mole", "C/mol", "unit of molar charge"),
            Unit::KilogramPerCubicMetre => {
                info(T::Density, "kilogram per cubic metre", "kg/m³", "SI unit of density")
            }
            Unit::WattPerSquareMetreQuarticKelvin => info(
                T::RadiantExitanceCoefficient,
                "watt per square metre quartic kelvin",
                "W/(m²·K^4)",
                "unit of the Stefan-Boltzmann constant",
            ),

            Unit::Inch => info(T::Length, "inch", "in", "exactly 2.54 centimetres"),
            Unit::Foot => info(T::Length, "foot", "ft", "12 inches"),
            Unit::Yard => info(T::Length, "yard", "yd", "3 feet"),
            Unit::Mile => info(T::Length, "mile", "mi", "5280 feet"),
            Unit::PoundMass => info(T::Mass, "pound mass", "lbm", "exactly 0.45359237 kilograms"),
            Unit::Ounce => info(T::Mass, "ounce", "oz", "one sixteenth of a pound"),
            Unit::Rankine => info(T::Temperature, "rankine", "°R", "absolute scale with Fahrenheit degrees"),
            Unit::Fahrenheit => info(T::Temperature, "fahrenheit", "°F", "rankine offset by 459.67"),
            Unit::FootPerSecondSquared => {
                info(T::Acceleration, "foot per second squared", "ft/s²", "US unit of acceleration")
            }
            Unit::PoundForce => info(T::Force, "pound force", "lbf", "weight of one pound mass in standard gravity"),
            Unit::FootPoundForce => info(T::Energy, "foot pound force", "ft·lbf", "US unit of work"),
            Unit::SquareFoot => info(T::Area, "square foot", "ft²", "US unit of area"),
            Unit::SquareInch => info(T::Area, "square inch", "in²", "US unit of area"),
            Unit::CubicInch => info(T::Volume, "cubic inch", "in³", "US unit of volume"),
            Unit::Acre => info(T::Area, "acre", "ac", "43560 square feet"),
            Unit::Gallon => info(T::Volume, "gallon", "gal", "231 cubic inches"),
            Unit::Psi => info(T::Pressure, "pound per square inch", "psi", "pound force per square inch"),
            Unit::MilePerHour => info(T::Velocity, "mile per hour", "mph", "US unit of velocity"),

            Unit::UsDollar => info(T::Currency, "US dollar", "US$", "United States dollar"),
            Unit::Euro => info(T::Currency, "euro", "€", "euro"),

            Unit::Bit => info(T::ComputerScience, "bit", "bit", "binary digit"),
            Unit::Byte => info(T::ComputerScience, "byte", "B", "8 bits"),
        }
    }
}

impl MeasurementSystem {
    /// A canonical unit, built on first request
    pub fn uom(&self, unit: Unit) -> Result<Arc<UnitOfMeasure>> {
        match self.find_by_unit(unit) {
            Some(uom) => Ok(uom),
            None => self.materialize(unit),
        }
    }

    /// The dimensionless unit `1`
    pub fn one(&self) -> Result<Arc<UnitOfMeasure>> {
        self.uom(Unit::One)
    }

    fn materialize(&self, unit: Unit) -> Result<Arc<UnitOfMeasure>> {
        use Unit::*;
        match unit {
            One | Metre | Kilogram | Second | Ampere | Kelvin | Mole | Candela | Radian
            | Steradian | UsDollar | Euro | Bit => self.install(self.entry(unit, Composition::Scalar)),

            Percent => self.scaled(unit, "0.01", One),
            Gram => self.scaled(unit, "0.001", Kilogram),
            Minute => self.scaled(unit, "60", Second),
            Hour => self.scaled(unit, "60", Minute),
            Day => self.scaled(unit, "24", Hour),
            Celsius => self.shifted(unit, "273.15", Kelvin),
            SquareMetre => self.powered(unit, Metre, 2),
            CubicMetre => self.powered(unit, Metre, 3),
            Litre => self.scaled(unit, "0.001", CubicMetre),
            Hectare => self.scaled(unit, "10000", SquareMetre),
            MetrePerSecond => self.quotient(unit, Metre, Second),
            SecondSquared => self.powered(unit, Second, 2),
            MetrePerSecondSquared => self.quotient(unit, Metre, SecondSquared),
            Newton => self.defined(unit, "1", Kilogram, MetrePerSecondSquared, false),
            NewtonMetre => self.product(unit, Newton, Metre),
            Joule => self.scaled(unit, "1", NewtonMetre),
            Watt => self.defined(unit, "1", Joule, Second, true),
            Pascal => self.defined(unit, "1", Newton, SquareMetre, true),
            Hertz => self.defined(unit, "1", One, Second, true),
            Coulomb => self.defined(unit, "1", Ampere, Second, false),
            Volt => self.defined(unit, "1", Watt, Ampere, true),
            Ohm => self.defined(unit, "1", Volt, Ampere, true),
            Lumen => self.defined(unit, "1", Candela, Steradian, false),
            JouleSecond => self.product(unit, Joule, Second),
            JoulePerKelvin => self.quotient(unit, Joule, Kelvin),
            PerMole => self.quotient(unit, One, Mole),
            CoulombPerMole => self.quotient(unit, Coulomb, Mole),
            KilogramPerCubicMetre => self.quotient(unit, Kilogram, CubicMetre),
            WattPerSquareMetreQuarticKelvin => {
                let kelvin = self.uom(Kelvin)?;
                let k4 = self.power(&kelvin, 4)?;
                let m2k4 = self.multiply(&self.uom(SquareMetre)?, &k4)?;
                let composition = Composition::Quotient {
                    dividend: self.uom(Watt)?,
                    divisor: m2k4,
                };
                self.install(self.entry(unit, composition))
            }

            Inch => self.bridged(unit, "0.0254", Metre),
            Foot => self.scaled(unit, "12", Inch),
            Yard => self.scaled(unit, "3", Foot),
            Mile => self.scaled(unit, "5280", Foot),
            PoundMass => self.bridged(unit, "0.45359237", Kilogram),
            Ounce => self.scaled(unit, "0.0625", PoundMass),
            Rankine => self.bridged(unit, "5/9", Kelvin),
            Fahrenheit => self.shifted(unit, "459.67", Rankine),
            FootPerSecondSquared => self.quotient(unit, Foot, SecondSquared),
            PoundForce => self.defined(unit, "9.80665/0.3048", PoundMass, FootPerSecondSquared, false),
            FootPoundForce => self.product(unit, Foot, PoundForce),
            SquareFoot => self.powered(unit, Foot, 2),
            SquareInch => self.powered(unit, Inch, 2),
            CubicInch => self.powered(unit, Inch, 3),
            Acre => self.scaled(unit, "43560", SquareFoot),
            Gallon => self.scaled(unit, "231", CubicInch),
            Psi => self.defined(unit, "1", PoundForce, SquareInch, true),
            MilePerHour => self.defined(unit, "1", Mile, Hour, true),

            Byte => self.scaled(unit, "8", Bit),
        }
    }

    /// Unpublished catalog unit carrying its metadata
    fn entry(&self, unit: Unit, composition: Composition) -> Arc<UnitOfMeasure> {
        let info = unit.info();
        let uom = build(info.unit_type, Some(unit), info.name, info.symbol, info.description, composition);
        uom.set_category(info.unit_type.name());
        uom
    }

    fn install(&self, uom: Arc<UnitOfMeasure>) -> Result<Arc<UnitOfMeasure>> {
        Ok(self.publish(uom)?.0)
    }

    /// `unit = factor · target`
    fn scaled(&self, unit: Unit, factor: &str, target: Unit) -> Result<Arc<UnitOfMeasure>> {
        let abscissa = self.uom(target)?;
        self.linear(unit, Number::from_str(factor)?, &abscissa, Number::zero())
    }

    /// `unit = target - offset`, e.g. `K = °C + 273.15`
    fn shifted(&self, unit: Unit, offset: &str, target: Unit) -> Result<Arc<UnitOfMeasure>> {
        let abscissa = self.uom(target)?;
        self.linear(unit, Number::one(), &abscissa, Number::from_str(offset)?)
    }

    fn linear(
        &self,
        unit: Unit,
        factor: Number,
        abscissa: &Arc<UnitOfMeasure>,
        offset: Number,
    ) -> Result<Arc<UnitOfMeasure>> {
        let uom = self.entry(unit, Composition::Scalar);
        uom.apply_conversion(factor, abscissa, offset)?;
        self.install(uom)
    }

    /// Terminal unit of another measurement system, bridged to `target`
    fn bridged(&self, unit: Unit, factor: &str, target: Unit) -> Result<Arc<UnitOfMeasure>> {
        let abscissa = self.uom(target)?;
        let uom = self.entry(unit, Composition::Scalar);
        uom.set_bridge_conversion(Number::from_str(factor)?, &abscissa, Number::zero());
        self.install(uom)
    }

    fn powered(&self, unit: Unit, base: Unit, exponent: i32) -> Result<Arc<UnitOfMeasure>> {
        let base = self.uom(base)?;
        self.install(self.entry(unit, Composition::Power { base, exponent }))
    }

    fn product(&self, unit: Unit, a: Unit, b: Unit) -> Result<Arc<UnitOfMeasure>> {
        let composition = Composition::Product {
            multiplier: self.uom(a)?,
            multiplicand: self.uom(b)?,
        };
        self.install(self.entry(unit, composition))
    }

    fn quotient(&self, unit: Unit, a: Unit, b: Unit) -> Result<Arc<UnitOfMeasure>> {
        let composition = Composition::Quotient {
            dividend: self.uom(a)?,
            divisor: self.uom(b)?,
        };
        self.install(self.entry(unit, composition))
    }

    /// Named unit equal to `factor` times the product or quotient of two
    /// units, e.g. `N = 1 kg·m/s²`. The composite carries the named unit's
    /// type so it classifies later algebra results.
    fn defined(
        &self,
        unit: Unit,
        factor: &str,
        a: Unit,
        b: Unit,
        dividing: bool,
    ) -> Result<Arc<UnitOfMeasure>> {
        let (a, b) = (self.uom(a)?, self.uom(b)?);
        let unit_type = unit.unit_type();
        let abscissa = if dividing {
            self.create_quotient_uom(
                unit_type,
                None,
                &format!("{} per {}", a.name(), b.name()),
                &format!("{}/{}", a.symbol(), b.symbol()),
                "",
                &a,
                &b,
            )?
        } else {
            self.create_product_uom(
                unit_type,
                None,
                &format!("{} {}", a.name(), b.name()),
                &format!("{}·{}", a.symbol(), b.symbol()),
                "",
                &a,
                &b,
            )?
        };
        self.linear(unit, Number::from_str(factor)?, &abscissa, Number::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    #[test]
    fn test_every_unit_materializes() {
        let sys = MeasurementSystem::new();
        for unit in Unit::ALL {
            let uom = sys.uom(unit).unwrap();
            assert_eq!(uom.canonical(), Some(unit));
            assert_eq!(uom.symbol(), unit.symbol());
            assert_eq!(uom.unit_type(), unit.unit_type());
            assert!(uom.base_symbol().is_ok(), "{}", unit.symbol());
        }
    }

    #[test]
    fn test_materialized_once() {
        let sys = MeasurementSystem::new();
        let a = sys.uom(Unit::Psi).unwrap();
        let b = sys.uom(Unit::Psi).unwrap();
        assert_eq!(a.id(), b.id());
        assert!(sys.find_by_unit(Unit::PoundForce).is_some());
    }

    #[test]
    fn test_base_symbols() {
        let sys = MeasurementSystem::new();
        let base = |unit| sys.uom(unit).unwrap().base_symbol().unwrap();

        assert_eq!(base(Unit::One), "1");
        assert_eq!(base(Unit::Percent), "1");
        assert_eq!(base(Unit::Newton), "kg·m/s²");
        assert_eq!(base(Unit::Joule), "kg·m²/s²");
        assert_eq!(base(Unit::Hertz), "1/s");
        assert_eq!(base(Unit::Ohm), "kg·m²/(A²·s³)");
        assert_eq!(base(Unit::PerMole), "1/mol");
        assert_eq!(base(Unit::WattPerSquareMetreQuarticKelvin), "kg/(K^4·s³)");
        assert_eq!(base(Unit::Foot), "in");
        assert_eq!(base(Unit::FootPoundForce), "in²·lbm/s²");
        assert_eq!(base(Unit::Byte), "bit");
    }

    #[test]
    fn test_same_system_factors() {
        let sys = MeasurementSystem::new();
        let factor = |from, to| {
            let from = sys.uom(from).unwrap();
            from.conversion_factor(&sys.uom(to).unwrap()).unwrap()
        };

        assert_eq!(factor(Unit::Day, Unit::Second), Number::from_i64(86400));
        assert_eq!(factor(Unit::Litre, Unit::CubicMetre), num("0.001"));
        assert_eq!(factor(Unit::Mile, Unit::Yard), Number::from_i64(1760));
        assert_eq!(factor(Unit::Joule, Unit::NewtonMetre), Number::one());
        assert_eq!(factor(Unit::Byte, Unit::Bit), Number::from_i64(8));
    }

    #[test]
    fn test_cross_system_factors() {
        let sys = MeasurementSystem::new();
        let factor = |from, to| {
            let from = sys.uom(from).unwrap();
            from.conversion_factor(&sys.uom(to).unwrap()).unwrap()
        };

        assert_eq!(factor(Unit::Foot, Unit::Metre), num("0.3048"));
        assert_eq!(factor(Unit::Mile, Unit::Metre), num("1609.344"));
        assert_eq!(factor(Unit::Ounce, Unit::Gram), num("28.349523125"));
        assert!(factor(Unit::Gallon, Unit::Litre).approx_eq(&num("3.785411784"), 1e-15));
        assert!(factor(Unit::Psi, Unit::Pascal).approx_eq(&num("6894.757293168361"), 1e-12));
        assert!(factor(Unit::MilePerHour, Unit::MetrePerSecond).approx_eq(&num("0.44704"), 1e-15));
    }

    #[test]
    fn test_currencies_need_a_rate() {
        let sys = MeasurementSystem::new();
        let usd = sys.uom(Unit::UsDollar).unwrap();
        let eur = sys.uom(Unit::Euro).unwrap();
        assert!(eur.conversion_factor(&usd).is_err());
    }

    #[test]
    fn test_categories() {
        let sys = MeasurementSystem::new();
        assert_eq!(sys.uom(Unit::Acre).unwrap().category(), "area");
        assert_eq!(sys.uom(Unit::Percent).unwrap().category(), "unity");
    }

    #[test]
    fn test_serde_name() {
        let json = serde_json::to_string(&Unit::FootPoundForce).unwrap();
        assert_eq!(json, "\"foot_pound_force\"");
    }
}

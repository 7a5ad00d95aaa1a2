//! Physical constants as quantities

use crate::catalog::Unit;
use crate::error::Result;
use crate::quantity::Quantity;
use crate::system::MeasurementSystem;
use metron_core::Number;
use serde::{Deserialize, Serialize};

/// Well-known physical constants (2019 SI exact values where defined)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constant {
    SpeedOfLight,
    StandardGravity,
    Planck,
    Boltzmann,
    Avogadro,
    GasConstant,
    ElementaryCharge,
    Faraday,
    ElectronMass,
    ProtonMass,
    StefanBoltzmann,
    CaesiumFrequency,
}

impl Constant {
    pub const ALL: [Constant; 12] = [
        Constant::SpeedOfLight,
        Constant::StandardGravity,
        Constant::Planck,
        Constant::Boltzmann,
        Constant::Avogadro,
        Constant::GasConstant,
        Constant::ElementaryCharge,
        Constant::Faraday,
        Constant::ElectronMass,
        Constant::ProtonMass,
        Constant::StefanBoltzmann,
        Constant::CaesiumFrequency,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Constant::SpeedOfLight => "speed of light in vacuum",
            Constant::StandardGravity => "standard acceleration of gravity",
            Constant::Planck => "Planck constant",
            Constant::Boltzmann => "Boltzmann constant",
            Constant::Avogadro => "Avogadro constant",
            Constant::GasConstant => "molar gas constant",
            Constant::ElementaryCharge => "elementary charge",
            Constant::Faraday => "Faraday constant",
            Constant::ElectronMass => "electron mass",
            Constant::ProtonMass => "proton mass",
            Constant::StefanBoltzmann => "Stefan-Boltzmann constant",
            Constant::CaesiumFrequency => "caesium hyperfine transition frequency",
        }
    }
}

impl MeasurementSystem {
    /// The value of a physical constant
    pub fn quantity(&self, constant: Constant) -> Result<Quantity> {
        match constant {
            Constant::SpeedOfLight => self.measured("299792458", Unit::MetrePerSecond),
            Constant::StandardGravity => self.measured("9.80665", Unit::MetrePerSecondSquared),
            Constant::Planck => self.measured("6.62607015e-34", Unit::JouleSecond),
            Constant::Boltzmann => self.measured("1.380649e-23", Unit::JoulePerKelvin),
            Constant::Avogadro => self.measured("6.02214076e23", Unit::PerMole),
            Constant::GasConstant => {
                let k = self.quantity(Constant::Boltzmann)?;
                let na = self.quantity(Constant::Avogadro)?;
                k.multiply(&na, self)
            }
            Constant::ElementaryCharge => self.measured("1.602176634e-19", Unit::Coulomb),
            Constant::Faraday => {
                // materialized first so the product is classified against it
                let molar_charge = self.uom(Unit::CoulombPerMole)?;
                let e = self.quantity(Constant::ElementaryCharge)?;
                let na = self.quantity(Constant::Avogadro)?;
                e.multiply(&na, self)?.convert(&molar_charge)
            }
            Constant::ElectronMass => self.measured("9.1093837015e-31", Unit::Kilogram),
            Constant::ProtonMass => self.measured("1.67262192369e-27", Unit::Kilogram),
            Constant::StefanBoltzmann => {
                self.measured("5.670374419e-8", Unit::WattPerSquareMetreQuarticKelvin)
            }
            Constant::CaesiumFrequency => self.measured("9192631770", Unit::Hertz),
        }
    }

    fn measured(&self, amount: &str, unit: Unit) -> Result<Quantity> {
        Ok(Quantity::new(Number::from_str(amount)?, &self.uom(unit)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnitType;

    fn num(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    #[test]
    fn test_every_constant() {
        let sys = MeasurementSystem::new();
        for constant in Constant::ALL {
            let q = sys.quantity(constant).unwrap();
            assert!(!q.amount().is_zero(), "{}", constant.name());
        }
    }

    #[test]
    fn test_speed_of_light() {
        let sys = MeasurementSystem::new();
        let c = sys.quantity(Constant::SpeedOfLight).unwrap();
        assert_eq!(*c.amount(), Number::from_i64(299_792_458));
        assert_eq!(c.unit().symbol(), "m/s");
    }

    #[test]
    fn test_faraday() {
        let sys = MeasurementSystem::new();
        let f = sys.quantity(Constant::Faraday).unwrap();
        assert_eq!(f.unit().symbol(), "C/mol");
        assert_eq!(f.unit().unit_type(), UnitType::MolarCharge);
        assert!(f.amount().approx_eq(&num("96485.33212331001"), 1e-12));
    }

    #[test]
    fn test_gas_constant() {
        let sys = MeasurementSystem::new();
        let r = sys.quantity(Constant::GasConstant).unwrap();
        assert!(r.amount().approx_eq(&num("8.31446261815324"), 1e-12));
        assert_eq!(r.unit().base_symbol().unwrap(), "kg·m²/(K·mol·s²)");
    }

    #[test]
    fn test_standard_gravity_in_feet() {
        let sys = MeasurementSystem::new();
        let g = sys.quantity(Constant::StandardGravity).unwrap();
        let ft = g.convert(&sys.uom(Unit::FootPerSecondSquared).unwrap()).unwrap();
        assert!(ft.amount().approx_eq(&num("32.17404855643045"), 1e-12));
    }
}

//! Unit types
//!
//! Every unit of measure carries a type naming the physical quantity it
//! measures. Two units whose types are both classified and different can
//! never be converted into each other.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of quantity a unit measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    /// Dimensionless ratio (1, %)
    Unity,
    /// Composite units whose type is not known
    Unclassified,

    // Base quantities
    Length,
    Mass,
    Time,
    ElectricCurrent,
    Temperature,
    SubstanceAmount,
    LuminousIntensity,
    PlaneAngle,
    SolidAngle,

    // Derived quantities
    Area,
    Volume,
    Velocity,
    Acceleration,
    Force,
    Energy,
    Power,
    Pressure,
    Frequency,
    ElectricCharge,
    ElectromotiveForce,
    ElectricResistance,
    LuminousFlux,
    Density,
    Action,
    Entropy,
    ReciprocalAmount,
    MolarCharge,
    RadiantExitanceCoefficient,

    // Other
    Currency,
    ComputerScience,
}

impl UnitType {
    /// True for types that take part in the dimension veto
    pub fn is_classified(&self) -> bool {
        !matches!(self, UnitType::Unity | UnitType::Unclassified)
    }

    /// Two types may be converted into each other unless both are
    /// classified and they differ.
    pub fn is_compatible(&self, other: &UnitType) -> bool {
        !self.is_classified() || !other.is_classified() || self == other
    }

    /// Lower-case human readable name
    pub fn name(&self) -> &'static str {
        match self {
            UnitType::Unity => "unity",
            UnitType::Unclassified => "unclassified",
            UnitType::Length => "length",
            UnitType::Mass => "mass",
            UnitType::Time => "time",
            UnitType::ElectricCurrent => "electric current",
            UnitType::Temperature => "temperature",
            UnitType::SubstanceAmount => "amount of substance",
            UnitType::LuminousIntensity => "luminous intensity",
            UnitType::PlaneAngle => "plane angle",
            UnitType::SolidAngle => "solid angle",
            UnitType::Area => "area",
            UnitType::Volume => "volume",
            UnitType::Velocity => "velocity",
            UnitType::Acceleration => "acceleration",
            UnitType::Force => "force",
            UnitType::Energy => "energy",
            UnitType::Power => "power",
            UnitType::Pressure => "pressure",
            UnitType::Frequency => "frequency",
            UnitType::ElectricCharge => "electric charge",
            UnitType::ElectromotiveForce => "electromotive force",
            UnitType::ElectricResistance => "electric resistance",
            UnitType::LuminousFlux => "luminous flux",
            UnitType::Density => "density",
            UnitType::Action => "action",
            UnitType::Entropy => "entropy",
            UnitType::ReciprocalAmount => "reciprocal amount of substance",
            UnitType::MolarCharge => "molar charge",
            UnitType::RadiantExitanceCoefficient => "radiant exitance coefficient",
            UnitType::Currency => "currency",
            UnitType::ComputerScience => "computer science",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Default for UnitType {
    fn default() -> Self {
        UnitType::Unclassified
    }
}

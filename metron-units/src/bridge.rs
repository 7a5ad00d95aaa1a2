//! Cross-system bridges and scalar-to-scalar factors
//!
//! Units of one measurement system convert among themselves through their
//! conversion chains. To relate two systems, a basic unit of one declares a
//! bridge to its counterpart in the other (foot → metre). Only one
//! direction is declared; the reverse uses the reciprocal factor.

use crate::error::{Result, UomError};
use crate::reducer::MAX_RECURSIONS;
use crate::UnitOfMeasure;
use metron_core::Number;
use std::sync::Arc;

/// A unidirectional linear link into another measurement system.
///
/// The offset is recorded but not applied when computing factors.
#[derive(Clone)]
pub struct Bridge {
    pub scaling_factor: Number,
    pub offset: Number,
    pub abscissa: Arc<UnitOfMeasure>,
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("scaling_factor", &self.scaling_factor.to_string())
            .field("offset", &self.offset.to_string())
            .field("abscissa", &self.abscissa.symbol())
            .finish()
    }
}

/// Follow a unit's conversion chain to its terminal unit, returning that
/// unit and the product of the scaling factors along the way.
pub(crate) fn terminal_of(unit: &Arc<UnitOfMeasure>) -> Result<(Arc<UnitOfMeasure>, Number)> {
    let mut current = unit.clone();
    let mut factor = Number::one();

    for _ in 0..MAX_RECURSIONS {
        match current.abscissa_link() {
            None => return Ok((current, factor)),
            Some(next) => {
                factor = factor.mul(&current.scaling_factor());
                current = next;
            }
        }
    }

    Err(UomError::CircularReference(unit.symbol().to_string()))
}

/// Factor converting one unit into another of the same dimension, bridging
/// measurement systems when their terminal units differ.
pub(crate) fn scalar_factor(from: &Arc<UnitOfMeasure>, to: &Arc<UnitOfMeasure>) -> Result<Number> {
    if from.id() == to.id() {
        return Ok(Number::one());
    }
    if let Some(abscissa) = from.abscissa_link() {
        if abscissa.id() == to.id() {
            return Ok(from.scaling_factor());
        }
    }
    if let Some(abscissa) = to.abscissa_link() {
        if abscissa.id() == from.id() {
            return Ok(to.scaling_factor().recip()?);
        }
    }

    let (from_terminal, from_factor) = terminal_of(from)?;
    let (to_terminal, to_factor) = terminal_of(to)?;

    let mut factor = from_factor;
    if from_terminal.id() != to_terminal.id() {
        factor = factor.mul(&bridge_factor(&from_terminal, &to_terminal)?);
    }
    Ok(factor.checked_div(&to_factor)?)
}

/// Factor across a declared bridge, in either direction
fn bridge_factor(from: &Arc<UnitOfMeasure>, to: &Arc<UnitOfMeasure>) -> Result<Number> {
    if let Some(bridge) = from.bridge() {
        let (terminal, chain) = terminal_of(&bridge.abscissa)?;
        if terminal.id() == to.id() {
            return Ok(bridge.scaling_factor.mul(&chain));
        }
    }
    if let Some(bridge) = to.bridge() {
        let (terminal, chain) = terminal_of(&bridge.abscissa)?;
        if terminal.id() == from.id() {
            return Ok(bridge.scaling_factor.mul(&chain).recip()?);
        }
    }

    Err(UomError::incompatible(
        from.symbol(),
        to.symbol(),
        "no conversion or bridge relates these units",
    ))
}

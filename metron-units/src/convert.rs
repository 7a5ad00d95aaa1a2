//! Conversion factors between units
//!
//! Both units are reduced to terminal terms. Each source term is paired
//! with a target term of the same type and exponent, the per-term scalar
//! factors are multiplied together and the result is scaled by the ratio
//! of the two reductions' scaling factors.

use crate::bridge::scalar_factor;
use crate::error::{Result, UomError};
use crate::reducer::{Reducer, Term};
use crate::UnitOfMeasure;
use metron_core::Number;
use std::sync::Arc;
use tracing::trace;

impl UnitOfMeasure {
    /// Factor `f` such that an amount `x` of this unit equals `f·x` of
    /// `target`, ignoring offsets. Results are memoized on this unit.
    pub fn conversion_factor(self: &Arc<Self>, target: &Arc<UnitOfMeasure>) -> Result<Number> {
        if let Some(factor) = self.cached_factor(target) {
            return Ok(factor);
        }

        let (from_type, to_type) = (self.unit_type(), target.unit_type());
        if !from_type.is_compatible(&to_type) {
            return Err(UomError::incompatible(
                self.symbol(),
                target.symbol(),
                format!("{} is not {}", from_type, to_type),
            ));
        }

        trace!(from = %self.symbol(), to = %target.symbol(), "computing conversion factor");

        let from = Reducer::reduce(self)?;
        let to = Reducer::reduce(target)?;

        if from.len() != to.len() {
            return Err(UomError::incompatible(
                self.symbol(),
                target.symbol(),
                format!(
                    "{} and {} have different base units",
                    from.base_symbol(),
                    to.base_symbol()
                ),
            ));
        }

        let targets: Vec<&Term> = to.terms().collect();
        let mut used = vec![false; targets.len()];
        let mut factor = Number::one();

        for term in from.terms() {
            let index = match_term(term, &targets, &used).ok_or_else(|| {
                UomError::incompatible(
                    self.symbol(),
                    target.symbol(),
                    format!("no counterpart for {} in {}", term.unit.symbol(), to.base_symbol()),
                )
            })?;
            used[index] = true;

            let scalar = scalar_factor(&term.unit, &targets[index].unit)?;
            factor = factor.mul(&scalar.pow(term.exponent)?);
        }

        let factor = factor
            .mul(from.scaling_factor())
            .checked_div(to.scaling_factor())?;

        self.cache_factor(target, factor.clone());
        Ok(factor)
    }
}

/// Index of the unused target term matching `term`: the identical unit if
/// present, otherwise the first of the same type. Exponents must agree.
fn match_term(term: &Term, targets: &[&Term], used: &[bool]) -> Option<usize> {
    let candidates = || {
        targets
            .iter()
            .enumerate()
            .filter(|(i, t)| !used[*i] && t.exponent == term.exponent)
    };

    candidates()
        .find(|(_, t)| t.unit.id() == term.unit.id())
        .or_else(|| candidates().find(|(_, t)| t.unit.unit_type() == term.unit.unit_type()))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uom::Composition;
    use crate::UnitType;

    fn unit(symbol: &str, unit_type: UnitType) -> Arc<UnitOfMeasure> {
        Arc::new(UnitOfMeasure::new(unit_type, None, symbol, symbol, "", Composition::Scalar))
    }

    fn num(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    #[test]
    fn test_same_unit() {
        let m = unit("m", UnitType::Length);
        assert!(m.conversion_factor(&m).unwrap().is_one());
    }

    #[test]
    fn test_type_veto() {
        let m = unit("m", UnitType::Length);
        let kg = unit("kg", UnitType::Mass);
        let err = m.conversion_factor(&kg).unwrap_err();
        assert!(matches!(err, UomError::IncompatibleDimensions { .. }));
        assert_eq!(m.reduction_count(), 0);
    }

    #[test]
    fn test_cardinality_mismatch() {
        let m = unit("m", UnitType::Length);
        let s = unit("s", UnitType::Time);
        let speed = Arc::new(UnitOfMeasure::new(
            UnitType::Unclassified,
            None,
            "m/s",
            "m/s",
            "",
            Composition::Quotient { dividend: m.clone(), divisor: s },
        ));
        let err = speed.conversion_factor(&m).unwrap_err();
        assert!(matches!(err, UomError::IncompatibleDimensions { .. }));
    }

    #[test]
    fn test_cross_system_power() {
        let m = unit("m", UnitType::Length);
        let inch = unit("in", UnitType::Length);
        inch.set_bridge_conversion(num("0.0254"), &m, Number::zero());
        let m2 = Arc::new(UnitOfMeasure::new(
            UnitType::Area,
            None,
            "m²",
            "m²",
            "",
            Composition::Power { base: m.clone(), exponent: 2 },
        ));
        let in2 = Arc::new(UnitOfMeasure::new(
            UnitType::Area,
            None,
            "in²",
            "in²",
            "",
            Composition::Power { base: inch, exponent: 2 },
        ));

        assert_eq!(in2.conversion_factor(&m2).unwrap(), num("0.00064516"));
    }

    #[test]
    fn test_cache_idempotence() {
        let m = unit("m", UnitType::Length);
        let km = unit("km", UnitType::Length);
        km.apply_conversion(Number::from_i64(1000), &m, Number::zero()).unwrap();

        let first = km.conversion_factor(&m).unwrap();
        let reductions = km.reduction_count();
        let second = km.conversion_factor(&m).unwrap();

        assert_eq!(first, second);
        assert_eq!(km.reduction_count(), reductions);
    }

    #[test]
    fn test_prefers_identical_unit() {
        let a = unit("a", UnitType::Length);
        let b = unit("b", UnitType::Length);
        let ab = Arc::new(UnitOfMeasure::new(
            UnitType::Unclassified,
            None,
            "a·b",
            "a·b",
            "",
            Composition::Product { multiplier: a.clone(), multiplicand: b.clone() },
        ));
        let ba = Arc::new(UnitOfMeasure::new(
            UnitType::Unclassified,
            None,
            "b·a",
            "b·a",
            "",
            Composition::Product { multiplier: b, multiplicand: a },
        ));
        // a and b are unrelated, so pairing by type alone would fail
        assert!(ab.conversion_factor(&ba).unwrap().is_one());
    }
}

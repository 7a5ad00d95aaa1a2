//! Reduction of units to terminal units
//!
//! A unit is exploded through its conversion chain and its composition
//! into a map of terminal units raised to net integer exponents, together
//! with the aggregate scaling factor from the unit to that product. The
//! same reduction drives canonical symbols, conversion factors and the
//! algebra of products and quotients.

use crate::error::{Result, UomError};
use crate::{UnitOfMeasure, UnitType};
use metron_core::Number;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{trace, warn};

/// Steps allowed before a conversion graph is declared circular
pub const MAX_RECURSIONS: usize = 100;

pub const MULT: char = '\u{00B7}';
pub const DIV: char = '/';
pub const POW: char = '^';
pub const SQ: char = '\u{00B2}';
pub const CUBED: char = '\u{00B3}';
pub const LP: char = '(';
pub const RP: char = ')';
pub const ONE_SYMBOL: &str = "1";

/// A terminal unit raised to a net exponent
#[derive(Clone)]
pub struct Term {
    pub unit: Arc<UnitOfMeasure>,
    pub exponent: i32,
}

/// The result of exploding a unit
#[derive(Clone)]
pub struct Reduction {
    terms: BTreeMap<String, Term>,
    scaling_factor: Number,
}

impl Reduction {
    fn new() -> Self {
        Reduction {
            terms: BTreeMap::new(),
            scaling_factor: Number::one(),
        }
    }

    /// Terms in symbol order
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.values()
    }

    pub fn scaling_factor(&self) -> &Number {
        &self.scaling_factor
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True for dimensionless reductions
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn exponent_of(&self, symbol: &str) -> Option<i32> {
        self.terms.get(symbol).map(|t| t.exponent)
    }

    /// Merge `exponent` occurrences of a terminal unit. The unity unit is
    /// never recorded and cancelled terms are dropped.
    fn add_term(&mut self, unit: &Arc<UnitOfMeasure>, exponent: i32) {
        if exponent == 0 || unit.unit_type() == UnitType::Unity {
            return;
        }

        let symbol = unit.symbol().to_string();
        let net = self.terms.get(&symbol).map_or(0, |t| t.exponent) + exponent;
        if net == 0 {
            self.terms.remove(&symbol);
        } else {
            self.terms.insert(symbol, Term { unit: unit.clone(), exponent: net });
        }
    }

    /// Product (or quotient, when `dividing`) of two reductions
    pub fn combine(&self, other: &Reduction, dividing: bool) -> Result<Reduction> {
        let mut merged = self.clone();
        let sign = if dividing { -1 } else { 1 };
        for term in other.terms() {
            merged.add_term(&term.unit, sign * term.exponent);
        }

        merged.scaling_factor = if dividing {
            self.scaling_factor.checked_div(&other.scaling_factor)?
        } else {
            self.scaling_factor.mul(&other.scaling_factor)
        };
        Ok(merged)
    }

    /// Canonical symbol: numerator terms, then denominator terms, each in
    /// symbol order, e.g. `kg·m²/s²` or `1/(mol·K)`
    pub fn base_symbol(&self) -> String {
        let mut numerator = Vec::new();
        let mut denominator = Vec::new();

        for (symbol, term) in &self.terms {
            if term.exponent > 0 {
                numerator.push(power_symbol(symbol, term.exponent));
            } else {
                denominator.push(power_symbol(symbol, -term.exponent));
            }
        }

        let separator = MULT.to_string();
        let mut symbol = if numerator.is_empty() {
            ONE_SYMBOL.to_string()
        } else {
            numerator.join(&separator)
        };

        match denominator.len() {
            0 => {}
            1 => {
                symbol.push(DIV);
                symbol.push_str(&denominator[0]);
            }
            _ => {
                symbol.push(DIV);
                symbol.push(LP);
                symbol.push_str(&denominator.join(&separator));
                symbol.push(RP);
            }
        }
        symbol
    }
}

/// `m`, `m²`, `m³`, `m^4`
pub fn power_symbol(symbol: &str, exponent: i32) -> String {
    match exponent {
        1 => symbol.to_string(),
        2 => format!("{}{}", symbol, SQ),
        3 => format!("{}{}", symbol, CUBED),
        _ => format!("{}{}{}", symbol, POW, exponent),
    }
}

/// Per-call explosion state
pub(crate) struct Reducer {
    reduction: Reduction,
    path: Vec<i32>,
    counter: usize,
    origin: String,
}

impl Reducer {
    /// Explode a unit into terminal units and a net scaling factor
    pub(crate) fn reduce(unit: &Arc<UnitOfMeasure>) -> Result<Reduction> {
        unit.note_reduction();

        let mut reducer = Reducer {
            reduction: Reduction::new(),
            path: Vec::new(),
            counter: 0,
            origin: unit.symbol().to_string(),
        };
        reducer.explode(unit)?;

        trace!(
            unit = %unit.symbol(),
            base = %reducer.reduction.base_symbol(),
            steps = reducer.counter,
            "reduced unit"
        );
        Ok(reducer.reduction)
    }

    /// Product of every exponent on the path from the root
    fn path_exponent(&self) -> i32 {
        self.path.iter().product()
    }

    fn explode(&mut self, unit: &Arc<UnitOfMeasure>) -> Result<()> {
        self.counter += 1;
        if self.counter > MAX_RECURSIONS {
            warn!(unit = %self.origin, limit = MAX_RECURSIONS, "circular reference in unit conversions");
            return Err(UomError::CircularReference(self.origin.clone()));
        }

        self.fold(&unit.scaling_factor())?;

        let abscissa = unit.abscissa();
        let operands = abscissa.composition().operands();

        if !operands.is_empty() {
            for (operand, exponent) in operands {
                self.path.push(exponent);
                let exploded = self.explode(&operand);
                self.path.pop();
                exploded?;
            }
        } else if abscissa.is_terminal() {
            let exponent = self.path_exponent();
            self.reduction.add_term(&abscissa, exponent);
        } else {
            self.explode(&abscissa)?;
        }
        Ok(())
    }

    /// Fold a step's factor raised to the path exponent into the accumulator
    fn fold(&mut self, factor: &Number) -> Result<()> {
        let exponent = self.path_exponent();
        if exponent == 0 || factor.is_one() {
            return Ok(());
        }

        let powered = factor.pow(exponent.abs())?;
        let accumulated = &self.reduction.scaling_factor;
        self.reduction.scaling_factor = if exponent > 0 {
            accumulated.mul(&powered)
        } else {
            accumulated.checked_div(&powered)?
        };
        Ok(())
    }
}

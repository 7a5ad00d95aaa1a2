//! Measurement system: unit registry and factory
//!
//! A [`MeasurementSystem`] owns every unit created through it. Units are
//! indexed by symbol, by canonical id and by base symbol; the first unit
//! registered under a base symbol owns it, and the algebra uses that owner
//! to classify newly composed units.
//!
//! New units are fully configured (composition, conversion, type) before
//! they are published, so a unit obtained from the registry is never seen
//! half-built by another thread.

use crate::catalog::Unit;
use crate::config::SystemConfig;
use crate::error::{Result, UomError};
use crate::prefix::Prefix;
use crate::reducer::{power_symbol, Reducer, Reduction, CUBED, DIV, MULT, POW, SQ};
use crate::uom::{read_lock, write_lock, Composition};
use crate::{UnitOfMeasure, UnitType};
use metron_core::Number;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Prefix of symbols generated from a content hash
pub const HASHED_SYMBOL_PREFIX: char = '#';

#[derive(Default)]
struct Registry {
    by_symbol: HashMap<String, Arc<UnitOfMeasure>>,
    by_base_symbol: HashMap<String, Arc<UnitOfMeasure>>,
    by_unit: HashMap<Unit, Arc<UnitOfMeasure>>,
}

impl Registry {
    fn insert(&mut self, uom: &Arc<UnitOfMeasure>, base_symbol: Option<&str>) {
        self.by_symbol
            .entry(uom.symbol().to_string())
            .or_insert_with(|| uom.clone());

        if let Some(unit) = uom.canonical() {
            self.by_unit.entry(unit).or_insert_with(|| uom.clone());
        }

        if let Some(base) = base_symbol {
            match self.by_base_symbol.get(base) {
                Some(owner) if owner.id() != uom.id() => {
                    debug!(unit = %uom.symbol(), base, owner = %owner.symbol(), "base symbol already owned");
                }
                Some(_) => {}
                None => {
                    self.by_base_symbol.insert(base.to_string(), uom.clone());
                }
            }
        }
    }

    fn remove(&mut self, uom: &UnitOfMeasure) {
        let id = uom.id();
        self.by_symbol.retain(|_, u| u.id() != id);
        self.by_base_symbol.retain(|_, u| u.id() != id);
        self.by_unit.retain(|_, u| u.id() != id);
    }
}

/// Registry and factory of units of measure
pub struct MeasurementSystem {
    config: SystemConfig,
    registry: RwLock<Registry>,
}

impl Default for MeasurementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementSystem {
    pub fn new() -> Self {
        Self::with_config(SystemConfig::default())
    }

    pub fn with_config(config: SystemConfig) -> Self {
        Self {
            config,
            registry: RwLock::new(Registry::default()),
        }
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    // ========== Lookups ==========

    pub fn find_by_symbol(&self, symbol: &str) -> Option<Arc<UnitOfMeasure>> {
        read_lock(&self.registry).by_symbol.get(symbol).cloned()
    }

    /// The unit owning a base symbol such as `kg·m/s²`
    pub fn find_by_base_symbol(&self, base_symbol: &str) -> Option<Arc<UnitOfMeasure>> {
        read_lock(&self.registry).by_base_symbol.get(base_symbol).cloned()
    }

    /// A canonical unit, if it has been materialized
    pub fn find_by_unit(&self, unit: Unit) -> Option<Arc<UnitOfMeasure>> {
        read_lock(&self.registry).by_unit.get(&unit).cloned()
    }

    /// Every registered unit, ordered by symbol
    pub fn registered_units(&self) -> Vec<Arc<UnitOfMeasure>> {
        let mut units: Vec<_> = read_lock(&self.registry).by_symbol.values().cloned().collect();
        units.sort_by(|a, b| a.symbol().cmp(b.symbol()));
        units
    }

    pub fn units_of_type(&self, unit_type: UnitType) -> Vec<Arc<UnitOfMeasure>> {
        self.registered_units()
            .into_iter()
            .filter(|u| u.unit_type() == unit_type)
            .collect()
    }

    // ========== Registration ==========

    /// Index a unit by symbol, canonical id and base symbol. Existing
    /// entries are kept. A unit whose base symbol cannot be computed is
    /// still indexed by symbol and canonical id, and the error is returned.
    pub fn register_unit(&self, uom: &Arc<UnitOfMeasure>) -> Result<()> {
        let base = uom.base_symbol();
        write_lock(&self.registry).insert(uom, base.as_deref().ok());
        debug!(unit = %uom.symbol(), "registered unit");
        base.map(|_| ())
    }

    /// Remove a unit from every index
    pub fn unregister_unit(&self, uom: &UnitOfMeasure) {
        write_lock(&self.registry).remove(uom);
        debug!(unit = %uom.symbol(), "unregistered unit");
    }

    /// Make `uom` equal to `scaling_factor · x + offset` of `abscissa`.
    ///
    /// The unit is re-indexed under its new base symbol, and the memoized
    /// factors and base symbols of every registered unit are dropped since
    /// any of them may have been derived from the old definition.
    pub fn set_conversion(
        &self,
        uom: &Arc<UnitOfMeasure>,
        scaling_factor: Number,
        abscissa: &Arc<UnitOfMeasure>,
        offset: Number,
    ) -> Result<()> {
        uom.check_conversion(&scaling_factor, abscissa, &offset)?;
        debug!(
            unit = %uom.symbol(),
            factor = %scaling_factor,
            abscissa = %abscissa.symbol(),
            offset = %offset,
            "redefining conversion"
        );

        self.unregister_unit(uom);
        uom.apply_conversion(scaling_factor, abscissa, offset)?;
        self.clear_caches();
        self.register_unit(uom)
    }

    /// Drop memoized conversion factors and base symbols of every unit
    pub fn clear_caches(&self) {
        for uom in self.registered_units() {
            uom.clear_cache();
        }
    }

    // ========== Factories ==========

    pub fn create_scalar_uom(
        &self,
        unit_type: UnitType,
        canonical: Option<Unit>,
        name: &str,
        symbol: &str,
        description: &str,
    ) -> Result<Arc<UnitOfMeasure>> {
        let uom = build(unit_type, canonical, name, symbol, description, Composition::Scalar);
        Ok(self.publish(uom)?.0)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_product_uom(
        &self,
        unit_type: UnitType,
        canonical: Option<Unit>,
        name: &str,
        symbol: &str,
        description: &str,
        multiplier: &Arc<UnitOfMeasure>,
        multiplicand: &Arc<UnitOfMeasure>,
    ) -> Result<Arc<UnitOfMeasure>> {
        let composition = Composition::Product {
            multiplier: multiplier.clone(),
            multiplicand: multiplicand.clone(),
        };
        let uom = build(unit_type, canonical, name, symbol, description, composition);
        Ok(self.publish(uom)?.0)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_quotient_uom(
        &self,
        unit_type: UnitType,
        canonical: Option<Unit>,
        name: &str,
        symbol: &str,
        description: &str,
        dividend: &Arc<UnitOfMeasure>,
        divisor: &Arc<UnitOfMeasure>,
    ) -> Result<Arc<UnitOfMeasure>> {
        let composition = Composition::Quotient {
            dividend: dividend.clone(),
            divisor: divisor.clone(),
        };
        let uom = build(unit_type, canonical, name, symbol, description, composition);
        Ok(self.publish(uom)?.0)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_power_uom(
        &self,
        unit_type: UnitType,
        canonical: Option<Unit>,
        name: &str,
        symbol: &str,
        description: &str,
        base: &Arc<UnitOfMeasure>,
        exponent: i32,
    ) -> Result<Arc<UnitOfMeasure>> {
        let composition = Composition::Power {
            base: base.clone(),
            exponent,
        };
        let uom = build(unit_type, canonical, name, symbol, description, composition);
        Ok(self.publish(uom)?.0)
    }

    /// Register a fully configured unit unless its symbol is taken.
    /// Returns the registered instance and whether it is the one passed in.
    pub(crate) fn publish(&self, uom: Arc<UnitOfMeasure>) -> Result<(Arc<UnitOfMeasure>, bool)> {
        if uom.symbol().is_empty() {
            return Err(UomError::InvalidSymbol(uom.symbol().to_string()));
        }
        if let Some(existing) = self.find_by_symbol(uom.symbol()) {
            return Ok((existing, false));
        }

        let base = uom.base_symbol()?;

        let mut registry = write_lock(&self.registry);
        if let Some(existing) = registry.by_symbol.get(uom.symbol()) {
            return Ok((existing.clone(), false));
        }
        registry.insert(&uom, Some(&base));
        drop(registry);

        debug!(unit = %uom.symbol(), base = %base, unit_type = %uom.unit_type(), "created unit");
        Ok((uom, true))
    }

    /// Unit scaled by a prefix, e.g. `km` from `m` or `KiB` from `B`. The
    /// new unit converts into the target's abscissa.
    pub fn prefixed_uom(&self, prefix: Prefix, target: &Arc<UnitOfMeasure>) -> Result<Arc<UnitOfMeasure>> {
        let symbol = format!("{}{}", prefix.symbol(), target.symbol());
        if let Some(existing) = self.find_by_symbol(&symbol) {
            return Ok(existing);
        }

        let name = format!("{}{}", prefix.name(), target.name());
        let description = format!("{} {}", prefix.name(), target.name());
        let uom = build(target.unit_type(), None, &name, &symbol, &description, Composition::Scalar);
        uom.apply_conversion(
            prefix.factor().mul(&target.scaling_factor()),
            &target.abscissa(),
            Number::zero(),
        )?;
        uom.set_category(&target.category());

        Ok(self.publish(uom)?.0)
    }

    // ========== Algebra ==========

    pub fn multiply(&self, a: &Arc<UnitOfMeasure>, b: &Arc<UnitOfMeasure>) -> Result<Arc<UnitOfMeasure>> {
        self.multiply_or_divide(a, b, false)
    }

    pub fn divide(&self, a: &Arc<UnitOfMeasure>, b: &Arc<UnitOfMeasure>) -> Result<Arc<UnitOfMeasure>> {
        self.multiply_or_divide(a, b, true)
    }

    /// Reciprocal unit: a quotient swaps its operands, anything else
    /// becomes `1/u`
    pub fn invert(&self, uom: &Arc<UnitOfMeasure>) -> Result<Arc<UnitOfMeasure>> {
        match uom.composition() {
            Composition::Quotient { dividend, divisor } => self.divide(&divisor, &dividend),
            _ => self.divide(&self.one()?, uom),
        }
    }

    /// Integer power of a unit
    pub fn power(&self, base: &Arc<UnitOfMeasure>, exponent: i32) -> Result<Arc<UnitOfMeasure>> {
        let operand = if base.symbol().contains([POW, SQ, CUBED]) {
            format!("({})", base.symbol())
        } else {
            grouped(base.symbol())
        };
        let symbol = self.fit_symbol(power_symbol(&operand, exponent));
        if let Some(existing) = self.find_by_symbol(&symbol) {
            return Ok(existing);
        }

        let name = format!("{} to the power {}", base.name(), exponent);
        let composition = Composition::Power {
            base: base.clone(),
            exponent,
        };
        let uom = build(UnitType::Unclassified, None, &name, &symbol, "", composition);
        let reduction = Reducer::reduce(&uom)?;
        self.classify(&uom, &reduction)?;

        Ok(self.publish(uom)?.0)
    }

    /// Product or quotient of two units. The merged exponents decide which
    /// registered unit, if any, the new unit is convertible to.
    fn multiply_or_divide(
        &self,
        a: &Arc<UnitOfMeasure>,
        b: &Arc<UnitOfMeasure>,
        dividing: bool,
    ) -> Result<Arc<UnitOfMeasure>> {
        let merged = Reducer::reduce(a)?.combine(&Reducer::reduce(b)?, dividing)?;

        let (operator, name, composition) = if dividing {
            (
                DIV,
                format!("{} per {}", a.name(), b.name()),
                Composition::Quotient {
                    dividend: a.clone(),
                    divisor: b.clone(),
                },
            )
        } else {
            (
                MULT,
                format!("{} {}", a.name(), b.name()),
                Composition::Product {
                    multiplier: a.clone(),
                    multiplicand: b.clone(),
                },
            )
        };

        // symbols read left to right, so only a composite divisor is grouped
        let right = if dividing {
            grouped(b.symbol())
        } else {
            b.symbol().to_string()
        };
        let symbol = self.fit_symbol(format!("{}{}{}", a.symbol(), operator, right));
        if let Some(existing) = self.find_by_symbol(&symbol) {
            return Ok(existing);
        }

        let uom = build(UnitType::Unclassified, None, &name, &symbol, "", composition);
        self.classify(&uom, &merged)?;

        Ok(self.publish(uom)?.0)
    }

    /// Convert a freshly composed unit to the registered owner of its base
    /// symbol and adopt the owner's type. Dimensionless results belong to
    /// the unity unit.
    fn classify(&self, uom: &Arc<UnitOfMeasure>, reduction: &Reduction) -> Result<()> {
        let owner = if reduction.is_empty() {
            Some(self.one()?)
        } else {
            self.find_by_base_symbol(&reduction.base_symbol())
        };
        let Some(owner) = owner else {
            return Ok(());
        };

        let owner_scale = Reducer::reduce(&owner)?.scaling_factor().clone();
        let factor = reduction.scaling_factor().checked_div(&owner_scale)?;
        uom.apply_conversion(factor, &owner, Number::zero())?;
        uom.set_unit_type(owner.unit_type());
        Ok(())
    }

    /// `symbol` if it fits the configured length, otherwise a stable
    /// hash of it such as `#3fa0c1d2e4b5`
    fn fit_symbol(&self, symbol: String) -> String {
        if symbol.chars().count() <= self.config.max_symbol_length {
            return symbol;
        }

        let hash = Sha256::digest(symbol.as_bytes());
        format!("{}{}", HASHED_SYMBOL_PREFIX, &format!("{:x}", hash)[..12])
    }
}

/// Parenthesized when composite, so the symbol keeps a single reading
fn grouped(symbol: &str) -> String {
    if symbol.contains([MULT, DIV]) {
        format!("({})", symbol)
    } else {
        symbol.to_string()
    }
}

/// An unpublished unit
pub(crate) fn build(
    unit_type: UnitType,
    canonical: Option<Unit>,
    name: &str,
    symbol: &str,
    description: &str,
    composition: Composition,
) -> Arc<UnitOfMeasure> {
    Arc::new(UnitOfMeasure::new(unit_type, canonical, name, symbol, description, composition))
}

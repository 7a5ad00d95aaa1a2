//! Units of measure
//!
//! A unit is related to another unit, its abscissa, by a linear conversion
//! `y = a·x + b`: an amount `x` in this unit equals `a·x + b` in the
//! abscissa unit. A unit that is its own abscissa (`a = 1`, `b = 0`) is
//! terminal. Units may additionally be composed of other units as a power,
//! product or quotient.

use crate::bridge::Bridge;
use crate::catalog::Unit;
use crate::error::{Result, UomError};
use crate::reducer::{Reducer, Reduction};
use crate::UnitType;
use metron_core::Number;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// How a unit is built from other units
#[derive(Clone, Default)]
pub enum Composition {
    #[default]
    Scalar,
    Power {
        base: Arc<UnitOfMeasure>,
        exponent: i32,
    },
    Product {
        multiplier: Arc<UnitOfMeasure>,
        multiplicand: Arc<UnitOfMeasure>,
    },
    Quotient {
        dividend: Arc<UnitOfMeasure>,
        divisor: Arc<UnitOfMeasure>,
    },
}

impl Composition {
    /// Operands paired with the exponent they contribute
    pub fn operands(&self) -> Vec<(Arc<UnitOfMeasure>, i32)> {
        match self {
            Composition::Scalar => Vec::new(),
            Composition::Power { base, exponent } => vec![(base.clone(), *exponent)],
            Composition::Product { multiplier, multiplicand } => {
                vec![(multiplier.clone(), 1), (multiplicand.clone(), 1)]
            }
            Composition::Quotient { dividend, divisor } => {
                vec![(dividend.clone(), 1), (divisor.clone(), -1)]
            }
        }
    }

}

impl fmt::Debug for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Composition::Scalar => write!(f, "Scalar"),
            Composition::Power { base, exponent } => write!(f, "Power({}^{})", base.symbol(), exponent),
            Composition::Product { multiplier, multiplicand } => {
                write!(f, "Product({} * {})", multiplier.symbol(), multiplicand.symbol())
            }
            Composition::Quotient { dividend, divisor } => {
                write!(f, "Quotient({} / {})", dividend.symbol(), divisor.symbol())
            }
        }
    }
}

/// y = scaling_factor * x + offset, in units of `abscissa` (`None` = itself)
#[derive(Clone)]
struct Conversion {
    scaling_factor: Number,
    offset: Number,
    abscissa: Option<Arc<UnitOfMeasure>>,
}

impl Default for Conversion {
    fn default() -> Self {
        Conversion {
            scaling_factor: Number::one(),
            offset: Number::zero(),
            abscissa: None,
        }
    }
}

#[derive(Default)]
struct UnitState {
    unit_type: UnitType,
    category: String,
    conversion: Conversion,
    bridge: Option<Bridge>,
    composition: Composition,
}

/// A unit of measure
///
/// Units are shared as `Arc<UnitOfMeasure>` and created through the
/// factories of [`crate::MeasurementSystem`], which guarantee one instance
/// per symbol.
pub struct UnitOfMeasure {
    id: u64,
    symbol: String,
    name: String,
    description: String,
    canonical: Option<Unit>,
    state: RwLock<UnitState>,
    base_symbol: RwLock<Option<String>>,
    conversions: RwLock<HashMap<u64, Number>>,
    reductions: AtomicU64,
}

impl UnitOfMeasure {
    pub(crate) fn new(
        unit_type: UnitType,
        canonical: Option<Unit>,
        name: &str,
        symbol: &str,
        description: &str,
        composition: Composition,
    ) -> Self {
        UnitOfMeasure {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            symbol: symbol.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            canonical,
            state: RwLock::new(UnitState {
                unit_type,
                composition,
                ..UnitState::default()
            }),
            base_symbol: RwLock::new(None),
            conversions: RwLock::new(HashMap::new()),
            reductions: AtomicU64::new(0),
        }
    }

    // ========== Identity & metadata ==========

    /// Process-unique identity
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn canonical(&self) -> Option<Unit> {
        self.canonical
    }

    pub fn unit_type(&self) -> UnitType {
        read_lock(&self.state).unit_type
    }

    pub(crate) fn set_unit_type(&self, unit_type: UnitType) {
        write_lock(&self.state).unit_type = unit_type;
    }

    pub fn category(&self) -> String {
        read_lock(&self.state).category.clone()
    }

    pub fn set_category(&self, category: &str) {
        write_lock(&self.state).category = category.to_string();
    }

    // ========== Conversion ==========

    pub fn scaling_factor(&self) -> Number {
        read_lock(&self.state).conversion.scaling_factor.clone()
    }

    pub fn offset(&self) -> Number {
        read_lock(&self.state).conversion.offset.clone()
    }

    /// The unit this one converts into; a terminal unit returns itself
    pub fn abscissa(self: &Arc<Self>) -> Arc<UnitOfMeasure> {
        self.abscissa_link().unwrap_or_else(|| self.clone())
    }

    /// The abscissa when it is another unit
    pub(crate) fn abscissa_link(&self) -> Option<Arc<UnitOfMeasure>> {
        read_lock(&self.state).conversion.abscissa.clone()
    }

    pub fn is_terminal(&self) -> bool {
        read_lock(&self.state).conversion.abscissa.is_none()
    }

    /// Reject a conversion from this unit to itself that is not the identity
    pub(crate) fn check_conversion(
        &self,
        scaling_factor: &Number,
        abscissa: &UnitOfMeasure,
        offset: &Number,
    ) -> Result<()> {
        if abscissa.id == self.id && (!scaling_factor.is_one() || !offset.is_zero()) {
            return Err(UomError::InvalidSelfConversion(self.symbol.clone()));
        }
        Ok(())
    }

    /// Apply a new conversion triple and drop everything derived from the
    /// old one. Registry bookkeeping is done by the caller.
    pub(crate) fn apply_conversion(
        &self,
        scaling_factor: Number,
        abscissa: &Arc<UnitOfMeasure>,
        offset: Number,
    ) -> Result<()> {
        self.check_conversion(&scaling_factor, abscissa, &offset)?;

        let abscissa = (abscissa.id != self.id).then(|| abscissa.clone());
        write_lock(&self.state).conversion = Conversion {
            scaling_factor,
            offset,
            abscissa,
        };
        self.clear_cache();
        Ok(())
    }

    // ========== Bridge ==========

    pub fn bridge(&self) -> Option<Bridge> {
        read_lock(&self.state).bridge.clone()
    }

    /// Link this unit to its counterpart in another measurement system.
    /// Same-system conversions are unaffected.
    pub fn set_bridge_conversion(
        &self,
        scaling_factor: Number,
        abscissa: &Arc<UnitOfMeasure>,
        offset: Number,
    ) {
        write_lock(&self.state).bridge = Some(Bridge {
            scaling_factor,
            offset,
            abscissa: abscissa.clone(),
        });
        write_lock(&self.conversions).clear();
    }

    // ========== Composition ==========

    pub fn composition(&self) -> Composition {
        read_lock(&self.state).composition.clone()
    }

    // ========== Reduction ==========

    /// Terminal units with net exponents, and the factor from this unit to
    /// their product
    pub fn reduce(self: &Arc<Self>) -> Result<Reduction> {
        Reducer::reduce(self)
    }

    /// Canonical symbol in terms of terminal units, e.g. `kg·m/s²`
    pub fn base_symbol(self: &Arc<Self>) -> Result<String> {
        if let Some(symbol) = read_lock(&self.base_symbol).as_ref() {
            return Ok(symbol.clone());
        }

        let symbol = Reducer::reduce(self)?.base_symbol();
        *write_lock(&self.base_symbol) = Some(symbol.clone());
        Ok(symbol)
    }

    // ========== Caches ==========

    pub(crate) fn cached_factor(&self, target: &UnitOfMeasure) -> Option<Number> {
        read_lock(&self.conversions).get(&target.id).cloned()
    }

    pub(crate) fn cache_factor(&self, target: &UnitOfMeasure, factor: Number) {
        write_lock(&self.conversions).insert(target.id, factor);
    }

    /// Forget the cached base symbol and all memoized conversion factors
    pub fn clear_cache(&self) {
        *write_lock(&self.base_symbol) = None;
        write_lock(&self.conversions).clear();
    }

    /// Number of times this unit has been exploded by the reducer
    pub fn reduction_count(&self) -> u64 {
        self.reductions.load(Ordering::Relaxed)
    }

    pub(crate) fn note_reduction(&self) {
        self.reductions.fetch_add(1, Ordering::Relaxed);
    }

    /// Symbol of the abscissa unit, this unit's own symbol when terminal
    fn abscissa_symbol(&self) -> String {
        match self.abscissa_link() {
            Some(abscissa) => abscissa.symbol.clone(),
            None => self.symbol.clone(),
        }
    }
}

impl PartialEq for UnitOfMeasure {
    fn eq(&self, other: &Self) -> bool {
        if self.id == other.id {
            return true;
        }
        if let (Some(a), Some(b)) = (self.canonical, other.canonical) {
            if a != b {
                return false;
            }
        }
        if self.abscissa_symbol() != other.abscissa_symbol() {
            return false;
        }
        // one lock at a time
        self.scaling_factor() == other.scaling_factor() && self.offset() == other.offset()
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

impl fmt::Debug for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = read_lock(&self.state);
        f.debug_struct("UnitOfMeasure")
            .field("id", &self.id)
            .field("symbol", &self.symbol)
            .field("unit_type", &state.unit_type)
            .field("scaling_factor", &state.conversion.scaling_factor.to_string())
            .field("offset", &state.conversion.offset.to_string())
            .field(
                "abscissa",
                &state.conversion.abscissa.as_ref().map(|a| a.symbol.clone()),
            )
            .field("composition", &state.composition)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(symbol: &str) -> Arc<UnitOfMeasure> {
        Arc::new(UnitOfMeasure::new(
            UnitType::Length,
            None,
            symbol,
            symbol,
            "",
            Composition::Scalar,
        ))
    }

    #[test]
    fn test_new_unit_is_terminal() {
        let m = scalar("m");
        assert!(m.is_terminal());
        assert!(m.scaling_factor().is_one());
        assert!(m.offset().is_zero());
        assert_eq!(m.abscissa().id(), m.id());
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(scalar("a").id(), scalar("a").id());
    }

    #[test]
    fn test_apply_conversion() {
        let m = scalar("m");
        let km = scalar("km");
        km.apply_conversion(Number::from_i64(1000), &m, Number::zero()).unwrap();

        assert!(!km.is_terminal());
        assert_eq!(km.abscissa().symbol(), "m");
        assert_eq!(km.scaling_factor(), Number::from_i64(1000));
    }

    #[test]
    fn test_self_conversion_must_be_identity() {
        let m = scalar("m");
        let err = m.apply_conversion(Number::from_i64(2), &m, Number::zero()).unwrap_err();
        assert_eq!(err, UomError::InvalidSelfConversion("m".into()));

        let err = m.apply_conversion(Number::one(), &m, Number::one()).unwrap_err();
        assert!(matches!(err, UomError::InvalidSelfConversion(_)));

        m.apply_conversion(Number::one(), &m, Number::zero()).unwrap();
        assert!(m.is_terminal());
    }

    #[test]
    fn test_conversion_clears_caches() {
        let m = scalar("m");
        let ft = scalar("ft");
        assert_eq!(ft.base_symbol().unwrap(), "ft");
        ft.cache_factor(&m, Number::from_i64(3));

        ft.apply_conversion(Number::from_str("0.3048").unwrap(), &m, Number::zero()).unwrap();
        assert!(ft.cached_factor(&m).is_none());
        assert_eq!(ft.base_symbol().unwrap(), "m");
    }

    #[test]
    fn test_base_symbol_is_cached() {
        let m = scalar("m");
        m.base_symbol().unwrap();
        let count = m.reduction_count();
        m.base_symbol().unwrap();
        assert_eq!(m.reduction_count(), count);
    }

    #[test]
    fn test_equality() {
        let m = scalar("m");
        let km = scalar("km");
        let also_km = scalar("kilometre");
        km.apply_conversion(Number::from_i64(1000), &m, Number::zero()).unwrap();
        also_km.apply_conversion(Number::from_i64(1000), &m, Number::zero()).unwrap();

        assert_eq!(*km, *also_km);
        assert_ne!(*km, *m);
        assert_ne!(*m, *scalar("ft"));
    }

    #[test]
    fn test_equality_under_concurrent_writes() {
        let m = scalar("m");
        let a = scalar("a");
        let b = scalar("b");
        a.apply_conversion(Number::from_i64(2), &m, Number::zero()).unwrap();
        b.apply_conversion(Number::from_i64(2), &m, Number::zero()).unwrap();

        std::thread::scope(|scope| {
            scope.spawn(|| (0..2000).for_each(|_| assert_eq!(*a, *b)));
            scope.spawn(|| (0..2000).for_each(|_| assert_eq!(*b, *a)));
            scope.spawn(|| (0..2000).for_each(|i| a.set_category(&i.to_string())));
            scope.spawn(|| (0..2000).for_each(|i| b.set_category(&i.to_string())));
        });
    }

    #[test]
    fn test_composition_operands() {
        let m = scalar("m");
        let s = scalar("s");
        let quotient = Composition::Quotient { dividend: m.clone(), divisor: s.clone() };
        let exps: Vec<i32> = quotient.operands().iter().map(|(_, e)| *e).collect();
        assert_eq!(exps, vec![1, -1]);

        let power = Composition::Power { base: m, exponent: 3 };
        assert_eq!(power.operands()[0].1, 3);
        assert!(Composition::Scalar.operands().is_empty());
    }

    #[test]
    fn test_display_and_debug() {
        let m = scalar("m");
        assert_eq!(m.to_string(), "m");
        assert!(format!("{:?}", m).contains("symbol: \"m\""));
    }
}

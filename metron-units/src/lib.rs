//! Metron Units - Unit of measure algebra and conversion
//!
//! Units are related to one another by linear conversions `y = a·x + b`
//! and composed into products, quotients and integer powers. Any unit can
//! be reduced to terminal units with net exponents, which gives it a
//! canonical base symbol (`kg·m/s²`) and makes conversion factors between
//! arbitrary composite units computable. Terminal units of different
//! measurement systems (SI, US customary) are related by bridges.
//!
//! ```ignore
//! let sys = MeasurementSystem::new();
//! let ft = sys.uom(Unit::Foot)?;
//! let m = sys.uom(Unit::Metre)?;
//! let q = Quantity::new(Number::from_i64(10), &ft).convert(&m)?; // 3.048 m
//! ```
//!
//! Catalog:
//! - Unity (1, %)
//! - SI base and derived (m, kg, s, A, K, mol, cd, N, J, W, Pa, Hz, C, V, Ω, ...)
//! - US customary (in, ft, yd, mi, lbm, oz, °R, °F, lbf, psi, gal, acre, mph)
//! - Currency (US$, €)
//! - Computer science (bit, byte)

mod bridge;
mod catalog;
mod config;
mod constant;
mod convert;
mod error;
mod prefix;
mod quantity;
mod reducer;
mod system;
mod unit_type;
mod uom;

pub use bridge::Bridge;
pub use catalog::Unit;
pub use config::SystemConfig;
pub use constant::Constant;
pub use error::{ErrorReport, Result, UomError};
pub use metron_core::Number;
pub use prefix::Prefix;
pub use quantity::Quantity;
pub use reducer::{Reduction, Term, MAX_RECURSIONS};
pub use system::{MeasurementSystem, HASHED_SYMBOL_PREFIX};
pub use unit_type::UnitType;
pub use uom::{Composition, UnitOfMeasure};

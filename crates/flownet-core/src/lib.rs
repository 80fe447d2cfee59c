//! Flownet Core - Migration flow domain model
//!
//! This crate holds the input row types, the closed demographic
//! enumerations, and the location-code machinery (granularity truncation
//! and geo-reference lookup) shared by every graph builder.
//!
//! # Example
//!
//! ```
//! use flownet_core::{GeoTable, Granularity, LocationResolver};
//!
//! let resolver = LocationResolver::new(
//!     GeoTable::from_rows("prefecture", [(1101, 116.4, 39.9)]),
//!     GeoTable::from_rows("province", [(11, 116.4, 39.9)]),
//! );
//!
//! let loc = resolver
//!     .resolve("110101", Granularity::Prefecture, (0.0, 0.0))
//!     .unwrap();
//! assert_eq!(loc.id, "1101");
//! ```

mod demographics;
mod error;
mod location;
mod record;

pub use demographics::{EducationLevel, Gender};
pub use error::{FlowError, Result};
pub use location::{GeoTable, Granularity, LocationResolver, ResolvedLocation};
pub use record::{FlowRecord, StepRecord};

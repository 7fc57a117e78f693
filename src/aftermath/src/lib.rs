//! # aftermath
//!
//! World of Tanks Blitz asset extraction - turns a client data tree into
//! per-locale JSON catalogs.
//!
//! This library provides functionality to:
//! - Walk a data tree, decoding `.dvpl` containers on the fly
//! - Route each file to the extractors that claim it
//! - Build vehicle, map, battle type and version records in two passes
//! - Export sorted, locale-reduced JSON documents
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use aftermath::{Pipeline, PipelineOptions, ReferenceCatalog};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = ReferenceCatalog::load(Path::new("catalog.json"))?;
//! let pipeline = Pipeline::new(catalog, PipelineOptions::default());
//!
//! // Identity pass, then strings pass
//! pipeline.run(Path::new("Data"))?;
//! let summary = pipeline.export(Path::new("assets"))?;
//! println!("{} vehicles in {} locales", summary.vehicles, summary.locales);
//! # Ok(())
//! # }
//! ```

mod error;

pub mod battle_types;
pub mod dispatch;
pub mod export;
pub mod extractor;
pub mod locale;
pub mod maps;
pub mod nation;
pub mod pipeline;
pub mod reference;
pub mod strings;
pub mod table;
pub mod vehicles;
pub mod version;

#[doc(inline)]
pub use error::{Error, Failure, Result};

// Walking
#[doc(inline)]
pub use dispatch::{Dispatcher, WalkSummary};
#[doc(inline)]
pub use extractor::Extractor;
#[doc(inline)]
pub use pipeline::{Pipeline, PipelineOptions};

// Domains
#[doc(inline)]
pub use battle_types::BattleTypes;
#[doc(inline)]
pub use maps::{GameMap, Maps};
#[doc(inline)]
pub use vehicles::{Vehicle, Vehicles};
#[doc(inline)]
pub use version::{Version, VersionRecord};

#[doc(inline)]
pub use export::{ExportSummary, LocaleStrings};
#[doc(inline)]
pub use locale::Locale;
#[doc(inline)]
pub use nation::{global_id, nation_by_name, Nation, NATIONS};
#[doc(inline)]
pub use reference::{ReferenceCatalog, ReferenceEntry};
#[doc(inline)]
pub use table::Table;

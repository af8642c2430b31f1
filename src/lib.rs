//! catalogdash - Filter and summarize a streaming catalog
//!
//! catalogdash loads a CSV export of streaming-catalog metadata (one row per
//! title), fills in missing fields, and answers one question over and over:
//! *given these types, countries and genres, what does the catalog look
//! like?*
//!
//! # Pipeline
//!
//! 1. **Load & normalize** ([`Catalog::load`]): missing text fields get
//!    placeholders, `date_added` is parsed (or left unknown), and Movie
//!    durations are turned into minutes.
//! 2. **Filter** ([`FilterSelection`]): exact set membership on type,
//!    country and genre, combined with AND.
//! 3. **Aggregate** ([`DerivedTables`]): counts by type, top countries,
//!    counts by release year, a duration histogram and the longest movies.
//! 4. **Export** ([`report`]): the filtered rows as CSV, or the tables as
//!    JSON.
//!
//! Every step after loading is a pure function of the catalog and the
//! selection, so recomputing on each change of selection is the whole
//! interaction model.
//!
//! # Quick Start
//!
//! ```no_run
//! use catalogdash::{AggregateOptions, Catalog, DerivedTables, FilterSelection};
//!
//! let catalog = Catalog::load("titles.csv")?;
//! let selection = FilterSelection::all(&catalog).with_types(["Movie"]);
//! let view = catalog.filter(&selection);
//! let tables = DerivedTables::compute(&view, &AggregateOptions::new());
//!
//! for row in &tables.top_movies {
//!     println!("{:>4} min  {}", row.duration_minutes, row.title);
//! }
//! # Ok::<(), catalogdash::CatalogError>(())
//! ```
//!
//! # Modules
//!
//! - [`catalog`]: loading, normalization and distinct values
//! - [`filter`]: the three-dimension selection
//! - [`aggregate`]: derived tables
//! - [`report`]: CSV export and JSON output
//! - [`serve`]: HTTP endpoint for an interactive front end

pub mod aggregate;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod logging;
pub mod report;
pub mod serve;

pub use aggregate::{AggregateOptions, DerivedTables};
pub use catalog::{Catalog, Record};
pub use error::{CatalogError, Result};
pub use filter::{Dimension, FilterSelection};

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // PUBLIC API TESTS
    // ==========================================================================
    //
    // These tests verify the public API surface is reachable from the crate
    // root.
    // ==========================================================================

    #[test]
    fn test_public_exports() {
        let _ = AggregateOptions::new();
        let _ = FilterSelection::none();
        let _: Dimension = Dimension::Country;
    }

    #[test]
    fn test_pipeline_from_crate_root() {
        let catalog = Catalog::from_reader(catalog::testdata::SMALL.as_bytes()).unwrap();
        let selection = FilterSelection::all(&catalog);
        let view = catalog.filter(&selection);
        let tables = DerivedTables::compute(&view, &AggregateOptions::new());
        assert_eq!(tables.count_by_type.iter().map(|c| c.count).sum::<usize>(), catalog.len());
    }
}

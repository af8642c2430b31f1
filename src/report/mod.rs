//! Report generation for a filtered catalog view
//!
//! Two output formats, picked by file extension:
//!
//! - **JSON**: the derived tables plus a summary, for a presentation layer
//! - **CSV**: the filtered records themselves, in source column order
//!
//! # Usage
//!
//! ```ignore
//! use catalogdash::{report, AggregateOptions, Catalog, FilterSelection};
//!
//! let catalog = Catalog::load("titles.csv")?;
//! let selection = FilterSelection::all(&catalog).with_types(["Movie"]);
//!
//! report::generate("movies.json", &catalog, &selection, &AggregateOptions::new())?;
//! report::generate("movies.csv", &catalog, &selection, &AggregateOptions::new())?;
//! ```

pub mod export;
pub mod json;

use crate::aggregate::{AggregateOptions, DerivedTables};
use crate::catalog::{Catalog, Record};
use crate::error::Result;
use crate::filter::FilterSelection;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Generate a report in the appropriate format based on file extension
pub fn generate<P: AsRef<Path>>(
    path: P,
    catalog: &Catalog,
    selection: &FilterSelection,
    options: &AggregateOptions,
) -> Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = BufWriter::new(std::fs::File::create(path)?);

    match ext.as_str() {
        "json" => {
            let report = DashboardReport::build(catalog, selection, options);
            json::write(&mut file, &report)?;
        }
        _ => {
            let view = catalog.filter(selection);
            export::write(&mut file, catalog.headers(), &view)?;
        }
    }
    file.flush()?;

    info!(path = %path.display(), "report written");
    Ok(())
}

/// Headline numbers for a filtered view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Records in the raw catalog
    pub total: usize,
    /// Records passing the filter
    pub filtered: usize,
    pub movies: usize,
    /// Movies with a numeric duration
    pub timed_movies: usize,
}

impl Summary {
    pub fn from_view(total: usize, view: &[&Record]) -> Self {
        let mut summary = Self {
            total,
            filtered: view.len(),
            ..Self::default()
        };

        for r in view.iter().filter(|r| r.is_movie()) {
            summary.movies += 1;
            if r.duration_minutes.is_some() {
                summary.timed_movies += 1;
            }
        }

        summary
    }
}

/// Derived tables for one selection, as handed to a presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated: String,
    pub summary: Summary,
    pub selection: FilterSelection,
    pub tables: DerivedTables,
}

impl DashboardReport {
    pub fn build(catalog: &Catalog, selection: &FilterSelection, options: &AggregateOptions) -> Self {
        let view = catalog.filter(selection);
        Self {
            generated: chrono::Local::now().to_rfc3339(),
            summary: Summary::from_view(catalog.len(), &view),
            selection: selection.clone(),
            tables: DerivedTables::compute(&view, options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testdata;

    // ==========================================================================
    // SUMMARY STATISTICS TESTS
    // ==========================================================================

    #[test]
    fn test_summary_empty() {
        let summary = Summary::from_view(4, &[]);
        assert_eq!(
            summary,
            Summary {
                total: 4,
                ..Summary::default()
            }
        );
    }

    #[test]
    fn test_summary_small_catalog() {
        let catalog = testdata::small();
        let view = catalog.filter(&FilterSelection::all(&catalog));
        let summary = Summary::from_view(catalog.len(), &view);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.filtered, 4);
        assert_eq!(summary.movies, 3);
        assert_eq!(summary.timed_movies, 2);
    }

    // ==========================================================================
    // GENERATE TESTS
    // ==========================================================================
    //
    // The extension decides the format: .json gets the derived tables,
    // everything else gets the filtered rows.
    // ==========================================================================

    #[test]
    fn test_generate_json_by_extension() {
        let catalog = testdata::small();
        let selection = FilterSelection::all(&catalog).with_types(["Movie"]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.JSON");

        generate(&path, &catalog, &selection, &AggregateOptions::new()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["summary"]["filtered"], 3);
        assert_eq!(value["tables"]["count_by_type"][0]["type"], "Movie");
        assert_eq!(value["tables"]["top_movies"][0]["duration_minutes"], 120);
        assert_eq!(value["tables"]["top_movies"][0]["release_year"], 2015);
        assert_eq!(value["selection"]["types"], serde_json::json!(["Movie"]));
    }

    #[test]
    fn test_generate_csv_by_default() {
        let catalog = testdata::small();
        let selection = FilterSelection::all(&catalog).with_types(["TV Show"]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered.txt");

        generate(&path, &catalog, &selection, &AggregateOptions::new()).unwrap();

        let reloaded = Catalog::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.records()[0].title, "Some Show");
    }

    #[test]
    fn test_generate_into_missing_directory_fails() {
        let catalog = testdata::small();
        let selection = FilterSelection::all(&catalog);
        let err = generate(
            "/no/such/dir/report.csv",
            &catalog,
            &selection,
            &AggregateOptions::new(),
        )
        .unwrap_err();
        assert!(matches!(err, crate::error::CatalogError::Io(_)));
    }
}

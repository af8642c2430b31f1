//! Catalog loading and normalization
//!
//! A [`Catalog`] is the raw dataset read once from a delimited text file.
//! Loading applies the missing-value normalization every downstream step
//! relies on:
//!
//! | Column | Missing becomes |
//! |--------|-----------------|
//! | country, director, cast, duration | `"Unknown"` |
//! | rating | `"Not Rated"` |
//! | date_added | `None` (also when unparseable) |
//! | release_year | `None` (also when not an integer) |
//!
//! A cell is missing when it is empty or one of the usual NA spellings
//! (see [`fields::MISSING_SENTINELS`]).
//!
//! `duration_minutes` is derived here as well: it is set only for Movie
//! records whose duration text is a whole number of minutes.
//!
//! After loading, the catalog is never mutated. Filtering borrows records
//! out of it and every derived table is computed fresh from those borrows.

pub mod fields;

use crate::error::{CatalogError, Result};
use crate::filter::{Dimension, FilterSelection};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Columns the source must carry. Absence of any one is fatal.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "type",
    "country",
    "director",
    "cast",
    "rating",
    "duration",
    "date_added",
    "release_year",
    "title",
    "listed_in",
];

/// Format used when writing `date_added` back out
pub const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";

/// One catalog entry after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub title: String,
    pub kind: String,
    pub director: String,
    pub cast: String,
    pub country: String,
    pub date_added: Option<NaiveDate>,
    /// `None` when the cell is missing or not an integer
    pub release_year: Option<i32>,
    pub rating: String,
    pub duration: String,
    /// Genre label(s), compared as one whole string
    pub listed_in: String,
    /// Minutes, for Movie records with numeric duration only
    pub duration_minutes: Option<u32>,
    /// Cells outside the required columns as `(header index, text)`, in
    /// header order. Repeated header names each keep their own cell.
    pub extra: Vec<(usize, String)>,
}

impl Record {
    pub fn is_movie(&self) -> bool {
        self.kind == fields::MOVIE
    }

    /// Textual form of the cell at header position `index`, named `column`,
    /// as it should appear in an export.
    ///
    /// Positions carried in `extra` win over the name, so a repeated header
    /// such as a second `title` column writes its own cell. Columns the
    /// record does not carry render as empty.
    pub fn cell_text(&self, index: usize, column: &str) -> String {
        if let Some((_, text)) = self.extra.iter().find(|(i, _)| *i == index) {
            return text.clone();
        }
        match column {
            "title" => self.title.clone(),
            "type" => self.kind.clone(),
            "director" => self.director.clone(),
            "cast" => self.cast.clone(),
            "country" => self.country.clone(),
            "date_added" => self
                .date_added
                .map(|d| d.format(DATE_OUTPUT_FORMAT).to_string())
                .unwrap_or_default(),
            "release_year" => self
                .release_year
                .map(|y| y.to_string())
                .unwrap_or_default(),
            "rating" => self.rating.clone(),
            "duration" => self.duration.clone(),
            "listed_in" => self.listed_in.clone(),
            _ => String::new(),
        }
    }
}

/// Header positions of the required columns
struct ColumnIndex {
    title: usize,
    kind: usize,
    director: usize,
    cast: usize,
    country: usize,
    date_added: usize,
    release_year: usize,
    rating: usize,
    duration: usize,
    listed_in: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| CatalogError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            title: find("title")?,
            kind: find("type")?,
            director: find("director")?,
            cast: find("cast")?,
            country: find("country")?,
            date_added: find("date_added")?,
            release_year: find("release_year")?,
            rating: find("rating")?,
            duration: find("duration")?,
            listed_in: find("listed_in")?,
        })
    }
}

/// How many cells were coerced during a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub placeholders: usize,
    pub unparsed_dates: usize,
    pub unparsed_years: usize,
}

/// The immutable raw dataset
#[derive(Debug, Clone)]
pub struct Catalog {
    headers: Vec<String>,
    records: Vec<Record>,
    stats: LoadStats,
}

impl Catalog {
    /// Load a catalog from a CSV file on disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let catalog = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            records = catalog.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Load a catalog from any reader producing CSV with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let columns = ColumnIndex::resolve(&headers)?;

        let mut stats = LoadStats::default();
        let mut records = Vec::new();

        for row in reader.records() {
            let row = row?;
            records.push(normalize_row(&row, &headers, &columns, &mut stats));
        }

        debug!(
            placeholders = stats.placeholders,
            unparsed_dates = stats.unparsed_dates,
            unparsed_years = stats.unparsed_years,
            "normalized catalog fields"
        );

        Ok(Self {
            headers,
            records,
            stats,
        })
    }

    /// Column names in source order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// Distinct values of one dimension, in order of first appearance.
    pub fn distinct(&self, dimension: Dimension) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for record in &self.records {
            let value = dimension.value(record);
            if seen.insert(value) {
                values.push(value.to_string());
            }
        }
        values
    }

    /// Records accepted by `selection`, in source order.
    pub fn filter(&self, selection: &FilterSelection) -> Vec<&Record> {
        selection.apply(&self.records)
    }
}

fn normalize_row(
    row: &csv::StringRecord,
    headers: &[String],
    columns: &ColumnIndex,
    stats: &mut LoadStats,
) -> Record {
    let cell = |idx: usize| row.get(idx).unwrap_or("");

    let mut fill = |idx: usize, placeholder: &str| {
        let (value, filled) = fields::fill_missing(cell(idx), placeholder);
        if filled {
            stats.placeholders += 1;
        }
        value
    };

    let country = fill(columns.country, fields::UNKNOWN);
    let director = fill(columns.director, fields::UNKNOWN);
    let cast = fill(columns.cast, fields::UNKNOWN);
    let rating = fill(columns.rating, fields::NOT_RATED);
    let duration = fill(columns.duration, fields::UNKNOWN);

    let date_added = fields::parse_date_added(cell(columns.date_added));
    if date_added.is_none() {
        stats.unparsed_dates += 1;
    }

    let release_year = fields::parse_release_year(cell(columns.release_year));
    if release_year.is_none() {
        stats.unparsed_years += 1;
    }

    let kind = cell(columns.kind).to_string();
    let duration_minutes = fields::duration_minutes_for(&kind, &duration);

    let known = [
        columns.title,
        columns.kind,
        columns.director,
        columns.cast,
        columns.country,
        columns.date_added,
        columns.release_year,
        columns.rating,
        columns.duration,
        columns.listed_in,
    ];
    let extra = (0..headers.len())
        .filter(|idx| !known.contains(idx))
        .map(|idx| (idx, cell(idx).to_string()))
        .collect();

    Record {
        title: cell(columns.title).to_string(),
        kind,
        director,
        cast,
        country,
        date_added,
        release_year,
        rating,
        duration,
        listed_in: cell(columns.listed_in).to_string(),
        duration_minutes,
        extra,
    }
}

//! Derived tables computed from a filtered view
//!
//! Every function here takes the filtered records as `&[&Record]` and
//! returns a fresh table. Nothing is cached, so calling any of them twice
//! with the same view gives identical output.
//!
//! Counting follows one rule throughout: values are counted in order of
//! first appearance and then stable-sorted by count, descending. Ties keep
//! their first-appearance order.

use crate::catalog::Record;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

const DEFAULT_TOP_COUNTRIES: usize = 10;
const DEFAULT_TOP_MOVIES: usize = 10;
const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Upper bound on histogram buckets; larger requests are clamped
pub const MAX_HISTOGRAM_BINS: usize = 1000;

/// Size limits for the derived tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateOptions {
    pub top_countries: usize,
    pub top_movies: usize,
    pub histogram_bins: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            top_countries: DEFAULT_TOP_COUNTRIES,
            top_movies: DEFAULT_TOP_MOVIES,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl AggregateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both top-N limits at once
    pub fn with_top(mut self, n: usize) -> Self {
        self.top_countries = n;
        self.top_movies = n;
        self
    }

    pub fn with_top_countries(mut self, n: usize) -> Self {
        self.top_countries = n;
        self
    }

    pub fn with_top_movies(mut self, n: usize) -> Self {
        self.top_movies = n;
        self
    }

    /// Clamped to `1..=MAX_HISTOGRAM_BINS`.
    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins.clamp(1, MAX_HISTOGRAM_BINS);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCount {
    pub country: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// One equal-width histogram bucket, `[start, end)`; the last is closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DurationHistogram {
    /// Movie durations in minutes, in view order
    pub values: Vec<u32>,
    pub bins: Vec<HistogramBin>,
}

/// Row of the longest-movies table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongMovie {
    pub title: String,
    pub duration: String,
    pub duration_minutes: u32,
    pub release_year: Option<i32>,
    pub country: String,
    pub rating: String,
}

/// Everything the presentation layer needs for one filter selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedTables {
    pub count_by_type: Vec<TypeCount>,
    pub top_countries: Vec<CountryCount>,
    pub count_by_year: Vec<YearCount>,
    pub duration_histogram: DurationHistogram,
    pub top_movies: Vec<LongMovie>,
}

impl DerivedTables {
    pub fn compute(records: &[&Record], options: &AggregateOptions) -> Self {
        Self {
            count_by_type: count_by_type(records),
            top_countries: top_countries(records, options.top_countries),
            count_by_year: count_by_year(records),
            duration_histogram: duration_histogram(records, options.histogram_bins),
            top_movies: top_longest_movies(records, options.top_movies),
        }
    }
}

/// Count occurrences in first-appearance order, then stable-sort descending.
fn value_counts<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Copy,
    I: IntoIterator<Item = K>,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for key in keys {
        match slots.get(&key) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(key, counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Titles per type. Counts sum to `records.len()`.
pub fn count_by_type(records: &[&Record]) -> Vec<TypeCount> {
    value_counts(records.iter().map(|r| r.kind.as_str()))
        .into_iter()
        .map(|(kind, count)| TypeCount {
            kind: kind.to_string(),
            count,
        })
        .collect()
}

/// The `n` most frequent countries, descending by count.
pub fn top_countries(records: &[&Record], n: usize) -> Vec<CountryCount> {
    value_counts(records.iter().map(|r| r.country.as_str()))
        .into_iter()
        .take(n)
        .map(|(country, count)| CountryCount {
            country: country.to_string(),
            count,
        })
        .collect()
}

/// Titles per release year, ascending by year. Records without a year
/// are left out.
pub fn count_by_year(records: &[&Record]) -> Vec<YearCount> {
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    for year in records.iter().filter_map(|r| r.release_year) {
        *years.entry(year).or_insert(0) += 1;
    }
    years
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Durations of the Movie records that have one, in view order.
pub fn movie_durations(records: &[&Record]) -> Vec<u32> {
    records
        .iter()
        .filter(|r| r.is_movie())
        .filter_map(|r| r.duration_minutes)
        .collect()
}

/// Equal-width histogram of movie durations over their observed range.
///
/// `bins` is clamped to `1..=MAX_HISTOGRAM_BINS`.
pub fn duration_histogram(records: &[&Record], bins: usize) -> DurationHistogram {
    let values = movie_durations(records);
    let (min, max) = match (values.iter().min(), values.iter().max()) {
        (Some(&min), Some(&max)) => (min as f64, max as f64),
        _ => return DurationHistogram::default(),
    };

    // A single distinct value still gets a bucket of non-zero width
    let (bins, width) = if max > min {
        let bins = bins.clamp(1, MAX_HISTOGRAM_BINS);
        (bins, (max - min) / bins as f64)
    } else {
        (1, 1.0)
    };

    let mut counts = vec![0usize; bins];
    for &v in &values {
        let idx = ((v as f64 - min) / width).floor() as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count,
        })
        .collect();

    DurationHistogram { values, bins }
}

/// The `n` longest movies, descending by minutes. Movies without a
/// numeric duration are left out.
pub fn top_longest_movies(records: &[&Record], n: usize) -> Vec<LongMovie> {
    let mut movies: Vec<(&Record, u32)> = records
        .iter()
        .filter(|r| r.is_movie())
        .filter_map(|r| r.duration_minutes.map(|m| (*r, m)))
        .collect();

    movies.sort_by(|a, b| b.1.cmp(&a.1));

    movies
        .into_iter()
        .take(n)
        .map(|(r, minutes)| LongMovie {
            title: r.title.clone(),
            duration: r.duration.clone(),
            duration_minutes: minutes,
            release_year: r.release_year,
            country: r.country.clone(),
            rating: r.rating.clone(),
        })
        .collect()
}

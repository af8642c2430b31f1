//! Set-membership filtering over the categorical dimensions
//!
//! A record passes when its type, country and genre are each members of the
//! matching accepted set (AND across dimensions). Two behaviours to be aware of:
//!
//! - An empty accepted set rejects everything, so selecting no countries
//!   yields no records rather than all of them.
//! - Values are compared as whole strings. A record whose country is
//!   `"India, United States"` does not match a selection of `"India"`.
//! - User input goes through [`FilterSelection::restrict`], which treats an
//!   empty string as "select nothing". A dimension value that really is
//!   `""` (a blank `listed_in`, say) is therefore only reachable through
//!   [`FilterSelection::all`] or [`FilterSelection::with`].

use crate::catalog::{Catalog, Record};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// A categorical column that can be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Type,
    Country,
    Genre,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Type, Dimension::Country, Dimension::Genre];

    /// The record's value for this dimension
    pub fn value<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            Dimension::Type => &record.kind,
            Dimension::Country => &record.country,
            Dimension::Genre => &record.listed_in,
        }
    }

    /// Source column backing this dimension
    pub fn column(&self) -> &'static str {
        match self {
            Dimension::Type => "type",
            Dimension::Country => "country",
            Dimension::Genre => "listed_in",
        }
    }

    /// Parse a query/CLI key. Accepts the column name for genre too.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "type" => Some(Dimension::Type),
            "country" => Some(Dimension::Country),
            "genre" | "listed_in" => Some(Dimension::Genre),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Type => write!(f, "type"),
            Dimension::Country => write!(f, "country"),
            Dimension::Genre => write!(f, "genre"),
        }
    }
}

/// Accepted values for each dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub types: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    pub genres: BTreeSet<String>,
}

impl FilterSelection {
    /// Accept every value present in the catalog. This is the default view.
    pub fn all(catalog: &Catalog) -> Self {
        let mut selection = Self::default();
        for dimension in Dimension::ALL {
            *selection.accepted_mut(dimension) = catalog.distinct(dimension).into_iter().collect();
        }
        selection
    }

    /// Accept nothing on any dimension
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with<I, S>(mut self, dimension: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.accepted_mut(dimension) = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_types<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(Dimension::Type, values)
    }

    pub fn with_countries<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(Dimension::Country, values)
    }

    pub fn with_genres<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(Dimension::Genre, values)
    }

    /// Apply user input for one dimension.
    ///
    /// `None` leaves the current set alone. `Some` replaces it, dropping
    /// empty strings, so `Some(vec![""])` is how a caller asks for the
    /// empty set. The flip side: a record whose value is `""` cannot be
    /// selected here; use [`FilterSelection::with`] for that.
    pub fn restrict(self, dimension: Dimension, values: Option<Vec<String>>) -> Self {
        match values {
            None => self,
            Some(values) => self.with(dimension, values.into_iter().filter(|v| !v.is_empty())),
        }
    }

    pub fn accepted(&self, dimension: Dimension) -> &BTreeSet<String> {
        match dimension {
            Dimension::Type => &self.types,
            Dimension::Country => &self.countries,
            Dimension::Genre => &self.genres,
        }
    }

    fn accepted_mut(&mut self, dimension: Dimension) -> &mut BTreeSet<String> {
        match dimension {
            Dimension::Type => &mut self.types,
            Dimension::Country => &mut self.countries,
            Dimension::Genre => &mut self.genres,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        Dimension::ALL
            .iter()
            .all(|d| self.accepted(*d).contains(d.value(record)))
    }

    /// Borrow the accepted records, keeping their source order.
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

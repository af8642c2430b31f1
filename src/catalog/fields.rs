//! Per-field coercions applied while loading a catalog
//!
//! None of these functions can fail. A value that cannot be interpreted is
//! either replaced with a placeholder (text columns) or becomes `None`
//! (date-added, release-year, duration-minutes). A bad cell never rejects its record.

use chrono::NaiveDate;

/// Placeholder for missing country, director, cast and duration
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for a missing rating
pub const NOT_RATED: &str = "Not Rated";

/// Record type whose duration is measured in minutes
pub const MOVIE: &str = "Movie";

/// Cell texts read as missing, matched exactly (no trimming, case-sensitive).
///
/// This is the NA list common CSV tooling uses by default, so a source that
/// spells a gap as `NA` or `null` gets the same placeholder as an empty cell.
pub const MISSING_SENTINELS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Date formats accepted for `date_added`, tried in order.
///
/// The first is the catalog's native form ("September 25, 2021"), the
/// others cover what the export writes back and common ISO variants.
const DATE_FORMATS: &[&str] = &["%B %d, %Y", "%Y-%m-%d", "%b %d, %Y", "%d %B %Y"];

pub fn is_missing(raw: &str) -> bool {
    MISSING_SENTINELS.contains(&raw)
}

/// Replace a missing cell with `placeholder`.
///
/// Returns `true` alongside the value when the placeholder was used, so the
/// loader can count coercions.
pub fn fill_missing(raw: &str, placeholder: &str) -> (String, bool) {
    if is_missing(raw) {
        (placeholder.to_string(), true)
    } else {
        (raw.to_string(), false)
    }
}

/// Parse a `date_added` cell.
///
/// Surrounding whitespace is ignored (the source has values like
/// " August 4, 2017"). Anything unparseable is `None`.
pub fn parse_date_added(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Parse a `release_year` cell. Missing or non-integer text is `None`.
pub fn parse_release_year(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok()
}

/// Minutes for a Movie's duration text.
///
/// `"90 min"` gives 90. Text that is not a whole number once the
/// `" min"` unit is removed gives `None` rather than zero, so
/// `"Unknown"` and `"2 Seasons"` drop out of duration statistics.
pub fn parse_duration_minutes(duration: &str) -> Option<u32> {
    let number = duration.strip_suffix(" min").unwrap_or(duration);
    number.trim().parse::<u32>().ok()
}

/// Duration in minutes, defined only for Movie records.
pub fn duration_minutes_for(kind: &str, duration: &str) -> Option<u32> {
    if kind == MOVIE {
        parse_duration_minutes(duration)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // PLACEHOLDER TESTS
    // ==========================================================================

    #[test]
    fn test_fill_missing_empty_cell() {
        assert_eq!(fill_missing("", UNKNOWN), ("Unknown".to_string(), true));
        assert_eq!(fill_missing("", NOT_RATED), ("Not Rated".to_string(), true));
    }

    #[test]
    fn test_fill_missing_keeps_present_value() {
        assert_eq!(fill_missing("India", UNKNOWN), ("India".to_string(), false));
    }

    #[test]
    fn test_fill_missing_na_spellings() {
        for raw in ["NA", "N/A", "n/a", "NaN", "null", "NULL", "None", "<NA>", "#N/A"] {
            assert_eq!(fill_missing(raw, UNKNOWN), ("Unknown".to_string(), true), "{}", raw);
        }
    }

    #[test]
    fn test_fill_missing_whitespace_is_a_value() {
        // Sentinels match exactly
        assert_eq!(fill_missing(" ", UNKNOWN), (" ".to_string(), false));
        assert_eq!(fill_missing(" NA", UNKNOWN), (" NA".to_string(), false));
        assert_eq!(fill_missing("Nancy", UNKNOWN), ("Nancy".to_string(), false));
    }

    // ==========================================================================
    // RELEASE-YEAR TESTS
    // ==========================================================================

    #[test]
    fn test_parse_release_year() {
        assert_eq!(parse_release_year("2020"), Some(2020));
        assert_eq!(parse_release_year(" 1999 "), Some(1999));
        assert_eq!(parse_release_year(""), None);
        assert_eq!(parse_release_year("NA"), None);
        assert_eq!(parse_release_year("soon"), None);
    }

    // ==========================================================================
    // DATE-ADDED TESTS
    // ==========================================================================

    #[test]
    fn test_parse_date_native_format() {
        assert_eq!(
            parse_date_added("September 25, 2021"),
            NaiveDate::from_ymd_opt(2021, 9, 25)
        );
    }

    #[test]
    fn test_parse_date_leading_space() {
        assert_eq!(
            parse_date_added(" August 4, 2017"),
            NaiveDate::from_ymd_opt(2017, 8, 4)
        );
    }

    #[test]
    fn test_parse_date_iso() {
        assert_eq!(parse_date_added("2019-01-01"), NaiveDate::from_ymd_opt(2019, 1, 1));
    }

    #[test]
    fn test_parse_date_garbage_is_none() {
        assert_eq!(parse_date_added("sometime in spring"), None);
        assert_eq!(parse_date_added(""), None);
        assert_eq!(parse_date_added("February 30, 2020"), None);
    }

    // ==========================================================================
    // DURATION TESTS
    // ==========================================================================

    #[test]
    fn test_duration_minutes() {
        assert_eq!(parse_duration_minutes("90 min"), Some(90));
        assert_eq!(parse_duration_minutes("312 min"), Some(312));
    }

    #[test]
    fn test_duration_non_numeric_is_absent_not_zero() {
        assert_eq!(parse_duration_minutes("Unknown"), None);
        assert_eq!(parse_duration_minutes("3 Seasons"), None);
        assert_eq!(parse_duration_minutes(""), None);
    }

    #[test]
    fn test_duration_only_for_movies() {
        assert_eq!(duration_minutes_for("Movie", "90 min"), Some(90));
        assert_eq!(duration_minutes_for("TV Show", "90 min"), None);
        assert_eq!(duration_minutes_for("TV Show", "2 Seasons"), None);
    }
}

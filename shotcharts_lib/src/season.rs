//! Season label helpers ("2024-25" style).

use chrono::{Datelike, NaiveDate};

use crate::error::{Result, ShotChartsError};

/// The month a new season's label takes effect. The league tips off in
/// October; before that, dates belong to the previous label.
const SEASON_ROLLOVER_MONTH: u32 = 10;

/// Label of the season in progress (or most recently started) on `date`.
pub fn season_label_for(date: NaiveDate) -> String {
    let start_year = if date.month() >= SEASON_ROLLOVER_MONTH {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{}-{:02}", start_year, (start_year + 1).rem_euclid(100))
}

/// Label of the current season.
pub fn current_season_label() -> String {
    season_label_for(chrono::Local::now().date_naive())
}

/// Validates a "YYYY-YY" season label, including that the short year
/// follows the full year.
pub fn validate_season_label(label: &str) -> Result<()> {
    let invalid = || {
        ShotChartsError::InvalidInput(format!(
            "invalid season label '{label}', expected e.g. \"2024-25\""
        ))
    };
    let (start, end) = label.split_once('-').ok_or_else(invalid)?;
    if start.len() != 4 || end.len() != 2 {
        return Err(invalid());
    }
    let start: i32 = start.parse().map_err(|_| invalid())?;
    let end: i32 = end.parse().map_err(|_| invalid())?;
    if (start + 1).rem_euclid(100) != end {
        return Err(invalid());
    }
    Ok(())
}

use chrono::NaiveDate;

use crate::error::AppError;

/// Parse a CLI date (YYYYMMDD or YYYY-MM-DD)
pub fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    if s.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Ok(d);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| AppError::InvalidDate {
        input: s.to_string(),
    })
}

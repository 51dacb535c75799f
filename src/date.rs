//! Formats content publication timestamps for display. Every page on the site
//! shows dates as `dd MMM yyyy` with Brazilian-Portuguese month abbreviations
//! (e.g., `19 Abr 2021`).

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use std::fmt;

const MONTHS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov",
    "Dez",
];

/// Formats an optional publication timestamp. A missing timestamp yields
/// `None` (the page renders no date); an unparseable one yields a
/// [`FormatError`].
pub fn format_publication_date(
    timestamp: Option<&str>,
) -> Result<Option<String>, FormatError> {
    match timestamp {
        None => Ok(None),
        Some(timestamp) => format_date(timestamp).map(Some),
    }
}

/// Formats a single timestamp as `dd MMM yyyy`. The date is taken in UTC.
pub fn format_date(timestamp: &str) -> Result<String, FormatError> {
    let date = parse(timestamp)?;
    Ok(format!(
        "{:02} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    ))
}

fn parse(timestamp: &str) -> Result<DateTime<Utc>, FormatError> {
    // The content API emits `+0000` offsets, which RFC 3339 rejects.
    let parsed = DateTime::parse_from_rfc3339(timestamp).or_else(|_| {
        DateTime::<FixedOffset>::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f%z")
    });
    match parsed {
        Ok(date) => Ok(date.with_timezone(&Utc)),
        Err(err) => match NaiveDate::parse_from_str(timestamp, "%Y-%m-%d") {
            Ok(date) => Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))),
            Err(_) => Err(FormatError {
                input: timestamp.to_owned(),
                err,
            }),
        },
    }
}

/// Returned when a publication timestamp can't be parsed.
#[derive(Debug)]
pub struct FormatError {
    /// The offending timestamp.
    pub input: String,

    err: chrono::ParseError,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid publication date `{}`: {}", self.input, self.err)
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.err)
    }
}

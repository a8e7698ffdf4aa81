use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveTime};
use regex::{Captures, Regex};

use crate::parser::error::ParseError;
use crate::parser::model::SessionMetadata;
use crate::parser::segments::{BEGIN_RE, END_RE};

static SESSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^[ \t]*(\d+)\.[ \t]*Sitzung[ \t]*$").unwrap());
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^[ \t]*Berlin,[ \t]+\w+,[ \t]+den[ \t]+(\d{1,2})\.[ \t]*(\S+)[ \t]+(\d{4})[ \t]*$")
        .unwrap()
});
static PROTOCOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^[ \t]*Plenarprotokoll[ \t]*(\d+)/(\d+)[ \t]*$").unwrap());

/// Transcripts are always German, whatever the runtime locale says.
static MONTHS: LazyLock<HashMap<&'static str, u32>> = LazyLock::new(|| {
    [
        "Januar", "Februar", "März", "April", "Mai", "Juni",
        "Juli", "August", "September", "Oktober", "November", "Dezember",
    ]
    .into_iter()
    .zip(1..)
    .collect()
});

pub fn month_number(name: &str) -> Option<u32> {
    MONTHS.get(name).copied()
}

/// Session number, date and times. Session and date must each be unambiguous.
pub fn extract(preamble: &str, postamble: &str) -> Result<SessionMetadata, ParseError> {
    let session = unique_value(&SESSION_RE, preamble, "session number", |c| c[1].to_string())?;
    let session = session
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| missing(format!("invalid session number {:?}", session)))?;

    let (day, month, year) = unique_value(&DATE_RE, preamble, "session date", |c| {
        (c[1].to_string(), c[2].to_string(), c[3].to_string())
    })?;
    let month_num =
        month_number(&month).ok_or_else(|| missing(format!("unknown month name {:?}", month)))?;
    let date = day
        .parse::<u32>()
        .ok()
        .zip(year.parse::<i32>().ok())
        .and_then(|(d, y)| NaiveDate::from_ymd_opt(y, month_num, d))
        .ok_or_else(|| missing(format!("invalid date {}. {} {}", day, month, year)))?;

    let start_time = anchor_time(&BEGIN_RE, preamble, "start time")?;
    let end_time = anchor_time(&END_RE, postamble, "end time")?;
    let start = date.and_time(start_time);
    let mut end = date.and_time(end_time);
    // Sessions running past midnight
    if end <= start {
        end += Duration::days(1);
    }

    let electoral_period = PROTOCOL_RE
        .captures(preamble)
        .and_then(|c| c[1].parse::<u32>().ok())
        .filter(|ep| *ep > 0);

    Ok(SessionMetadata {
        session,
        electoral_period,
        date,
        start,
        end,
    })
}

/// The single value `re` yields in `text`. Lines repeating the same value
/// count once; two different values are ambiguous.
fn unique_value<T, F>(re: &Regex, text: &str, what: &str, f: F) -> Result<T, ParseError>
where
    T: PartialEq,
    F: Fn(&Captures<'_>) -> T,
{
    let mut values: Vec<T> = Vec::new();
    for caps in re.captures_iter(text) {
        let v = f(&caps);
        if !values.contains(&v) {
            values.push(v);
        }
    }
    match values.len() {
        0 => Err(missing(format!("no {} found", what))),
        1 => Ok(values.remove(0)),
        n => Err(missing(format!("{} distinct {} lines", n, what))),
    }
}

fn anchor_time(re: &Regex, text: &str, what: &str) -> Result<NaiveTime, ParseError> {
    let caps = re
        .captures(text)
        .ok_or_else(|| missing(format!("no {} found", what)))?;
    caps[1]
        .parse::<u32>()
        .ok()
        .zip(caps[2].parse::<u32>().ok())
        .and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0))
        .ok_or_else(|| missing(format!("invalid {} {}:{}", what, &caps[1], &caps[2])))
}

fn missing(msg: String) -> ParseError {
    ParseError::MetadataNotFound(msg)
}

// ── Tests ──

//! TIMEX-style temporal expressions.
//!
//! A TIMEX string encodes a possibly partial date, time, or date range:
//! `2024-08-10`, `2024-08` (no day), `XXXX-08-10` (no year),
//! `(2024-08-10,2024-08-17,P7D)` (a range with a duration). The dialog layer
//! only cares about one question: is the expression *definite*, i.e. fully
//! resolved to a calendar date with year, month, and day all present.

use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResolutionType {
    Date,
    DateRange,
    Time,
    DateTime,
    Duration,
    Definite,
}

impl ResolutionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::DateRange => "daterange",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::Duration => "duration",
            Self::Definite => "definite",
        }
    }
}

/// An immutable view over one candidate TIMEX string. Constructed fresh per
/// candidate, never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemporalExpression {
    raw: String,
    resolution_types: BTreeSet<ResolutionType>,
}

impl TemporalExpression {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        Self { raw: trimmed.to_string(), resolution_types: classify(trimmed) }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn resolution_types(&self) -> &BTreeSet<ResolutionType> {
        &self.resolution_types
    }

    pub fn is_definite(&self) -> bool {
        self.resolution_types.contains(&ResolutionType::Definite)
    }

    /// The portion before the date/time separator (`T`).
    pub fn date_portion(&self) -> &str {
        date_portion(&self.raw)
    }
}

/// The sole gate deciding whether a date slot needs disambiguation: true iff
/// the candidate is absent/empty or its resolution types exclude `definite`.
pub fn is_ambiguous(candidate: Option<&str>) -> bool {
    match candidate {
        Some(raw) if !raw.trim().is_empty() => !TemporalExpression::parse(raw).is_definite(),
        _ => true,
    }
}

pub fn date_portion(timex: &str) -> &str {
    timex.split('T').next().unwrap_or_default()
}

fn classify(timex: &str) -> BTreeSet<ResolutionType> {
    let mut types = BTreeSet::new();
    if timex.is_empty() {
        return types;
    }

    if timex.starts_with('(') && timex.ends_with(')') {
        types.insert(ResolutionType::DateRange);
        if timex.split(',').nth(2).is_some_and(|part| part.trim_end_matches(')').starts_with('P')) {
            types.insert(ResolutionType::Duration);
        }
        return types;
    }

    if timex.starts_with('P') {
        types.insert(ResolutionType::Duration);
        return types;
    }

    let (date_part, time_part) = match timex.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (timex, None),
    };

    if !date_part.is_empty() {
        classify_date(date_part, &mut types);
    }

    if let Some(time) = time_part {
        if !time.is_empty() {
            types.insert(ResolutionType::Time);
            if !date_part.is_empty() {
                types.insert(ResolutionType::DateTime);
            }
        }
    }

    types
}

fn classify_date(date_part: &str, types: &mut BTreeSet<ResolutionType>) {
    let segments: Vec<&str> = date_part.split('-').collect();
    match segments.as_slice() {
        [year, month, day] => {
            if month.starts_with('W') {
                // Week-of-year plus day-of-week, e.g. XXXX-WXX-6: a known
                // weekday but not an anchored calendar date.
                types.insert(ResolutionType::Date);
            } else if is_numeric(month) && is_numeric(day) {
                types.insert(ResolutionType::Date);
                if is_numeric(year) {
                    types.insert(ResolutionType::Definite);
                }
            } else {
                types.insert(ResolutionType::DateRange);
            }
        }
        // Year-month, year-week, or a bare year all denote ranges of dates.
        [_, _] | [_] => {
            types.insert(ResolutionType::DateRange);
        }
        _ => {}
    }
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|byte| byte.is_ascii_digit())
}

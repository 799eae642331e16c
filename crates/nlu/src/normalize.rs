//! Maps a raw recognizer result onto a `BookingRequest`.
//!
//! Every lookup tolerates missing keys, empty lists, and type mismatches by
//! treating them as "value not determined". Nothing in here can fail a turn.

use serde_json::Value;

use wayfare_core::timex::date_portion;
use wayfare_core::BookingRequest;

use crate::intent::Intent;
use crate::recognizer::RecognizerResult;

// Byte offsets of the two endpoints inside a range TIMEX such as
// `(2024-08-10,2024-08-17,P7D)`, taken over the date-only portion.
const RANGE_START: (usize, usize) = (1, 11);
const RANGE_END: (usize, usize) = (12, 22);

/// Produces a seeded `BookingRequest` only for the `BookFlight` intent; any
/// other intent returns `(intent, None)` untouched.
pub fn normalize(result: &RecognizerResult) -> (Intent, Option<BookingRequest>) {
    let intent = Intent::from_label(&result.top_intent);
    if intent != Intent::BookFlight {
        return (intent, None);
    }

    let entities = &result.entities;
    let mut request = BookingRequest::default();

    apply_location(entities, "To", &mut request.destination, &mut request.unsupported_locations);
    apply_location(entities, "From", &mut request.origin, &mut request.unsupported_locations);
    request.budget = budget(entities);
    request.departure_date = departure_date(entities);
    request.return_date = return_date(entities);

    (intent, Some(request))
}

/// A recognized span either fills the slot (when the model resolved it to a
/// known geography) or lands in `unsupported_locations` — never both.
fn apply_location(
    entities: &Value,
    name: &str,
    slot: &mut Option<String>,
    unsupported: &mut Vec<String>,
) {
    let Some(text) = raw_span(entities, name) else {
        return;
    };
    let text = capitalize(&text);
    if has_resolution(entities, name) {
        *slot = Some(text);
    } else {
        unsupported.push(text);
    }
}

/// The raw-text span lives under the reserved `"$instance"` key.
fn raw_span(entities: &Value, name: &str) -> Option<String> {
    entities
        .get("$instance")?
        .get(name)?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::to_string)
}

/// A location resolved to a known geography carries a non-empty `$instance`
/// object on its first occurrence; a bare free-text match does not.
fn has_resolution(entities: &Value, name: &str) -> bool {
    entities
        .get(name)
        .and_then(|occurrences| occurrences.get(0))
        .and_then(|first| first.get("$instance"))
        .and_then(Value::as_object)
        .is_some_and(|instance| !instance.is_empty())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Prefer a typed money entity (`number` + `units`); fall back to the raw
/// text of a domain-specific `budget` entity. Neither present is not an
/// error — the controller will prompt.
fn budget(entities: &Value) -> Option<String> {
    if let Some(first) = entities.get("money").and_then(|occurrences| occurrences.get(0)) {
        let number = first.get("number").filter(|value| value.is_number());
        let units = first.get("units").and_then(Value::as_str);
        if let (Some(number), Some(units)) = (number, units) {
            return Some(format!("{number} {units}"));
        }
    }

    entities
        .get("budget")
        .and_then(|occurrences| occurrences.get(0))
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| raw_span(entities, "budget"))
}

/// `(entity type, first TIMEX)` per occurrence of the date/time entity.
fn datetime_entities(entities: &Value) -> Vec<(&str, Option<&str>)> {
    entities
        .get("datetime")
        .and_then(Value::as_array)
        .map(|occurrences| {
            occurrences
                .iter()
                .map(|occurrence| {
                    (
                        occurrence.get("type").and_then(Value::as_str).unwrap_or_default(),
                        occurrence
                            .get("timex")
                            .and_then(|timex| timex.get(0))
                            .and_then(Value::as_str),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

fn departure_date(entities: &Value) -> Option<String> {
    match datetime_entities(entities).as_slice() {
        [("date", Some(timex))] => Some(date_portion(timex).to_string()),
        [("daterange", Some(timex))] => range_endpoint(timex, RANGE_START),
        // Two entities: the first-positioned one is taken as the departure.
        // List order is whatever the extractor returned, not guaranteed
        // chronological — a known approximation, not a correctness claim.
        [(_, Some(timex)), _] => Some(date_portion(timex).to_string()),
        _ => None,
    }
}

/// Sourced independently of the departure side: a dedicated `Return_date`
/// entity, the second endpoint of a range, or the second of two date
/// entities. Never the occurrence the departure already consumed.
fn return_date(entities: &Value) -> Option<String> {
    let dedicated = entities
        .get("Return_date")
        .and_then(|occurrences| occurrences.get(0))
        .and_then(|first| first.get("timex"))
        .and_then(|timex| timex.get(0))
        .and_then(Value::as_str);
    if let Some(timex) = dedicated {
        return Some(date_portion(timex).to_string());
    }

    match datetime_entities(entities).as_slice() {
        [("daterange", Some(timex))] => range_endpoint(timex, RANGE_END),
        [_, (_, Some(timex))] => Some(date_portion(timex).to_string()),
        _ => None,
    }
}

fn range_endpoint(timex: &str, (start, end): (usize, usize)) -> Option<String> {
    date_portion(timex).get(start..end).map(str::to_string)
}

//! Client-side filters over the backend's popularity-sorted lists, and the
//! parsing of the raw values users type into them.
//!
//! A parse returning `None` means the input is malformed and the action is
//! dropped without a message.

use chrono::NaiveDate;

use crate::models::{Person, Work};

pub trait Popularity {
    fn popularity(&self) -> f64;
}

impl Popularity for Work {
    fn popularity(&self) -> f64 {
        Work::popularity(self)
    }
}

impl Popularity for Person {
    fn popularity(&self) -> f64 {
        Person::popularity(self)
    }
}

/// Non-blank text, trimmed.
pub fn parse_text(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_number(input: Option<&str>) -> Option<f64> {
    parse_text(input)?
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

pub fn parse_id(input: Option<&str>) -> Option<i64> {
    let n = parse_number(input)?;
    if n.fract() != 0.0 || n < 0.0 || n > i64::MAX as f64 {
        return None;
    }
    Some(n as i64)
}

/// Accepts only the `YYYY-MM-DD` shape, and only real calendar dates.
pub fn parse_cutoff(input: Option<&str>) -> Option<NaiveDate> {
    let raw = parse_text(input)?;
    let shape_ok = raw.len() == 10
        && raw.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

pub fn parse_language_code(input: Option<&str>) -> Option<String> {
    let raw = parse_text(input)?;
    if raw.len() > 3 || !raw.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(raw.to_ascii_lowercase())
}

/// Keeps items strictly more popular than `threshold`, order preserved.
pub fn above_popularity<T: Popularity>(items: Vec<T>, threshold: f64) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| item.popularity() > threshold)
        .collect()
}

/// Works released on or before `cutoff`; undated works are dropped.
pub fn released_until(works: Vec<Work>, cutoff: NaiveDate) -> Vec<Work> {
    works
        .into_iter()
        .filter(|w| {
            w.released_on()
                .and_then(|d| NaiveDate::parse_from_str(d.get(..10).unwrap_or(d), "%Y-%m-%d").ok())
                .is_some_and(|d| d <= cutoff)
        })
        .collect()
}

pub fn in_language(works: Vec<Work>, code: &str) -> Vec<Work> {
    works
        .into_iter()
        .filter(|w| w.language_code() == Some(code))
        .collect()
}

/// `min_percent` is on the 0-100 scale users see; TMDB averages are 0-10.
pub fn rated_above(works: Vec<Work>, min_percent: f64) -> Vec<Work> {
    let min_average = min_percent / 10.0;
    works
        .into_iter()
        .filter(|w| w.vote_average() > min_average)
        .collect()
}

pub fn with_gender(people: Vec<Person>, code: i32) -> Vec<Person> {
    people
        .into_iter()
        .filter(|p| p.gender == Some(code))
        .collect()
}

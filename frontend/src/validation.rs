use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Per-field validation messages, keyed by form field name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first message recorded for a field.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// `Ok(value)` when no field failed.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

pub fn required(errors: &mut FieldErrors, field: &'static str, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "This field is required.");
    }
    trimmed.to_string()
}

/// Parses a decimal amount that must be strictly positive. Accepts `1234.56`,
/// the displayed `1,234.56` and the `1.234,56` style used on Brazilian
/// keyboards.
pub fn positive_amount(errors: &mut FieldErrors, field: &'static str, value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "This field is required.");
        return 0.0;
    }
    match parse_decimal(trimmed) {
        Some(amount) if amount > 0.0 => amount,
        Some(_) => {
            errors.add(field, "Amount must be greater than zero.");
            0.0
        }
        None => {
            errors.add(field, "Enter a valid amount.");
            0.0
        }
    }
}

/// The last separator is the decimal point when both kinds appear; a single
/// lone separator of either kind is decimal; repeated lone ones group
/// thousands.
fn parse_decimal(raw: &str) -> Option<f64> {
    let decimal = match (raw.rfind('.'), raw.rfind(',')) {
        (Some(dot), Some(comma)) => Some(if dot > comma { '.' } else { ',' }),
        (Some(_), None) if raw.matches('.').count() == 1 => Some('.'),
        (None, Some(_)) if raw.matches(',').count() == 1 => Some(','),
        _ => None,
    };
    let normalized: String = raw
        .chars()
        .filter_map(|c| match c {
            '.' | ',' if Some(c) == decimal => Some('.'),
            '.' | ',' => None,
            other => Some(other),
        })
        .collect();
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub fn date(errors: &mut FieldErrors, field: &'static str, value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "This field is required.");
        return None;
    }
    match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "Enter a date as YYYY-MM-DD.");
            None
        }
    }
}

/// Records an error on the end field when `start` falls after `end`.
pub fn date_order(
    errors: &mut FieldErrors,
    end_field: &'static str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            errors.add(end_field, "End date must be on or after the start date.");
        }
    }
}

pub fn email(errors: &mut FieldErrors, field: &'static str, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "This field is required.");
    } else if !EMAIL_RE.is_match(trimmed) {
        errors.add(field, "Enter a valid email address.");
    }
    trimmed.to_string()
}

/// Parses a closed enumeration through its `FromStr` impl.
pub fn one_of<T: std::str::FromStr>(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
) -> Option<T> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "Select an option.");
        return None;
    }
    match trimmed.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.add(field, "Select one of the listed options.");
            None
        }
    }
}

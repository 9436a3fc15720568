// SPDX-License-Identifier: MIT

//! Locale-aware decimal input
//!
//! Text typed into a decimal cell uses the locale's separators
//! (`1.234,5` in `de-DE`). Input is normalised to `1234.5` before parsing
//! and re-grouped while the user types.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::components::editor::CellEditor;
use crate::rules::expression::value::to_number;

/// Upper bound for configured decimal places
pub const MAX_DECIMAL_PLACES: usize = 20;

const DEFAULT_COUNTRY_CODE: &str = "en-US";
const DEFAULT_SEPARATORS: (char, char) = (',', '.');

/// Locale → (thousands separator, decimal separator)
static LOCALE_SEPARATORS: Lazy<HashMap<&'static str, (char, char)>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for code in ["en", "en-US", "en-GB"] {
        m.insert(code, (',', '.'));
    }
    for code in ["de", "de-DE", "es-ES", "it-IT", "nl-NL", "pt-BR"] {
        m.insert(code, ('.', ','));
    }
    for code in ["fr", "fr-FR"] {
        m.insert(code, ('\u{202F}', ','));
    }
    m.insert("de-CH", ('\u{2019}', '.'));
    m
});

/// Keys that move the cursor or end editing; never filtered
const NAVIGATION_KEYS: &[&str] = &[
    "ArrowLeft",
    "ArrowRight",
    "ArrowUp",
    "ArrowDown",
    "PageDown",
    "PageUp",
    "Home",
    "End",
    "Escape",
    "Enter",
    "Backspace",
];

/// Decimal settings of a column
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DecimalSettings {
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_decimal_places")]
    pub decimal_places: usize,
}

fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}

fn default_decimal_places() -> usize {
    2
}

impl Default for DecimalSettings {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            decimal_places: default_decimal_places(),
        }
    }
}

/// Result of an input event: the new text and cursor position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputUpdate {
    pub text: String,
    pub cursor: usize,
}

/// Number formatting for one locale and precision
#[derive(Debug, Clone, PartialEq)]
pub struct DecimalFormat {
    country_code: String,
    decimal_places: usize,
    thousands: char,
    decimal: char,
}

impl DecimalFormat {
    pub fn new(country_code: &str, decimal_places: usize) -> Self {
        let (thousands, decimal) = separators_for(country_code);
        Self {
            country_code: country_code.to_string(),
            decimal_places: decimal_places.min(MAX_DECIMAL_PLACES),
            thousands,
            decimal,
        }
    }

    pub fn from_settings(settings: &DecimalSettings) -> Self {
        Self::new(&settings.country_code, settings.decimal_places)
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn decimal_places(&self) -> usize {
        self.decimal_places
    }

    pub fn thousands_separator(&self) -> char {
        self.thousands
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal
    }

    /// Strip thousands separators and turn the decimal separator into `.`
    pub fn normalize(&self, input: &str) -> String {
        input
            .chars()
            .filter(|&c| c != self.thousands)
            .map(|c| if c == self.decimal { '.' } else { c })
            .collect()
    }

    /// Parse the leading number of localized text; trailing garbage is ignored
    pub fn parse(&self, input: &str) -> Option<f64> {
        parse_float_prefix(&self.normalize(input))
    }

    /// Group and round a number, dropping trailing fraction zeros
    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value < 0.0 { "-∞" } else { "∞" }.to_string();
        }

        let fixed = format!("{:.*}", self.decimal_places, value.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
        let frac_part = frac_part.trim_end_matches('0');
        let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();

        let mut out = String::new();
        if value < 0.0 && !is_zero {
            out.push('-');
        }
        out.push_str(&group_digits(int_part, self.thousands));
        if !frac_part.is_empty() {
            out.push(self.decimal);
            out.push_str(frac_part);
        }
        out
    }

    /// Format localized text; `None` when it holds no number
    pub fn format_text(&self, input: &str) -> Option<String> {
        self.parse(input).map(|n| self.format(n))
    }

    /// Re-format text that is formattable; anything else comes back unchanged
    pub fn format_input(&self, input: &str) -> String {
        if self.is_formattable(input, None, true) {
            if let Some(formatted) = self.format_text(input) {
                return formatted;
            }
        }
        input.to_string()
    }

    /// Final cell value with exactly `decimal_places` fraction digits
    pub fn value(&self, input: &str) -> Option<String> {
        self.parse(input)
            .map(|n| format!("{:.*}", self.decimal_places, n))
    }

    /// Digits after the decimal separator
    pub fn count_decimals(&self, input: &str) -> usize {
        input
            .split_once(self.decimal)
            .map(|(_, frac)| frac.chars().count())
            .unwrap_or(0)
    }

    pub fn is_navigation_key(key: &str) -> bool {
        NAVIGATION_KEYS.contains(&key)
    }

    /// Whether a key press may change `current`
    pub fn is_input_allowed(&self, key: &str, current: &str, cursor_at_end: bool) -> bool {
        if Self::is_navigation_key(key) {
            return true;
        }

        // no more digits than decimal places at the end of the fraction
        if cursor_at_end
            && current.contains(self.decimal)
            && self.count_decimals(current) >= self.decimal_places
        {
            return false;
        }

        // a single decimal separator, and only with decimal places
        if key.chars().eq(std::iter::once(self.decimal))
            && (self.decimal_places == 0 || current.contains(self.decimal))
        {
            return false;
        }

        key.chars()
            .any(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
    }

    /// Whether text may be re-formatted without disturbing the user.
    ///
    /// Text that is half-typed (a trailing separator, or a zero just typed
    /// at the end of the fraction) is left alone.
    pub fn is_formattable(&self, current: &str, typed: Option<&str>, cursor_at_end: bool) -> bool {
        if current.is_empty() {
            return false;
        }
        if typed == Some("0") && cursor_at_end && self.count_decimals(current) > 0 {
            return false;
        }

        let unsigned = current.strip_prefix('-').unwrap_or(current);
        let (int_part, frac_part) = match unsigned.split_once(self.decimal) {
            Some((int_part, frac)) => (int_part, Some(frac)),
            None => (unsigned, None),
        };

        let int_ok = int_part
            .chars()
            .all(|c| c.is_ascii_digit() || c == self.thousands);
        let frac_ok = frac_part
            .map(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(true);

        int_ok && frac_ok
    }

    /// Handle an input event. Formattable text is re-grouped and the
    /// cursor shifted by the change in length; anything else is kept.
    pub fn on_input(&self, current: &str, typed: Option<&str>, cursor: usize) -> InputUpdate {
        let length = current.chars().count();
        let cursor_at_end = cursor == length;

        let formatted = if self.is_formattable(current, typed, cursor_at_end) {
            self.format_text(current)
        } else {
            None
        };

        match formatted {
            Some(text) => {
                let new_length = text.chars().count() as i64;
                let cursor = (new_length - length as i64 + cursor as i64).max(0) as usize;
                InputUpdate { text, cursor }
            }
            None => InputUpdate {
                text: current.to_string(),
                cursor,
            },
        }
    }
}

impl Default for DecimalFormat {
    fn default() -> Self {
        Self::from_settings(&DecimalSettings::default())
    }
}

fn separators_for(country_code: &str) -> (char, char) {
    LOCALE_SEPARATORS
        .get(country_code)
        .or_else(|| {
            country_code
                .split('-')
                .next()
                .and_then(|language| LOCALE_SEPARATORS.get(language))
        })
        .copied()
        .unwrap_or_else(|| {
            log::debug!("No separators for '{}', using {}", country_code, DEFAULT_COUNTRY_CODE);
            DEFAULT_SEPARATORS
        })
}

fn group_digits(digits: &str, separator: char) -> String {
    let count = digits.len();
    let mut out = String::with_capacity(count + count / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (count - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Longest leading decimal literal: sign, digits, fraction, exponent
fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Cell editor for decimal columns
#[derive(Debug, Clone)]
pub struct DecimalEditor {
    format: DecimalFormat,
    input: String,
}

impl DecimalEditor {
    /// Start editing a cell value. Null and empty values start blank.
    pub fn init(settings: &DecimalSettings, value: &Value) -> Self {
        let format = DecimalFormat::from_settings(settings);
        let input = match value {
            Value::Null => String::new(),
            Value::String(s) if s.trim().is_empty() => String::new(),
            other => format.format(to_number(other)),
        };
        Self { format, input }
    }

    pub fn text(&self) -> &str {
        &self.input
    }

    /// Key press at `cursor`; returns false when the key is swallowed
    pub fn key_down(&self, key: &str, cursor: usize) -> bool {
        let cursor_at_end = cursor == self.input.chars().count();
        self.format.is_input_allowed(key, &self.input, cursor_at_end)
    }

    /// New text after an input event; returns the cursor position
    pub fn input(&mut self, text: &str, typed: Option<&str>, cursor: usize) -> usize {
        let update = self.format.on_input(text, typed, cursor);
        self.input = update.text;
        update.cursor
    }
}

impl CellEditor for DecimalEditor {
    fn get_value(&self) -> Value {
        self.format
            .value(&self.input)
            .map(Value::String)
            .unwrap_or(Value::Null)
    }
}

//! Text form of values, driven by the template's resolved settings

use std::fmt::Write;

use chrono::{NaiveDateTime, TimeZone as _};
use stencil_config::settings::{DatePattern, DecimalLayout, Locale};
use stencil_config::ResolvedSettings;

use crate::model::Value;

const DEFAULT_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// Shortest form that reads back as the same number (`?c`)
pub fn computer_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{n:.0}");
    }
    n.to_string()
}

/// Group and decimal separators for a locale
fn separators(locale: &Locale) -> (char, char) {
    match locale.language() {
        "de" | "es" | "it" | "nl" | "pt" | "da" | "id" | "tr" => ('.', ','),
        "fr" | "ru" | "pl" | "cs" | "sv" | "fi" | "nb" | "uk" => ('\u{a0}', ','),
        _ => (',', '.'),
    }
}

/// Format a number with the `number_format` setting
pub fn format_number(n: f64, settings: &ResolvedSettings) -> String {
    match settings.number_format.layout() {
        Some(layout) if n.is_finite() => apply_layout(n, &layout, &settings.locale),
        _ => computer_number(n),
    }
}

fn apply_layout(n: f64, layout: &DecimalLayout, locale: &Locale) -> String {
    let (group_sep, decimal_sep) = separators(locale);
    let scaled = if layout.percent { n * 100.0 } else { n };
    let negative = scaled < 0.0;

    let fixed = format!("{:.*}", layout.max_fraction_digits, scaled.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut frac = frac_part.to_string();
    while frac.len() > layout.min_fraction_digits && frac.ends_with('0') {
        frac.pop();
    }

    let int_digits = int_part.trim_start_matches('0');
    let mut int_digits = int_digits.to_string();
    while int_digits.len() < layout.min_integer_digits {
        int_digits.insert(0, '0');
    }
    if int_digits.is_empty() && frac.is_empty() {
        int_digits.push('0');
    }

    let mut out = String::new();
    if negative && (int_digits.chars().chain(frac.chars()).any(|c| c != '0')) {
        out.push('-');
    }
    if layout.grouping {
        let len = int_digits.len();
        for (i, c) in int_digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(group_sep);
            }
            out.push(c);
        }
    } else {
        out.push_str(&int_digits);
    }
    if !frac.is_empty() {
        out.push(decimal_sep);
        out.push_str(&frac);
    }
    if layout.percent {
        out.push('%');
    }
    out
}

/// Format a date-time (taken as UTC) in the configured zone and pattern
pub fn format_date_time(dt: &NaiveDateTime, settings: &ResolvedSettings) -> String {
    format_zoned(dt, &settings.date_time_format, DEFAULT_DATE_TIME_FORMAT, settings)
}

/// Date part only, with the `date_format` pattern
pub fn format_date(dt: &NaiveDateTime, settings: &ResolvedSettings) -> String {
    format_zoned(dt, &settings.date_format, DEFAULT_DATE_FORMAT, settings)
}

/// Time part only, with the `time_format` pattern
pub fn format_time(dt: &NaiveDateTime, settings: &ResolvedSettings) -> String {
    format_zoned(dt, &settings.time_format, DEFAULT_TIME_FORMAT, settings)
}

fn format_zoned(
    dt: &NaiveDateTime,
    pattern: &DatePattern,
    fallback: &str,
    settings: &ResolvedSettings,
) -> String {
    let strftime = pattern.to_strftime().unwrap_or_else(|| fallback.to_string());
    let zoned = settings.time_zone.offset().from_utc_datetime(dt);

    let mut out = String::new();
    if write!(out, "{}", zoned.format(&strftime)).is_err() {
        log::warn!("date pattern '{pattern}' is not usable, using default");
        out.clear();
        let _ = write!(out, "{}", zoned.format(fallback));
    }
    out
}

/// Text a value interpolates to, `None` when it has no text form
pub fn interpolate(value: &Value, settings: &ResolvedSettings) -> Option<String> {
    match value {
        Value::Text(s) => Some(s.clone()),
        Value::Number(n) => Some(format_number(*n, settings)),
        Value::Boolean(b) => Some(settings.boolean_format.format(*b).to_string()),
        Value::DateTime(dt) => Some(format_date_time(dt, settings)),
        Value::Node(_) | Value::NodeList(_) => value.as_node().map(|n| n.text_content()),
        Value::Hash(_) | Value::Sequence(_) => None,
    }
}

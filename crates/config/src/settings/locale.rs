//! Locale, time zone and charset values
//!
//! These are parsed once when a setting is assigned, so every value held by a
//! settings table is already known to be well-formed.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};
use encoding_rs::Encoding;

// ============================================================================
// Locale
// ============================================================================

/// `language[_COUNTRY[_variant]]`, e.g. `de`, `en_US`, `sr_RS_latin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    country: Option<String>,
    variant: Option<String>,
}

impl Locale {
    pub fn en_us() -> Self {
        Self {
            language: "en".to_string(),
            country: Some("US".to_string()),
            variant: None,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        let mut parts = normalized.splitn(3, '_');

        let language = parts.next().unwrap_or_default();
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!("'{s}' has no 2-3 letter language code"));
        }

        let country = match parts.next() {
            None => None,
            Some(c) if c.len() == 2 && c.chars().all(|ch| ch.is_ascii_alphabetic()) => {
                Some(c.to_ascii_uppercase())
            }
            Some(c) if c.len() == 3 && c.chars().all(|ch| ch.is_ascii_digit()) => Some(c.to_string()),
            Some(c) => return Err(format!("'{c}' is not a country code")),
        };

        let variant = match parts.next() {
            None => None,
            Some("") => return Err("empty locale variant".to_string()),
            Some(v) => Some(v.to_string()),
        };

        Ok(Self {
            language: language.to_ascii_lowercase(),
            country,
            variant,
        })
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if let Some(country) = &self.country {
            write!(f, "_{country}")?;
        }
        if let Some(variant) = &self.variant {
            write!(f, "_{variant}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Time zone
// ============================================================================

/// A fixed-offset time zone.
///
/// Accepted spellings: `UTC`, `GMT`, `Z`, `GMT+01`, `GMT+1:30`, `UTC-0530`,
/// `+05:30`. Non-zero offsets are canonicalized to `GMT+HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeZone {
    offset: FixedOffset,
    gmt_alias: bool,
}

impl TimeZone {
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
            gmt_alias: false,
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn id(&self) -> String {
        let secs = self.offset.local_minus_utc();
        if secs == 0 {
            return if self.gmt_alias { "GMT" } else { "UTC" }.to_string();
        }
        let sign = if secs < 0 { '-' } else { '+' };
        let secs = secs.abs();
        format!("GMT{sign}{:02}:{:02}", secs / 3600, (secs % 3600) / 60)
    }
}

impl FromStr for TimeZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();
        match upper.as_str() {
            "UTC" | "Z" | "ETC/UTC" => return Ok(Self::utc()),
            "GMT" | "ETC/GMT" => {
                return Ok(Self {
                    gmt_alias: true,
                    ..Self::utc()
                })
            }
            _ => {}
        }

        let rest = upper
            .strip_prefix("GMT")
            .or_else(|| upper.strip_prefix("UTC"))
            .unwrap_or(&upper);
        let (sign, digits) = match rest.chars().next() {
            Some('+') => (1, &rest[1..]),
            Some('-') => (-1, &rest[1..]),
            _ => return Err(format!("unknown time zone '{trimmed}'")),
        };

        let (hours, minutes) = parse_offset_digits(digits)
            .ok_or_else(|| format!("malformed offset in time zone '{trimmed}'"))?;
        if hours > 23 || minutes > 59 {
            return Err(format!("offset out of range in time zone '{trimmed}'"));
        }

        let total = sign * (hours * 3600 + minutes * 60);
        let offset = FixedOffset::east_opt(total)
            .ok_or_else(|| format!("offset out of range in time zone '{trimmed}'"))?;
        Ok(Self {
            offset,
            gmt_alias: false,
        })
    }
}

/// `H`, `HH`, `HMM`, `HHMM`, `H:MM`, `HH:MM`
fn parse_offset_digits(digits: &str) -> Option<(i32, i32)> {
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if let Some((h, m)) = digits.split_once(':') {
        if h.is_empty() || h.len() > 2 || m.len() != 2 || !all_digits(h) || !all_digits(m) {
            return None;
        }
        return Some((h.parse().ok()?, m.parse().ok()?));
    }
    if !all_digits(digits) {
        return None;
    }
    match digits.len() {
        1 | 2 => Some((digits.parse().ok()?, 0)),
        3 | 4 => {
            let split = digits.len() - 2;
            Some((digits[..split].parse().ok()?, digits[split..].parse().ok()?))
        }
        _ => None,
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

// ============================================================================
// Charset
// ============================================================================

/// A character encoding known to `encoding_rs`, keeping the label it was
/// configured with.
#[derive(Debug, Clone)]
pub struct Charset {
    label: String,
    encoding: &'static Encoding,
}

impl Charset {
    pub fn utf8() -> Self {
        Self {
            label: "UTF-8".to_string(),
            encoding: encoding_rs::UTF_8,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl PartialEq for Charset {
    fn eq(&self, other: &Self) -> bool {
        self.label.eq_ignore_ascii_case(&other.label) && self.encoding == other.encoding
    }
}

impl Eq for Charset {}

impl FromStr for Charset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| format!("unknown charset '{label}'"))?;
        Ok(Self {
            label: label.to_string(),
            encoding,
        })
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

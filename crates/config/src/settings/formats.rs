//! Format pattern values: date/time patterns, number patterns, boolean words

use std::fmt;
use std::str::FromStr;

// ============================================================================
// Date patterns
// ============================================================================

const DATE_STYLES: &[&str] = &["short", "medium", "long", "full", "iso", "xs"];
const DATE_PATTERN_LETTERS: &str = "yYMLwDdEuaHkKhmsSzZX";

/// A date/time format: empty (engine default), a named style, or a
/// letter pattern such as `yyyy-MM-dd HH:mm`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DatePattern(String);

impl DatePattern {
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_named_style(&self) -> bool {
        DATE_STYLES.contains(&self.0.as_str())
    }

    /// Translate to a `chrono` format string.
    ///
    /// Returns `None` for the empty pattern; named styles map to fixed layouts.
    pub fn to_strftime(&self) -> Option<String> {
        match self.0.as_str() {
            "" => None,
            "iso" | "xs" => Some("%Y-%m-%dT%H:%M:%S".to_string()),
            "short" => Some("%-m/%-d/%y %-I:%M %p".to_string()),
            "medium" => Some("%b %-d, %Y %-I:%M:%S %p".to_string()),
            "long" | "full" => Some("%B %-d, %Y %-I:%M:%S %p %z".to_string()),
            pattern => Some(translate_date_pattern(pattern)),
        }
    }
}

fn translate_date_pattern(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            // '' is a literal quote, otherwise copy until the closing quote
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() && chars[i] != '\'' {
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }
        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&n| n == c).count();
        let spec = match (c, run) {
            ('y' | 'Y' | 'u', 2) => "%y",
            ('y' | 'Y' | 'u', _) => "%Y",
            ('M' | 'L', 1) => "%-m",
            ('M' | 'L', 2) => "%m",
            ('M' | 'L', 3) => "%b",
            ('M' | 'L', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('D', 1) => "%-j",
            ('D', _) => "%j",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('H' | 'k', 1) => "%-H",
            ('H' | 'k', _) => "%H",
            ('h' | 'K', 1) => "%-I",
            ('h' | 'K', _) => "%I",
            ('m', 1) => "%-M",
            ('m', _) => "%M",
            ('s', 1) => "%-S",
            ('s', _) => "%S",
            ('S', _) => "%3f",
            ('a', _) => "%p",
            ('z' | 'Z' | 'X', _) => "%z",
            ('w', _) => "%V",
            _ => "",
        };
        out.push_str(spec);
        i += run;
    }
    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

impl FromStr for DatePattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || DATE_STYLES.contains(&s) {
            return Ok(Self(s.to_string()));
        }

        let mut quoted = false;
        for c in s.chars() {
            if c == '\'' {
                quoted = !quoted;
            } else if !quoted && c.is_ascii_alphabetic() && !DATE_PATTERN_LETTERS.contains(c) {
                return Err(format!("illegal pattern letter '{c}'"));
            }
        }
        if quoted {
            return Err("unterminated quote".to_string());
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Number patterns
// ============================================================================

/// Digit layout extracted from a number pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalLayout {
    pub min_integer_digits: usize,
    pub min_fraction_digits: usize,
    pub max_fraction_digits: usize,
    pub grouping: bool,
    pub percent: bool,
}

/// A number format: `number`, `computer`, `currency`, `percent`, or a decimal
/// pattern such as `#,##0.00`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NumberPattern(String);

impl NumberPattern {
    pub fn number() -> Self {
        Self("number".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digit layout, or `None` for `computer` (shortest round-tripping form).
    pub fn layout(&self) -> Option<DecimalLayout> {
        match self.0.as_str() {
            "computer" => None,
            "number" => Some(layout_of("#,##0.###")),
            "currency" => Some(layout_of("#,##0.00")),
            "percent" => Some(layout_of("#,##0%")),
            pattern => Some(layout_of(pattern.split(';').next().unwrap_or(pattern))),
        }
    }
}

fn layout_of(subpattern: &str) -> DecimalLayout {
    let mut layout = DecimalLayout {
        min_integer_digits: 0,
        min_fraction_digits: 0,
        max_fraction_digits: 0,
        grouping: false,
        percent: false,
    };
    let mut in_fraction = false;
    let mut quoted = false;
    for c in subpattern.chars() {
        if c == '\'' {
            quoted = !quoted;
            continue;
        }
        if quoted {
            continue;
        }
        match c {
            '.' => in_fraction = true,
            ',' if !in_fraction => layout.grouping = true,
            '%' => layout.percent = true,
            '0' if in_fraction => {
                layout.min_fraction_digits += 1;
                layout.max_fraction_digits += 1;
            }
            '#' if in_fraction => layout.max_fraction_digits += 1,
            '0' => layout.min_integer_digits += 1,
            _ => {}
        }
    }
    layout
}

impl FromStr for NumberPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if matches!(s, "number" | "computer" | "currency" | "percent") {
            return Ok(Self(s.to_string()));
        }

        let mut subpatterns = 1;
        let mut dots = 0;
        let mut digits = false;
        let mut quoted = false;
        for c in s.chars() {
            match c {
                '\'' => quoted = !quoted,
                _ if quoted => {}
                ';' => {
                    subpatterns += 1;
                    dots = 0;
                }
                '.' => {
                    dots += 1;
                    if dots > 1 {
                        return Err("multiple decimal separators".to_string());
                    }
                }
                '0' | '#' => digits = true,
                _ => {}
            }
        }
        if quoted {
            return Err("unterminated quote".to_string());
        }
        if subpatterns > 2 {
            return Err("more than two sub-patterns".to_string());
        }
        if !digits {
            return Err("pattern has no digit placeholder".to_string());
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for NumberPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Boolean format
// ============================================================================

/// How booleans are printed: `c` (`true`/`false`) or a `yes,no` word pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BooleanFormat {
    Computer,
    Words { truthy: String, falsy: String },
}

impl BooleanFormat {
    pub fn format(&self, value: bool) -> &str {
        match (self, value) {
            (Self::Computer, true) => "true",
            (Self::Computer, false) => "false",
            (Self::Words { truthy, .. }, true) => truthy,
            (Self::Words { falsy, .. }, false) => falsy,
        }
    }
}

impl Default for BooleanFormat {
    fn default() -> Self {
        Self::Words {
            truthy: "true".to_string(),
            falsy: "false".to_string(),
        }
    }
}

impl FromStr for BooleanFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "c" {
            return Ok(Self::Computer);
        }
        match s.split(',').collect::<Vec<_>>().as_slice() {
            [truthy, falsy] if !truthy.is_empty() && !falsy.is_empty() => Ok(Self::Words {
                truthy: truthy.to_string(),
                falsy: falsy.to_string(),
            }),
            _ => Err("expected \"c\" or two comma-separated words".to_string()),
        }
    }
}

impl fmt::Display for BooleanFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Computer => f.write_str("c"),
            Self::Words { truthy, falsy } => write!(f, "{truthy},{falsy}"),
        }
    }
}

//! Core settings types
//!
//! The `Setting<T>` enum is the foundation of the settings system.
//! It provides explicit two-state semantics (inherit / explicitly set)
//! without a separate "is set" flag that could drift from the value.

use std::fmt;

/// A setting value with explicit inherit semantics.
///
/// It distinguishes between:
/// - `Inherit`: Use the parent scope's value (overlay inherits from engine,
///   template inherits from overlay, engine inherits from hard-coded defaults)
/// - `Value(T)`: Explicitly set to this value at this scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting<T> {
    /// Use the parent scope's value
    Inherit,
    /// Explicitly set to this value
    Value(T),
}

impl<T> Setting<T> {
    /// Returns true if this setting is explicitly set
    pub fn is_set(&self) -> bool {
        matches!(self, Setting::Value(_))
    }

    /// Returns true if this setting inherits from parent
    pub fn is_inherit(&self) -> bool {
        matches!(self, Setting::Inherit)
    }

    /// Returns the value if set, or None if inheriting
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Setting::Value(v) => Some(v),
            Setting::Inherit => None,
        }
    }

    /// Resolves this setting against a fallback value
    pub fn resolve(&self, fallback: T) -> T
    where
        T: Clone,
    {
        match self {
            Setting::Value(v) => v.clone(),
            Setting::Inherit => fallback,
        }
    }

    /// Resolves this setting against another Setting (for layered inheritance)
    pub fn resolve_with(&self, parent: &Setting<T>) -> Setting<T>
    where
        T: Clone,
    {
        match self {
            Setting::Value(v) => Setting::Value(v.clone()),
            Setting::Inherit => parent.clone(),
        }
    }
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Setting::Inherit
    }
}

// ============================================================================
// Categories
// ============================================================================

/// When a setting takes effect.
///
/// Parse-time settings shape how template source is read and are frozen once
/// a template is compiled. Runtime settings only affect evaluation and output,
/// so they may still change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingCategory {
    ParseTime,
    Runtime,
}

impl fmt::Display for SettingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseTime => write!(f, "parse-time"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

// ============================================================================
// Keyword-valued settings
// ============================================================================

/// Declares a closed set of keywords with `FromStr`/`Display`.
///
/// Parsing ignores ASCII case and underscores, so `square_bracket`,
/// `squareBracket` and `SQUARE_BRACKET` are the same keyword.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $kw:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $kw, )+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize_keyword(s);
                $(
                    if wanted == normalize_keyword($kw) {
                        return Ok($name::$variant);
                    }
                )+
                Err(format!("expected one of: {}", [$($kw),+].join(", ")))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

fn normalize_keyword(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

keyword_enum! {
    /// Arithmetic used for numeric operators
    ArithmeticEngine {
        /// Arbitrary precision decimals for every operation
        BigDecimal => "bigdecimal",
        /// Integer arithmetic where exact, decimals otherwise
        Conservative => "conservative",
    }
}

keyword_enum! {
    /// What happens when an interpolation fails while rendering
    ExceptionHandler {
        /// Return the error to the caller
        Rethrow => "rethrow",
        /// Return the error to the caller; nothing is written to the output
        Debug => "debug",
        /// Same as `Debug`
        HtmlDebug => "html_debug",
        /// Swallow the error and output nothing for the failed interpolation
        Ignore => "ignore",
    }
}

keyword_enum! {
    /// Strategy used to expose host values to templates
    ObjectWrapper {
        Default => "default",
        Simple => "simple",
        Beans => "beans",
    }
}

keyword_enum! {
    /// Which host types the `?new` built-in may instantiate
    ClassResolver {
        Unrestricted => "unrestricted",
        Safer => "safer",
        AllowsNothing => "allows_nothing",
    }
}

keyword_enum! {
    /// Legacy compatibility mode for undefined values
    ClassicCompatibility {
        Disabled => "disabled",
        Enabled => "enabled",
        /// Enabled, with legacy sequence/hash stringification too
        Legacy => "legacy",
    }
}

impl ClassicCompatibility {
    pub fn as_int(self) -> i64 {
        match self {
            Self::Disabled => 0,
            Self::Enabled => 1,
            Self::Legacy => 2,
        }
    }

    pub fn from_int(n: i64) -> Result<Self, String> {
        match n {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::Enabled),
            2 => Ok(Self::Legacy),
            _ => Err(format!("must be 0, 1 or 2, got {n}")),
        }
    }
}

keyword_enum! {
    /// Directive tag syntax of template source
    TagSyntax {
        /// `<#if x>`
        AngleBracket => "angle_bracket",
        /// `[#if x]`
        SquareBracket => "square_bracket",
        /// Decided by the first directive in the template
        AutoDetect => "auto_detect",
    }
}

keyword_enum! {
    /// Identifier style accepted for built-ins and directives
    NamingConvention {
        AutoDetect => "auto_detect",
        /// `previous_sibling`
        Legacy => "legacy",
        /// `previousSibling`
        Camel => "camel_case",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_resolve_with_prefers_own_value() {
        let parent = Setting::Value(1);
        assert_eq!(Setting::Value(2).resolve_with(&parent), Setting::Value(2));
        assert_eq!(Setting::Inherit.resolve_with(&parent), Setting::Value(1));
        assert_eq!(Setting::<i32>::Inherit.resolve(7), 7);
    }

    #[test]
    fn keywords_parse_case_and_underscore_insensitive() {
        assert_eq!("square_bracket".parse(), Ok(TagSyntax::SquareBracket));
        assert_eq!("squareBracket".parse(), Ok(TagSyntax::SquareBracket));
        assert_eq!("ALLOWS_NOTHING".parse(), Ok(ClassResolver::AllowsNothing));
        assert!("curly".parse::<TagSyntax>().is_err());
    }

    #[test]
    fn keyword_display_round_trips() {
        for handler in ExceptionHandler::ALL {
            assert_eq!(handler.to_string().parse(), Ok(*handler));
        }
    }

    #[test]
    fn classic_compatibility_range() {
        assert_eq!(ClassicCompatibility::from_int(2), Ok(ClassicCompatibility::Legacy));
        assert!(ClassicCompatibility::from_int(3).is_err());
        assert_eq!(ClassicCompatibility::Enabled.as_int(), 1);
    }
}

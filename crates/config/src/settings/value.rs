//! Dynamically typed setting values
//!
//! `SettingValue` is what crosses the name-based API (`SettingsTable::set`,
//! settings files, the applier's reports). Each setting's static type
//! converts to and from it through `SettingType`.

use std::fmt;

use super::formats::{BooleanFormat, DatePattern, NumberPattern};
use super::locale::{Charset, Locale, TimeZone};
use super::types::{
    ArithmeticEngine, ClassResolver, ClassicCompatibility, ExceptionHandler, NamingConvention,
    ObjectWrapper, TagSyntax,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// Explicitly "no value", for optional settings
    Null,
    Bool(bool),
    Int(i64),
    /// Unparsed text, converted into the setting's type on assignment
    Text(String),
    Locale(Locale),
    TimeZone(TimeZone),
    Charset(Charset),
    DatePattern(DatePattern),
    NumberPattern(NumberPattern),
    BooleanFormat(BooleanFormat),
    ArithmeticEngine(ArithmeticEngine),
    ClassicCompatibility(ClassicCompatibility),
    ClassResolver(ClassResolver),
    ExceptionHandler(ExceptionHandler),
    ObjectWrapper(ObjectWrapper),
    TagSyntax(TagSyntax),
    NamingConvention(NamingConvention),
}

impl SettingValue {
    /// Short type name, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Text(_) => "text",
            Self::Locale(_) => "locale",
            Self::TimeZone(_) => "time zone",
            Self::Charset(_) => "charset",
            Self::DatePattern(_) => "date pattern",
            Self::NumberPattern(_) => "number pattern",
            Self::BooleanFormat(_) => "boolean format",
            Self::ArithmeticEngine(_) => "arithmetic engine",
            Self::ClassicCompatibility(_) => "classic compatibility",
            Self::ClassResolver(_) => "class resolver",
            Self::ExceptionHandler(_) => "exception handler",
            Self::ObjectWrapper(_) => "object wrapper",
            Self::TagSyntax(_) => "tag syntax",
            Self::NamingConvention(_) => "naming convention",
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Locale(v) => write!(f, "{v}"),
            Self::TimeZone(v) => write!(f, "{v}"),
            Self::Charset(v) => write!(f, "{v}"),
            Self::DatePattern(v) => write!(f, "{v}"),
            Self::NumberPattern(v) => write!(f, "{v}"),
            Self::BooleanFormat(v) => write!(f, "{v}"),
            Self::ArithmeticEngine(v) => write!(f, "{v}"),
            Self::ClassicCompatibility(v) => write!(f, "{}", v.as_int()),
            Self::ClassResolver(v) => write!(f, "{v}"),
            Self::ExceptionHandler(v) => write!(f, "{v}"),
            Self::ObjectWrapper(v) => write!(f, "{v}"),
            Self::TagSyntax(v) => write!(f, "{v}"),
            Self::NamingConvention(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for SettingValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A Rust type that can be stored in a settings table slot.
pub trait SettingType: Clone + PartialEq + fmt::Debug {
    fn into_value(self) -> SettingValue;

    /// Convert from the dynamic form. `Err` carries the reason the value
    /// does not fit the type or its domain.
    fn from_value(value: SettingValue) -> Result<Self, String>;
}

impl SettingType for bool {
    fn into_value(self) -> SettingValue {
        SettingValue::Bool(self)
    }

    fn from_value(value: SettingValue) -> Result<Self, String> {
        match value {
            SettingValue::Bool(b) => Ok(b),
            SettingValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" => Ok(true),
                "false" | "no" | "n" => Ok(false),
                _ => Err(format!("'{s}' is not a boolean")),
            },
            other => Err(format!("expected a boolean, got {}", other.kind())),
        }
    }
}

impl SettingType for ClassicCompatibility {
    fn into_value(self) -> SettingValue {
        SettingValue::ClassicCompatibility(self)
    }

    fn from_value(value: SettingValue) -> Result<Self, String> {
        match value {
            SettingValue::ClassicCompatibility(v) => Ok(v),
            SettingValue::Int(n) => ClassicCompatibility::from_int(n),
            SettingValue::Bool(b) => Ok(if b { Self::Enabled } else { Self::Disabled }),
            SettingValue::Text(s) => match s.trim().parse::<i64>() {
                Ok(n) => ClassicCompatibility::from_int(n),
                Err(_) => s.parse(),
            },
            other => Err(format!("expected 0, 1 or 2, got {}", other.kind())),
        }
    }
}

/// Types whose text form is parsed with `FromStr<Err = String>`; the
/// `SettingValue` variant shares the type's name.
macro_rules! parsed_setting_type {
    ($($ty:ident),+ $(,)?) => {$(
        impl SettingType for $ty {
            fn into_value(self) -> SettingValue {
                SettingValue::$ty(self)
            }

            fn from_value(value: SettingValue) -> Result<Self, String> {
                match value {
                    SettingValue::$ty(v) => Ok(v),
                    SettingValue::Text(s) => s.parse(),
                    other => Err(format!("expected {}, got {}", stringify!($ty), other.kind())),
                }
            }
        }
    )+};
}

parsed_setting_type!(
    Locale,
    TimeZone,
    Charset,
    DatePattern,
    NumberPattern,
    BooleanFormat,
    ArithmeticEngine,
    ClassResolver,
    ExceptionHandler,
    ObjectWrapper,
    TagSyntax,
    NamingConvention,
);

/// Optional settings accept `Null` (or blank text) as an explicit "none".
impl<T: SettingType> SettingType for Option<T> {
    fn into_value(self) -> SettingValue {
        match self {
            Some(v) => v.into_value(),
            None => SettingValue::Null,
        }
    }

    fn from_value(value: SettingValue) -> Result<Self, String> {
        match value {
            SettingValue::Null => Ok(None),
            SettingValue::Text(s) if s.trim().is_empty() => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_parsed_into_the_target_type() {
        let locale = Locale::from_value(SettingValue::from("de_DE")).unwrap();
        assert_eq!(locale.to_string(), "de_DE");
        assert_eq!(bool::from_value(SettingValue::from("No")), Ok(false));
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let err = TimeZone::from_value(SettingValue::Bool(true)).unwrap_err();
        assert!(err.contains("boolean"), "{err}");
        assert!(bool::from_value(SettingValue::Int(1)).is_err());
    }

    #[test]
    fn optional_accepts_null_and_blank() {
        assert_eq!(Option::<Charset>::from_value(SettingValue::Null), Ok(None));
        assert_eq!(Option::<Charset>::from_value(SettingValue::from(" ")), Ok(None));
        let cs = Option::<Charset>::from_value(SettingValue::from("utf-16")).unwrap();
        assert_eq!(cs.map(|c| c.label().to_string()), Some("utf-16".to_string()));
        assert_eq!(Option::<Charset>::None.into_value(), SettingValue::Null);
    }

    #[test]
    fn classic_compatibility_from_int_and_bool() {
        assert_eq!(
            ClassicCompatibility::from_value(SettingValue::Int(2)),
            Ok(ClassicCompatibility::Legacy)
        );
        assert_eq!(
            ClassicCompatibility::from_value(SettingValue::Bool(true)),
            Ok(ClassicCompatibility::Enabled)
        );
        assert!(ClassicCompatibility::from_value(SettingValue::Int(9)).is_err());
    }
}

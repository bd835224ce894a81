//! Settings tables (one per scope) and the resolved view a template owns
//!
//! Every recognized setting is declared exactly once, in the
//! `define_settings!` invocation below. The declaration generates:
//! - `SettingName`, the static registry (key, category, `ALL`)
//! - `SettingsTable`, one `Setting<T>` slot per setting plus the name-based
//!   `get` / `set` / `is_set` API and typed accessors
//! - `ResolvedSettings`, the concrete values after inheritance, seeded from
//!   the hard-coded defaults
//!
//! Settings are defined in one place - no distributed registration.

use super::formats::{BooleanFormat, DatePattern, NumberPattern};
use super::locale::{Charset, Locale, TimeZone};
use super::types::{
    ArithmeticEngine, ClassResolver, ClassicCompatibility, ExceptionHandler, NamingConvention,
    ObjectWrapper, Setting, SettingCategory, TagSyntax,
};
use super::value::{SettingType, SettingValue};
use crate::error::SettingsError;

macro_rules! define_settings {
    (
        $(
            $(#[$doc:meta])*
            $variant:ident($key:literal, $category:ident) {
                $field:ident, $setter:ident, $is_set:ident: $ty:ty = $default:expr
            }
        )+
    ) => {
        /// Every setting the engine recognizes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum SettingName {
            $( $(#[$doc])* $variant, )+
        }

        impl SettingName {
            /// All settings, in declaration (alphabetical key) order
            pub const ALL: &'static [SettingName] = &[$(SettingName::$variant),+];

            /// Key used in settings files
            pub fn key(self) -> &'static str {
                match self {
                    $( SettingName::$variant => $key, )+
                }
            }

            pub fn category(self) -> SettingCategory {
                match self {
                    $( SettingName::$variant => SettingCategory::$category, )+
                }
            }

            pub fn from_key(key: &str) -> Option<SettingName> {
                match key {
                    $( $key => Some(SettingName::$variant), )+
                    _ => None,
                }
            }
        }

        /// The settings assigned at one scope.
        ///
        /// A slot is either `Inherit` (not set here) or `Value` (explicitly
        /// set here). Reads never substitute defaults; that is the cascade's job.
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct SettingsTable {
            $( $field: Setting<$ty>, )+
        }

        impl SettingsTable {
            /// Value explicitly set at this scope, `None` if inherited
            pub fn get(&self, name: SettingName) -> Option<SettingValue> {
                match name {
                    $( SettingName::$variant => self.$field.as_value().cloned().map(SettingType::into_value), )+
                }
            }

            pub fn is_set(&self, name: SettingName) -> bool {
                match name {
                    $( SettingName::$variant => self.$field.is_set(), )+
                }
            }

            /// Assign a setting, converting and validating the value.
            ///
            /// Text values are parsed into the setting's type. On error the
            /// table is left unchanged.
            pub fn set(&mut self, name: SettingName, value: impl Into<SettingValue>) -> Result<(), SettingsError> {
                let value = value.into();
                match name {
                    $(
                        SettingName::$variant => {
                            let typed = <$ty as SettingType>::from_value(value.clone())
                                .map_err(|reason| SettingsError::invalid_value(name, &value, reason))?;
                            self.$field = Setting::Value(typed);
                        }
                    )+
                }
                Ok(())
            }

            /// Return a slot to `Inherit`
            pub fn unset(&mut self, name: SettingName) {
                match name {
                    $( SettingName::$variant => self.$field = Setting::Inherit, )+
                }
            }

            /// Copy every explicitly set slot of `other` over this table
            pub fn merge_from(&mut self, other: &SettingsTable) {
                $(
                    if let Setting::Value(v) = &other.$field {
                        self.$field = Setting::Value(v.clone());
                    }
                )+
            }

            $(
                $(#[$doc])*
                pub fn $field(&self) -> &Setting<$ty> {
                    &self.$field
                }

                pub fn $setter(&mut self, value: $ty) {
                    self.$field = Setting::Value(value);
                }

                pub fn $is_set(&self) -> bool {
                    self.$field.is_set()
                }
            )+
        }

        /// Concrete settings after inheritance has been resolved.
        ///
        /// All fields are plain values (no `Setting<T>`). A template owns one
        /// of these as its private copy of the effective configuration.
        #[derive(Debug, Clone, PartialEq)]
        pub struct ResolvedSettings {
            $( $(#[$doc])* pub $field: $ty, )+
        }

        impl ResolvedSettings {
            /// Hard-coded engine defaults, the ultimate fallback of every chain
            pub fn defaults() -> Self {
                Self {
                    $( $field: $default, )+
                }
            }

            pub fn get(&self, name: SettingName) -> SettingValue {
                match name {
                    $( SettingName::$variant => self.$field.clone().into_value(), )+
                }
            }

            /// Copy explicitly set slots of `table` over these values
            pub fn overlay(&mut self, table: &SettingsTable) {
                self.overlay_with(table, |_| true);
            }

            /// Like `overlay`, but asks `accept` for each explicitly set
            /// setting before copying it.
            pub fn overlay_with<F>(&mut self, table: &SettingsTable, mut accept: F)
            where
                F: FnMut(SettingName) -> bool,
            {
                $(
                    if let Setting::Value(v) = &table.$field {
                        if accept(SettingName::$variant) {
                            self.$field = v.clone();
                        }
                    }
                )+
            }
        }
    };
}

define_settings! {
    /// Whether `?api` may expose the native API of wrapped host values
    ApiBuiltinEnabled("api_builtin_enabled", Runtime) {
        api_builtin_enabled, set_api_builtin_enabled, is_api_builtin_enabled_set: bool = false
    }
    /// Arithmetic used by numeric operators
    ArithmeticEngine("arithmetic_engine", Runtime) {
        arithmetic_engine, set_arithmetic_engine, is_arithmetic_engine_set: ArithmeticEngine = ArithmeticEngine::BigDecimal
    }
    /// Flush output after each render
    AutoFlush("auto_flush", Runtime) {
        auto_flush, set_auto_flush, is_auto_flush_set: bool = true
    }
    /// How booleans are interpolated
    BooleanFormat("boolean_format", Runtime) {
        boolean_format, set_boolean_format, is_boolean_format_set: BooleanFormat = BooleanFormat::default()
    }
    /// Legacy handling of undefined values
    ClassicCompatible("classic_compatible", Runtime) {
        classic_compatible, set_classic_compatible, is_classic_compatible_set: ClassicCompatibility = ClassicCompatibility::Disabled
    }
    /// Format for date-only values
    DateFormat("date_format", Runtime) {
        date_format, set_date_format, is_date_format_set: DatePattern = DatePattern::empty()
    }
    /// Format for date-time values
    DateTimeFormat("date_time_format", Runtime) {
        date_time_format, set_date_time_format, is_date_time_format_set: DatePattern = DatePattern::empty()
    }
    /// Source encoding of template text
    Encoding("encoding", ParseTime) {
        encoding, set_encoding, is_encoding_set: Charset = Charset::utf8()
    }
    Locale("locale", Runtime) {
        locale, set_locale, is_locale_set: Locale = Locale::en_us()
    }
    /// Log interpolation failures before handing them to the exception handler
    LogTemplateExceptions("log_template_exceptions", Runtime) {
        log_template_exceptions, set_log_template_exceptions, is_log_template_exceptions_set: bool = true
    }
    /// Identifier style of built-in names
    NamingConvention("naming_convention", ParseTime) {
        naming_convention, set_naming_convention, is_naming_convention_set: NamingConvention = NamingConvention::AutoDetect
    }
    /// Host types `?new` may instantiate
    NewBuiltinClassResolver("new_builtin_class_resolver", Runtime) {
        new_builtin_class_resolver, set_new_builtin_class_resolver, is_new_builtin_class_resolver_set: ClassResolver = ClassResolver::Unrestricted
    }
    /// How numbers are interpolated
    NumberFormat("number_format", Runtime) {
        number_format, set_number_format, is_number_format_set: NumberPattern = NumberPattern::number()
    }
    ObjectWrapper("object_wrapper", Runtime) {
        object_wrapper, set_object_wrapper, is_object_wrapper_set: ObjectWrapper = ObjectWrapper::Default
    }
    /// Charset of the rendered output, if known
    OutputEncoding("output_encoding", Runtime) {
        output_encoding, set_output_encoding, is_output_encoding_set: Option<Charset> = None
    }
    ShowErrorTips("show_error_tips", Runtime) {
        show_error_tips, set_show_error_tips, is_show_error_tips_set: bool = true
    }
    /// Zone used for SQL date/time values, `None` to use `time_zone`
    SqlDateAndTimeTimeZone("sql_date_and_time_time_zone", Runtime) {
        sql_date_and_time_time_zone, set_sql_date_and_time_time_zone, is_sql_date_and_time_time_zone_set: Option<TimeZone> = None
    }
    /// Directive tag syntax of template source
    TagSyntax("tag_syntax", ParseTime) {
        tag_syntax, set_tag_syntax, is_tag_syntax_set: TagSyntax = TagSyntax::AngleBracket
    }
    /// What happens when an interpolation fails
    TemplateExceptionHandler("template_exception_handler", Runtime) {
        template_exception_handler, set_template_exception_handler, is_template_exception_handler_set: ExceptionHandler = ExceptionHandler::Debug
    }
    /// Format for time-only values
    TimeFormat("time_format", Runtime) {
        time_format, set_time_format, is_time_format_set: DatePattern = DatePattern::empty()
    }
    TimeZone("time_zone", Runtime) {
        time_zone, set_time_zone, is_time_zone_set: TimeZone = TimeZone::utc()
    }
    /// Charset used by `?url` escaping, `None` to use the output encoding
    UrlEscapingCharset("url_escaping_charset", Runtime) {
        url_escaping_charset, set_url_escaping_charset, is_url_escaping_charset_set: Option<Charset> = None
    }
    /// Strip indentation and trailing whitespace around directive-only lines
    WhitespaceStripping("whitespace_stripping", ParseTime) {
        whitespace_stripping, set_whitespace_stripping, is_whitespace_stripping_set: bool = true
    }
}

impl SettingsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no setting is explicitly set
    pub fn is_empty(&self) -> bool {
        SettingName::ALL.iter().all(|name| !self.is_set(*name))
    }

    /// Explicitly set settings, in registry order
    pub fn explicit_settings(&self) -> Vec<SettingName> {
        SettingName::ALL
            .iter()
            .copied()
            .filter(|name| self.is_set(*name))
            .collect()
    }
}

impl Default for ResolvedSettings {
    fn default() -> Self {
        Self::defaults()
    }
}

impl std::fmt::Display for SettingName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

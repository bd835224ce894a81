//! Settings table, merge and resolution behaviour over the whole registry.
//!
//! Every recognized setting gets a non-default sample assignment below. The
//! match is exhaustive, so adding a setting without a sample fails to compile.

use stencil_config::persistence::{load_table, save_table};
use stencil_config::{
    merge, resolve_effective, Configuration, ResolvedSettings, ScopeLevel, SettingName,
    SettingValue, SettingsError, SettingsTable,
};

fn sample_value(name: SettingName) -> SettingValue {
    match name {
        SettingName::ApiBuiltinEnabled => true.into(),
        SettingName::ArithmeticEngine => "conservative".into(),
        SettingName::AutoFlush => false.into(),
        SettingName::BooleanFormat => "J,N".into(),
        SettingName::ClassicCompatible => 1i64.into(),
        SettingName::DateFormat => "yyyy-#DDD".into(),
        SettingName::DateTimeFormat => "yyyy-#DDD-@HH:mm".into(),
        SettingName::Encoding => "utf-16".into(),
        SettingName::Locale => "de_DE".into(),
        SettingName::LogTemplateExceptions => false.into(),
        SettingName::NamingConvention => "camel_case".into(),
        SettingName::NewBuiltinClassResolver => "allows_nothing".into(),
        SettingName::NumberFormat => "0.0000".into(),
        SettingName::ObjectWrapper => "simple".into(),
        SettingName::OutputEncoding => "utf-16".into(),
        SettingName::ShowErrorTips => false.into(),
        SettingName::SqlDateAndTimeTimeZone => "GMT+01".into(),
        SettingName::TagSyntax => "square_bracket".into(),
        SettingName::TemplateExceptionHandler => "ignore".into(),
        SettingName::TimeFormat => "@HH:mm".into(),
        SettingName::TimeZone => "GMT+02".into(),
        SettingName::UrlEscapingCharset => "utf-16".into(),
        SettingName::WhitespaceStripping => false.into(),
    }
}

fn table_with(name: SettingName) -> SettingsTable {
    let mut table = SettingsTable::new();
    table
        .set(name, sample_value(name))
        .unwrap_or_else(|e| panic!("sample for {name} rejected: {e}"));
    table
}

fn all_samples() -> SettingsTable {
    let mut table = SettingsTable::new();
    for name in SettingName::ALL {
        table.set(*name, sample_value(*name)).unwrap();
    }
    table
}

#[test]
fn test_samples_differ_from_defaults() {
    let defaults = ResolvedSettings::defaults();
    for name in SettingName::ALL {
        let assigned = table_with(*name).get(*name).unwrap();
        assert_ne!(assigned, defaults.get(*name), "sample for {name} equals the default");
    }
}

#[test]
fn test_is_set_is_exact() {
    for name in SettingName::ALL {
        let table = table_with(*name);
        for other in SettingName::ALL {
            assert_eq!(
                table.is_set(*other),
                other == name,
                "setting {name} made is_set({other}) wrong"
            );
        }
    }
}

#[test]
fn test_merge_keeps_independent_settings() {
    for a in SettingName::ALL {
        for b in SettingName::ALL {
            if a == b {
                continue;
            }
            let t1 = table_with(*a);
            let t2 = table_with(*b);
            let merged = merge(&[&t1, &t2]);

            assert_eq!(merged.get(*a), t1.get(*a), "merging {b} clobbered {a}");
            assert_eq!(merged.get(*b), t2.get(*b), "merging {a} clobbered {b}");
            assert_eq!(merged.explicit_settings().len(), 2);
        }
    }
}

#[test]
fn test_merge_priority() {
    let mut t1 = SettingsTable::new();
    t1.set(SettingName::Locale, "de_DE").unwrap();

    let mut t2 = SettingsTable::new();
    t2.set(SettingName::Locale, "fr_FR").unwrap();
    t2.set(SettingName::TimeZone, "GMT+01").unwrap();

    let mut t3 = SettingsTable::new();
    t3.set(SettingName::Locale, "it_IT").unwrap();

    let merged = merge(&[&t1, &t2, &t3]);
    assert_eq!(merged.get(SettingName::Locale), t3.get(SettingName::Locale));
    assert_eq!(merged.get(SettingName::TimeZone), t2.get(SettingName::TimeZone));
    assert!(!merged.is_set(SettingName::DateFormat));

    // inputs are untouched
    assert_eq!(t1.explicit_settings(), vec![SettingName::Locale]);
    assert_eq!(t3.explicit_settings(), vec![SettingName::Locale]);
}

#[test]
fn test_resolve_falls_back_to_defaults() {
    let config = Configuration::new();
    let instance = table_with(SettingName::NumberFormat);
    let chain = config.chain_for("page.ftl", Some(&instance));

    for name in SettingName::ALL {
        let expected = if *name == SettingName::NumberFormat {
            instance.get(*name).unwrap()
        } else {
            config.defaults().get(*name)
        };
        assert_eq!(resolve_effective(&chain, *name), expected, "{name}");
    }
    assert_eq!(chain.origin(SettingName::NumberFormat), ScopeLevel::Instance);
}

#[test]
fn test_configurations_are_independent() {
    let mut first = Configuration::new();
    let second = Configuration::new();

    first.table_mut().set(SettingName::Locale, "de_DE").unwrap();

    assert_eq!(first.resolve_for("a.ftl").locale.to_string(), "de_DE");
    assert_eq!(second.resolve_for("a.ftl").locale.to_string(), "en_US");
    assert!(second.table().is_empty());
}

#[test]
fn test_settings_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let table = all_samples();

    for file in ["settings.toml", "settings.json"] {
        let path = dir.path().join("nested").join(file);
        save_table(&path, &table).unwrap();
        let loaded = load_table(&path).unwrap();
        assert_eq!(loaded, table, "{file}");
    }
}

#[test]
fn test_saved_file_omits_unset_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");

    save_table(&path, &table_with(SettingName::AutoFlush)).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.trim(), "auto_flush = false");

    let loaded = Configuration::load(&path).unwrap();
    assert!(!loaded.resolve_for("x").auto_flush);
    assert!(loaded.resolve_for("x").whitespace_stripping);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_table(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, stencil_config::SettingsError::Io(_)));
}

#[test]
fn test_signed_offset_parts_are_rejected() {
    let mut table = SettingsTable::new();
    for bad in ["GMT+-1:00", "GMT+01:-1", "UTC++2:00"] {
        let err = table.set(SettingName::TimeZone, bad).unwrap_err();
        assert!(
            matches!(err, SettingsError::InvalidSettingValue { setting: SettingName::TimeZone, .. }),
            "{bad}: {err:?}"
        );
    }
    assert!(!table.is_set(SettingName::TimeZone));
}

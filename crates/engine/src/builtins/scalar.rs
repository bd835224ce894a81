//! Built-ins for strings, numbers, booleans and dates

use super::{BuiltinRegistry, Invocation};
use crate::error::EngineError;
use crate::format;
use crate::model::{Capabilities, Value};

type Output = Result<Option<Value>, EngineError>;

pub(super) fn register(registry: &mut BuiltinRegistry) {
    let scalar = Capabilities::SCALAR;
    registry.register("string", scalar, string);
    registry.register("length", scalar, length);
    registry.register_aliases(&["upper_case", "upperCase"], scalar, upper_case);
    registry.register_aliases(&["lower_case", "lowerCase"], scalar, lower_case);
    registry.register("trim", scalar, trim);

    registry.register("c", Capabilities::NUMERIC, number_c);
    registry.register("string", Capabilities::NUMERIC, number_string);
    registry.register("abs", Capabilities::NUMERIC, abs);

    registry.register("c", Capabilities::BOOLEAN, boolean_c);
    registry.register("string", Capabilities::BOOLEAN, boolean_string);

    registry.register("string", Capabilities::DATE_LIKE, date_string);
    registry.register("date", Capabilities::DATE_LIKE, date_only);
    registry.register("time", Capabilities::DATE_LIKE, time_only);
}

fn text(value: String) -> Output {
    Ok(Some(Value::Text(value)))
}

fn string(inv: &Invocation<'_>) -> Output {
    text(inv.text()?)
}

fn length(inv: &Invocation<'_>) -> Output {
    Ok(Some(Value::Number(inv.text()?.chars().count() as f64)))
}

fn upper_case(inv: &Invocation<'_>) -> Output {
    text(inv.text()?.to_uppercase())
}

fn lower_case(inv: &Invocation<'_>) -> Output {
    text(inv.text()?.to_lowercase())
}

fn trim(inv: &Invocation<'_>) -> Output {
    text(inv.text()?.trim().to_string())
}

fn number_c(inv: &Invocation<'_>) -> Output {
    text(format::computer_number(inv.number()?))
}

fn number_string(inv: &Invocation<'_>) -> Output {
    text(format::format_number(inv.number()?, inv.settings))
}

fn abs(inv: &Invocation<'_>) -> Output {
    Ok(Some(Value::Number(inv.number()?.abs())))
}

fn boolean_c(inv: &Invocation<'_>) -> Output {
    text(inv.boolean()?.to_string())
}

fn boolean_string(inv: &Invocation<'_>) -> Output {
    text(inv.settings.boolean_format.format(inv.boolean()?).to_string())
}

fn date_string(inv: &Invocation<'_>) -> Output {
    match inv.target {
        Value::DateTime(dt) => text(format::format_date_time(dt, inv.settings)),
        _ => Err(inv.unsupported()),
    }
}

fn date_only(inv: &Invocation<'_>) -> Output {
    match inv.target {
        Value::DateTime(dt) => text(format::format_date(dt, inv.settings)),
        _ => Err(inv.unsupported()),
    }
}

fn time_only(inv: &Invocation<'_>) -> Output {
    match inv.target {
        Value::DateTime(dt) => text(format::format_time(dt, inv.settings)),
        _ => Err(inv.unsupported()),
    }
}

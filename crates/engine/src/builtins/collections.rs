//! Built-ins for sequences and hashes

use super::{BuiltinRegistry, Invocation};
use crate::error::EngineError;
use crate::model::{Capabilities, Value};

type Output = Result<Option<Value>, EngineError>;

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.register("size", Capabilities::SEQUENCE, sequence_size);
    registry.register("first", Capabilities::SEQUENCE, first);
    registry.register("last", Capabilities::SEQUENCE, last);

    registry.register("size", Capabilities::MAPPING, hash_size);
    registry.register("keys", Capabilities::MAPPING, keys);
    registry.register("values", Capabilities::MAPPING, values);
}

fn sequence_size(inv: &Invocation<'_>) -> Output {
    let len = match inv.target {
        Value::Sequence(items) => items.len(),
        Value::NodeList(nodes) => nodes.len(),
        _ => return Err(inv.unsupported()),
    };
    Ok(Some(Value::Number(len as f64)))
}

fn first(inv: &Invocation<'_>) -> Output {
    Ok(inv.items()?.into_iter().next())
}

fn last(inv: &Invocation<'_>) -> Output {
    Ok(inv.items()?.pop())
}

fn hash_size(inv: &Invocation<'_>) -> Output {
    match inv.target {
        Value::Hash(map) => Ok(Some(Value::Number(map.len() as f64))),
        _ => Err(inv.unsupported()),
    }
}

fn keys(inv: &Invocation<'_>) -> Output {
    match inv.target {
        Value::Hash(map) => Ok(Some(Value::Sequence(map.keys().cloned().map(Value::Text).collect()))),
        _ => Err(inv.unsupported()),
    }
}

fn values(inv: &Invocation<'_>) -> Output {
    match inv.target {
        Value::Hash(map) => Ok(Some(Value::Sequence(map.values().cloned().collect()))),
        _ => Err(inv.unsupported()),
    }
}

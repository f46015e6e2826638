//! Type checks shared by the builtin variable setters.

use tw_core::{AgentKind, EngineError, EngineResult, Value};

fn wrong(kind: AgentKind, name: &str, expected: &'static str, found: &Value) -> EngineError {
    EngineError::WrongType {
        kind,
        name: name.to_owned(),
        expected,
        found: found.to_string(),
    }
}

pub(crate) fn number(kind: AgentKind, name: &str, v: &Value) -> EngineResult<f64> {
    v.as_number().ok_or_else(|| wrong(kind, name, "number", v))
}

pub(crate) fn boolean(kind: AgentKind, name: &str, v: &Value) -> EngineResult<bool> {
    v.as_bool().ok_or_else(|| wrong(kind, name, "TRUE/FALSE", v))
}

pub(crate) fn string(kind: AgentKind, name: &str, v: Value) -> EngineResult<String> {
    match v {
        Value::String(s) => Ok(s),
        other => Err(wrong(kind, name, "string", &other)),
    }
}

pub(crate) fn color(kind: AgentKind, name: &str, v: Value) -> EngineResult<Value> {
    if v.is_color() { Ok(v) } else { Err(wrong(kind, name, "color", &v)) }
}

//! 条件求值 - 决定区块是否渲染

use super::binding::resolve;
use super::DataMap;
use crate::error::Diagnostic;
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

/// `{ field, operator, value }` 条件
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    pub field: String,
    #[serde(alias = "op")]
    pub operator: Operator,
    #[serde(default, deserialize_with = "present_value")]
    pub value: Option<JsonValue>,
}

/// 显式写出的 `null` 保留为 Some(Null)，与缺省（undefined）区分
fn present_value<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: Deserializer<'de>,
{
    JsonValue::deserialize(deserializer).map(Some)
}

/// 比较运算符，兼容旧 schema 的拼写
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    Includes,
    Exists,
    Empty,
    NotEmpty,
    Unknown(String),
}

impl From<String> for Operator {
    fn from(op: String) -> Self {
        match op.trim() {
            "==" | "===" | "equals" | "eq" => Operator::Eq,
            "!=" | "!==" | "not_equals" | "ne" => Operator::Ne,
            ">" | "gt" => Operator::Gt,
            "<" | "lt" => Operator::Lt,
            ">=" | "gte" => Operator::Gte,
            "<=" | "lte" => Operator::Lte,
            "includes" | "contains" => Operator::Includes,
            "exists" => Operator::Exists,
            "empty" => Operator::Empty,
            "not_empty" => Operator::NotEmpty,
            _ => Operator::Unknown(op),
        }
    }
}

impl Condition {
    pub fn new(field: &str, operator: &str, value: Option<JsonValue>) -> Self {
        Self { field: field.to_string(), operator: Operator::from(operator.to_string()), value }
    }

    /// 解析 field 后按运算符比较。无法解析的字段按 undefined 参与比较
    pub fn evaluate(&self, data: &DataMap, context: &DataMap) -> bool {
        let actual = resolve(&self.field, data, context);
        let expected = self.value.as_ref();

        match &self.operator {
            Operator::Eq => loose_eq(actual, expected),
            Operator::Ne => !loose_eq(actual, expected),
            Operator::Gt => compare(actual, expected, |a, b| a > b),
            Operator::Lt => compare(actual, expected, |a, b| a < b),
            Operator::Gte => compare(actual, expected, |a, b| a >= b),
            Operator::Lte => compare(actual, expected, |a, b| a <= b),
            Operator::Includes => match (actual, expected) {
                (Some(JsonValue::String(haystack)), Some(JsonValue::String(needle))) => haystack.contains(needle.as_str()),
                (Some(JsonValue::Array(items)), Some(needle)) => items.iter().any(|item| values_equal(item, needle)),
                _ => false,
            },
            Operator::Exists => !matches!(actual, None | Some(JsonValue::Null)),
            Operator::Empty => is_empty(actual),
            Operator::NotEmpty => !is_empty(actual),
            Operator::Unknown(op) => {
                Diagnostic::UnknownOperator { operator: op.clone() }.emit();
                true
            }
        }
    }
}

/// 未定义只等于未定义；数字按数值比较
fn loose_eq(actual: Option<&JsonValue>, expected: Option<&JsonValue>) -> bool {
    match (actual, expected) {
        (None, None) => true,
        (Some(a), Some(b)) => values_equal(a, b),
        _ => false,
    }
}

pub(crate) fn values_equal(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// 大小比较要求两边都是数字
fn compare(actual: Option<&JsonValue>, expected: Option<&JsonValue>, op: impl Fn(f64, f64) -> bool) -> bool {
    match (actual.and_then(JsonValue::as_f64), expected.and_then(JsonValue::as_f64)) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }
}

fn is_empty(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => true,
        Some(JsonValue::Array(items)) => items.is_empty(),
        Some(JsonValue::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

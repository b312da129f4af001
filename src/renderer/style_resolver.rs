//! 样式解析器 - 将区块 style / bind_style 解析为 CSS 属性表

use crate::parser::binding::{is_binding_path, resolve, value_to_string};
use crate::parser::DataMap;
use serde_json::{Number, Value as JsonValue};
use std::collections::BTreeMap;

/// CSS 属性名 → 值，按属性名排序保证输出稳定
pub type StyleMap = BTreeMap<String, JsonValue>;

/// 样式解析器
pub struct StyleResolver<'a> {
    data: &'a DataMap,
    context: &'a DataMap,
}

impl<'a> StyleResolver<'a> {
    pub fn new(data: &'a DataMap, context: &'a DataMap) -> Self {
        Self { data, context }
    }

    /// 解析元素样式：先字面量 style，再用 bind_style 覆盖
    pub fn resolve(&self, style: Option<&DataMap>, bind_style: Option<&DataMap>) -> StyleMap {
        let mut resolved = StyleMap::new();

        if let Some(style) = style {
            for (name, value) in style.iter().filter(|(_, v)| !v.is_null()) {
                resolved.insert(css_property(name), self.resolve_literal(value));
            }
        }

        if let Some(bind_style) = bind_style {
            for (name, entry) in bind_style {
                if let Some(value) = self.resolve_binding(entry) {
                    resolved.insert(css_property(name), value);
                }
            }
        }

        resolved
    }

    /// 形如绑定路径的字符串先尝试解析，解析不到保留字面量
    fn resolve_literal(&self, value: &JsonValue) -> JsonValue {
        if let JsonValue::String(s) = value {
            if is_binding_path(s) {
                match resolve(s, self.data, self.context) {
                    Some(JsonValue::Null) | None => {}
                    Some(bound) => return bound.clone(),
                }
            }
        }
        value.clone()
    }

    fn resolve_binding(&self, entry: &JsonValue) -> Option<JsonValue> {
        match entry {
            JsonValue::String(path) => self.lookup(path).cloned(),
            JsonValue::Object(spec) => {
                if spec.get("type").and_then(JsonValue::as_str) == Some("gradient") {
                    return self.gradient(spec);
                }
                if let Some(expr) = spec.get("expr").and_then(JsonValue::as_str) {
                    return self.expression(expr);
                }
                let field = spec.get("field").and_then(JsonValue::as_str)?;
                let value = self.lookup(field)?;
                match spec.get("transform").and_then(JsonValue::as_str) {
                    Some(transform) => apply_transform(value, transform),
                    None => Some(value.clone()),
                }
            }
            _ => None,
        }
    }

    fn lookup(&self, path: &str) -> Option<&'a JsonValue> {
        match resolve(path, self.data, self.context)? {
            JsonValue::Null => None,
            value => Some(value),
        }
    }

    /// `{type: "gradient", direction?, start, end}`，两端都解析到才生成
    fn gradient(&self, spec: &DataMap) -> Option<JsonValue> {
        let start = self.lookup(spec.get("start")?.as_str()?)?;
        let end = self.lookup(spec.get("end")?.as_str()?)?;
        let direction = spec.get("direction").and_then(JsonValue::as_str).unwrap_or("to right");
        Some(JsonValue::String(format!(
            "linear-gradient({}, {}, {})",
            direction,
            value_to_string(start),
            value_to_string(end)
        )))
    }

    /// `path / n`、`path * n` 或单独的路径
    fn expression(&self, expr: &str) -> Option<JsonValue> {
        let expr = expr.trim();
        for (op, apply) in [('/', div as fn(f64, f64) -> Option<f64>), ('*', mul as fn(f64, f64) -> Option<f64>)] {
            if let Some((left, right)) = expr.split_once(op) {
                let lhs = self.lookup(left.trim())?.as_f64()?;
                let rhs = right.trim().parse::<f64>().ok()?;
                return apply(lhs, rhs).map(number_value);
            }
        }
        self.lookup(expr).cloned()
    }
}

fn div(a: f64, b: f64) -> Option<f64> {
    (b != 0.0).then(|| a / b)
}

fn mul(a: f64, b: f64) -> Option<f64> {
    Some(a * b)
}

fn apply_transform(value: &JsonValue, transform: &str) -> Option<JsonValue> {
    let n = match value {
        JsonValue::Number(n) => n.as_f64()?,
        JsonValue::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return Some(value.clone()),
    };
    Some(match transform {
        "divide_100" => number_value(n / 100.0),
        "multiply_100" => number_value(n * 100.0),
        "percent" => JsonValue::String(format!("{}%", format_number(n))),
        "px" => JsonValue::String(format!("{}px", format_number(n))),
        _ => value.clone(),
    })
}

/// `background_color` / `backgroundColor` → `background-color`
pub fn css_property(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        match c {
            '_' => out.push('-'),
            c if c.is_ascii_uppercase() => {
                out.push('-');
                out.push(c.to_ascii_lowercase());
            }
            c => out.push(c),
        }
    }
    out
}

/// 整数值不带小数部分
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

pub(crate) fn number_value(n: f64) -> JsonValue {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        JsonValue::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(JsonValue::Number).unwrap_or(JsonValue::Null)
    }
}

//! 绑定表达式解析 - 在 (data, context) 上求值点号/下标路径

use super::DataMap;
use serde_json::Value as JsonValue;

/// 解析路径 `user.address.city` / `items[0].name` / `items.0.name`
///
/// 先查 data，查不到再查 context；都没有时返回 None（即 undefined），
/// 由调用方决定字面量兜底。中间段缺失不会报错。
pub fn resolve<'a>(path: &str, data: &'a DataMap, context: &'a DataMap) -> Option<&'a JsonValue> {
    get_value(path, data).or_else(|| get_value(path, context))
}

/// 解析并转成字符串；null 或未定义时返回 None
pub fn resolve_string(path: &str, data: &DataMap, context: &DataMap) -> Option<String> {
    match resolve(path, data, context)? {
        JsonValue::Null => None,
        value => Some(value_to_string(value)),
    }
}

/// 获取数据值
pub fn get_value<'a>(path: &str, data: &'a DataMap) -> Option<&'a JsonValue> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }

    let mut segments = split_path(path).into_iter();
    let first = segments.next()?;
    let mut current = data.get(first.as_str())?;

    for segment in segments {
        current = match current {
            JsonValue::Object(map) => map.get(segment.as_str())?,
            JsonValue::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// `items[0].name` → ["items", "0", "name"]
fn split_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        // 处理数组索引 item[0][1]
        let mut rest = part;
        if let Some(bracket_pos) = rest.find('[') {
            let name = &rest[..bracket_pos];
            if !name.is_empty() {
                segments.push(name.to_string());
            }
            rest = &rest[bracket_pos..];
            while let Some(stripped) = rest.strip_prefix('[') {
                match stripped.find(']') {
                    Some(close) => {
                        segments.push(stripped[..close].trim().to_string());
                        rest = &stripped[close + 1..];
                    }
                    None => {
                        // 括号未闭合，整体当作键名
                        segments.push(rest.to_string());
                        rest = "";
                    }
                }
            }
            if !rest.is_empty() {
                segments.push(rest.to_string());
            }
        } else {
            segments.push(part.to_string());
        }
    }
    segments
}

/// 形如 `slide.button_bg` / `items[0].url` 的字符串才被当成绑定路径
pub fn is_binding_path(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    let mut has_access = false;
    for c in chars {
        match c {
            '.' | '[' | ']' => has_access = true,
            c if c.is_ascii_alphanumeric() || c == '_' => {}
            _ => return false,
        }
    }
    has_access && !value.ends_with('.')
}

pub fn value_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => "".to_string(),
        _ => value.to_string(),
    }
}

pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().unwrap_or(0.0) != 0.0,
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

//! 文本模板 - 处理字面量内容里的 {{}} 插值

use super::binding::{is_truthy, resolve, value_to_string};
use super::DataMap;

/// 模板引擎
pub struct TemplateEngine;

impl TemplateEngine {
    /// 是否包含插值
    pub fn has_expression(template: &str) -> bool {
        template.find("{{").map(|open| template[open..].contains("}}")).unwrap_or(false)
    }

    /// 插值替换 {{expression}}，未定义的值替换为空串
    pub fn interpolate(template: &str, data: &DataMap, context: &DataMap) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            let Some(close) = rest[open + 2..].find("}}") else {
                break;
            };
            let expr = rest[open + 2..open + 2 + close].trim();
            result.push_str(&rest[..open]);
            result.push_str(&Self::evaluate_expression(expr, data, context));
            rest = &rest[open + 2 + close + 2..];
        }

        result.push_str(rest);
        result
    }

    /// 计算表达式：三元、字符串/数字字面量、路径
    fn evaluate_expression(expr: &str, data: &DataMap, context: &DataMap) -> String {
        let expr = expr.trim();

        // 三元表达式: condition ? true_val : false_val
        if let Some(q_pos) = expr.find('?') {
            if let Some(c_pos) = expr[q_pos..].find(':') {
                let condition = expr[..q_pos].trim();
                let true_val = expr[q_pos + 1..q_pos + c_pos].trim();
                let false_val = expr[q_pos + c_pos + 1..].trim();

                return if Self::evaluate_truthy(condition, data, context) {
                    Self::evaluate_expression(true_val, data, context)
                } else {
                    Self::evaluate_expression(false_val, data, context)
                };
            }
        }

        // 字符串字面量
        if expr.len() >= 2
            && ((expr.starts_with('\'') && expr.ends_with('\'')) || (expr.starts_with('"') && expr.ends_with('"')))
        {
            return expr[1..expr.len() - 1].to_string();
        }

        // 数字字面量
        if expr.parse::<f64>().is_ok() {
            return expr.to_string();
        }

        resolve(expr, data, context).map(value_to_string).unwrap_or_default()
    }

    fn evaluate_truthy(expr: &str, data: &DataMap, context: &DataMap) -> bool {
        let expr = expr.trim();

        // 否定
        if let Some(inner) = expr.strip_prefix('!') {
            return !Self::evaluate_truthy(inner, data, context);
        }

        resolve(expr, data, context).map(is_truthy).unwrap_or(false)
    }
}

//! wrapper 描述符解析：`tag#id.class1.class2`

use serde::Serialize;

/// 解析后的 wrapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wrapper {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Default for Wrapper {
    fn default() -> Self {
        Self { tag: "div".to_string(), id: None, classes: Vec::new() }
    }
}

impl Wrapper {
    /// 解析描述符，不会失败：无法识别的片段按字面量类名处理
    ///
    /// - `"div"` → tag=div
    /// - `"section#hero.container.dark"` → tag=section, id=hero, classes=[container, dark]
    /// - `""` → tag=div
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::default();
        }

        // 标签名：开头的字母数字串
        let tag_len = input
            .char_indices()
            .take_while(|(i, c)| if *i == 0 { c.is_ascii_alphabetic() } else { c.is_ascii_alphanumeric() || *c == '-' })
            .count();
        let tag = if tag_len > 0 {
            input[..tag_len].to_ascii_lowercase()
        } else {
            "div".to_string()
        };

        let mut id = None;
        let mut classes = Vec::new();
        let rest = &input[tag_len..];

        // 开头残留的非 #/. 字符作为类名保留
        let first_marker = rest.find(['#', '.']).unwrap_or(rest.len());
        if first_marker > 0 {
            classes.push(rest[..first_marker].to_string());
        }

        let mut pos = first_marker;
        while pos < rest.len() {
            let marker = rest.as_bytes()[pos];
            let start = pos + 1;
            let end = rest[start..].find(['#', '.']).map(|i| start + i).unwrap_or(rest.len());
            let token = &rest[start..end];
            if !token.is_empty() {
                if marker == b'#' && id.is_none() {
                    id = Some(token.to_string());
                } else if marker == b'#' {
                    // 第二个 id 不合法，按类名保留
                    classes.push(format!("#{}", token));
                } else {
                    classes.push(token.to_string());
                }
            }
            pos = end;
        }

        Self { tag, id, classes }
    }

    pub fn is_void(&self) -> bool {
        matches!(self.tag.as_str(), "img" | "input" | "br" | "hr" | "meta" | "link")
    }
}

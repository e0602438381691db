//! # 源码元素扫描器
//!
//! 在一段源码文本（整个文件或单个组件的源码片段）中查找开标签，
//! 为每个标签生成一个 `DetectedElement`：提取可读名称、判断是否可交互、
//! 推断建议的 Join 类型与方向，并分配建议编号。
//!
//! ## 扫描策略
//! - 纯词法扫描，不构建语法树：所有规则都是预编译正则（`LazyLock`）
//! - 闭标签（`</...>`）和 `a < b` 之类的比较表达式不会匹配
//! - 不完整或畸形的类标签文本直接跳过，扫描本身永不失败
//!
//! ## Join 类型推断顺序（可交互元素，先命中者生效）
//! 1. 文本类 input（text / search / email / password / tel / url）或 textarea → Serial
//! 2. 数值范围特征（range / number、min / max / step、slider、level、volume、value=）→ Analog
//! 3. 文本属性（label / title / placeholder）→ Serial
//! 4. 默认 → Digital
//!
//! 非交互元素一律视为静态显示文本，建议 Serial。

use std::sync::LazyLock;

use regex::Regex;

use crate::models::source::{DetectedElement, JoinDirection, JoinType};
use crate::services::joins::MAX_JOIN_NUMBER;

/// 建议编号的起点：第 N 个元素的编号为 `1100 + N`
const ELEMENT_JOIN_BASE: u32 = 1100;

/// 标签名缺省值（片段 `<>`）
const DEFAULT_TAG: &str = "div";

/// 本身即可交互的标签
const INTERACTIVE_TAGS: &[&str] = &["button", "input", "select", "textarea"];

/// 开标签：`<Ident attrs>` / `<Ident attrs />` / `<>`
///
/// 标识符之后的属性文本必须以空白开头，且不含 `<` / `>`。
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:([A-Za-z][\w.:-]*)(\s[^<>]*?)?\s*/?)?>").unwrap()
});

/// 名称属性：id / name / aria-label，值可为 "..."、'...' 或 {"..."}
static NAME_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:^|\s)(id|name|aria-label)\s*=\s*(?:"([^"]*)"|'([^']*)'|\{\s*["'`]([^"'`]*)["'`]\s*\})"#,
    )
    .unwrap()
});

/// 事件处理属性：onClick= / onchange= ...
static EVENT_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)on[A-Za-z]+\s*=").unwrap());

/// 范围 / 滑块特征
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)type\s*=\s*\{?\s*["']range["']|slider"#).unwrap()
});

/// 文本类 input
static TEXT_INPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)type\s*=\s*\{?\s*["'](?:text|search|email|password|tel|url)["']"#).unwrap()
});

/// 数值特征
static ANALOG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)type\s*=\s*\{?\s*["'](?:range|number)["']|(?:^|\s)(?:min|max|step|value)\s*=|slider|level|volume"#,
    )
    .unwrap()
});

/// 文本内容特征
static SERIAL_HINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|\s)(?:label|title|placeholder)\s*=").unwrap());

/// 绑定值 / 只读特征：命中时方向为 Output
static OUTPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|\s)(?:value|checked)\s*=|readonly|(?:^|\s)disabled\b").unwrap()
});

/// 扫描源码文本中的所有开标签
///
/// # 参数
/// - `text` - 源码文本
///
/// # 返回值
/// 按出现顺序排列的元素列表。同一次调用内建议编号互不相同，
/// 超出 Join 上限后的元素统一建议为上限编号
pub fn scan_elements(text: &str) -> Vec<DetectedElement> {
    TAG_RE
        .captures_iter(text)
        .enumerate()
        .map(|(idx, caps)| {
            let ordinal = idx as u32 + 1;
            let tag = caps
                .get(1)
                .map(|m| m.as_str().to_ascii_lowercase())
                .unwrap_or_else(|| DEFAULT_TAG.to_string());
            let attrs = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            build_element(tag, attrs, ordinal)
        })
        .collect()
}

/// 由标签名、属性文本和序号构造元素
fn build_element(tag: String, attrs: &str, ordinal: u32) -> DetectedElement {
    let id = format!("{}-{}", tag, ordinal);
    let display_name = display_name_from_attrs(attrs).unwrap_or_else(|| id.clone());
    let interactive = is_interactive(&tag, attrs);

    let suggested_join_type = if interactive {
        infer_join_type(&tag, attrs)
    } else {
        JoinType::Serial
    };

    let suggested_direction = if OUTPUT_RE.is_match(attrs) {
        JoinDirection::Output
    } else {
        JoinDirection::Input
    };

    DetectedElement {
        id,
        display_name,
        tag,
        interactive,
        suggested_join_type,
        suggested_direction,
        // 超过上限的元素统一建议为上限编号，由用户手动调整
        suggested_join_number: ELEMENT_JOIN_BASE
            .saturating_add(ordinal)
            .min(MAX_JOIN_NUMBER as u32),
    }
}

/// 按 id > name > aria-label 的优先级提取可读名称
///
/// 空值视为缺失。
fn display_name_from_attrs(attrs: &str) -> Option<String> {
    let mut best: Option<(usize, &str)> = None;

    for caps in NAME_ATTR_RE.captures_iter(attrs) {
        let rank = match caps.get(1).map(|m| m.as_str()) {
            Some("id") => 0,
            Some("name") => 1,
            _ => 2,
        };
        let value = (2..=4)
            .find_map(|i| caps.get(i))
            .map(|m| m.as_str().trim())
            .unwrap_or("");
        if value.is_empty() {
            continue;
        }
        if best.is_none_or(|(r, _)| rank < r) {
            best = Some((rank, value));
        }
    }

    best.map(|(_, value)| value.to_string())
}

/// 判断元素是否可交互
fn is_interactive(tag: &str, attrs: &str) -> bool {
    INTERACTIVE_TAGS.contains(&tag) || EVENT_ATTR_RE.is_match(attrs) || RANGE_RE.is_match(attrs)
}

/// 推断可交互元素的 Join 类型
fn infer_join_type(tag: &str, attrs: &str) -> JoinType {
    if tag == "textarea" || TEXT_INPUT_RE.is_match(attrs) {
        JoinType::Serial
    } else if ANALOG_RE.is_match(attrs) {
        JoinType::Analog
    } else if SERIAL_HINT_RE.is_match(attrs) {
        JoinType::Serial
    } else {
        JoinType::Digital
    }
}

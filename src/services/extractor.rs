//! # 组件提取器
//!
//! 在整个文件文本中查找导出的组件定义（首字母大写的 `export function` /
//! `export const`），切出每个定义的源码片段，提取声明的属性名，
//! 并把片段交给元素扫描器。
//!
//! ## 切片规则
//! 片段从导出声明所在行开始，到下一个导出声明之前（或文件末尾）结束。
//! 切片基于行首正则：组件体内行首出现的 `export function` / `export const`
//! 同样会被当作新组件的起点，这一行为保持不变。
//!
//! ## 降级策略
//! - 找不到任何导出声明时，整个文件作为一个名为 `ImportedComponent` 的组件
//! - 没有任何标签的片段仍然产生组件记录（元素列表为空），由调用方决定是否提示
//! - 提取永不失败，`errors` 始终为空
//!
//! 这里只做启发式扫描，调用方只依赖 `parse_source` 的契约，
//! 将来替换为真正的解析器时无需改动调用方。

use std::sync::LazyLock;

use regex::Regex;

use crate::models::source::{ParseOutcome, ParsedComponent};
use crate::services::element_scanner::scan_elements;

/// 找不到导出声明时使用的组件名
pub const FALLBACK_COMPONENT_NAME: &str = "ImportedComponent";

/// 行首的组件导出声明，捕获组 1 / 2 为组件名
static EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*export\s+(?:default\s+)?(?:async\s+)?(?:function\s*\*?\s*([A-Z][\w$]*)|(?:const|let|var)\s+([A-Z][\w$]*))",
    )
    .unwrap()
});

/// 参数列表中的候选属性名：标识符 + 可选 `?` + 终结符
static PROP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_$][\w$]*)\s*\??\s*(?:[:,}=)]|$)").unwrap());

/// 解析源码文本，提取其中的组件
///
/// # 参数
/// - `text` - 整个文件的文本
///
/// # 返回值
/// 至少包含一个组件的 `ParseOutcome`
pub fn parse_source(text: &str) -> ParseOutcome {
    // 第一步：定位所有导出声明（起始偏移、组件名、声明结束偏移）
    let declarations: Vec<(usize, &str, usize)> = EXPORT_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1).or_else(|| caps.get(2))?;
            Some((whole.start(), name.as_str(), whole.end()))
        })
        .collect();

    // 没有导出声明：整个文件作为一个兜底组件
    if declarations.is_empty() {
        log::debug!("未找到导出声明，整个文件作为 {}", FALLBACK_COMPONENT_NAME);
        return ParseOutcome {
            components: vec![ParsedComponent {
                name: FALLBACK_COMPONENT_NAME.to_string(),
                declared_props: vec![],
                source_span: text.to_string(),
                detected_elements: scan_elements(text),
            }],
            errors: vec![],
        };
    }

    // 第二步：按相邻声明切片
    let components = declarations
        .iter()
        .enumerate()
        .map(|(i, &(start, name, decl_end))| {
            let end = declarations
                .get(i + 1)
                .map(|&(next, _, _)| next)
                .unwrap_or(text.len());
            let span = &text[start..end];
            let after_name = &text[decl_end..end];

            ParsedComponent {
                name: name.to_string(),
                declared_props: extract_props(after_name),
                source_span: span.trim_end().to_string(),
                detected_elements: scan_elements(span),
            }
        })
        .collect::<Vec<_>>();

    log::debug!("从源码中提取到 {} 个组件", components.len());

    ParseOutcome {
        components,
        errors: vec![],
    }
}

/// 从第一个括号组中提取声明的属性名
///
/// 候选标识符前面（忽略空白和展开运算符 `...`）必须是开头、`(`、`{`、`,` 或 `;`，
/// 这样类型注解（`: Props`）和默认值表达式中的标识符不会被误收。
/// 结果按首次出现的顺序去重。
fn extract_props(text: &str) -> Vec<String> {
    let Some(inner) = first_paren_group(text) else {
        return vec![];
    };

    let mut props: Vec<String> = Vec::new();
    for caps in PROP_RE.captures_iter(inner) {
        let Some(ident) = caps.get(1) else {
            continue;
        };
        let before = inner[..ident.start()].trim_end();
        let before = before.strip_suffix("...").unwrap_or(before).trim_end();
        let at_key_position = before
            .chars()
            .last()
            .is_none_or(|c| matches!(c, '(' | '{' | ',' | ';'));

        if at_key_position && !props.iter().any(|p| p == ident.as_str()) {
            props.push(ident.as_str().to_string());
        }
    }
    props
}

/// 返回第一个括号组的内部文本（不含最外层括号）
///
/// 括号未闭合时取到文本末尾。
fn first_paren_group(text: &str) -> Option<&str> {
    let open = text.find('(')?;
    let body = &text[open + 1..];
    let mut depth = 1usize;

    for (idx, ch) in body.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&body[..idx]);
                }
            }
            _ => {}
        }
    }
    Some(body)
}

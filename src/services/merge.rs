//! # 导入合并引擎
//!
//! 把一批勾选的条目（组件源码和 / 或数据文件）转换为项目组件库 / 模板的变更，
//! 并生成逐文件的导入结果列表。
//!
//! ## 处理流程
//! 1. 按勾选顺序逐个处理条目（不并行，结果顺序确定）
//! 2. Component 条目：读取文本 → `parse_source` → 每个组件生成一个 `LibraryComponent`，
//!    Join 编号按组件在整个批次中的序号分配（而不是文件内序号）
//! 3. Data 条目（json / yaml）：含 `pages` 数组 → 模板；含 `components` 数组 → 组件库；
//!    都不含 → 警告并跳过
//! 4. 批次结束后一次性写回：读取当前列表 → 生成追加后的新列表 → 整体替换
//!
//! ## 错误处理
//! 所有失败都在文件边界被捕获并转换为 `ImportResult`，批次继续处理剩余条目；
//! 本模块的公开入口永不返回错误。没有产生任何变更且没有其他提示时，
//! 追加一条"未找到可导入内容"的警告，绝不静默地"成功"。

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ImportError;
use crate::models::archive::{ArchiveEntry, Category};
use crate::models::library::{
    ComponentConfig, ImportResult, Join, Library, LibraryComponent, ProjectData, Template,
};
use crate::models::settings::ImportConfig;
use crate::models::source::{JoinType, ParsedComponent, SourceFile};
use crate::services::archive::EntryReader;
use crate::services::classifier;
use crate::services::extractor::parse_source;
use crate::services::joins::{self, JoinTriple};
use crate::utils::path::slugify;

/// 导入目标组件库
///
/// 对应前端 TypeScript 类型：
/// ```typescript
/// type ImportTarget =
///   | { kind: 'existing'; value: string }   // 组件库 ID
///   | { kind: 'new'; value: string };       // 新组件库名称
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum ImportTarget {
    /// 追加到指定 ID 的组件库；ID 不存在时以该 ID 新建
    Existing(String),
    /// 以指定名称新建组件库
    New(String),
}

/// 调用方提供的组件尺寸估计
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentSize {
    pub width: f64,
    pub height: f64,
}

/// 合并参数
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOptions {
    pub target: ImportTarget,
    pub size: ComponentSize,
    /// 是否在 `config.componentCode` 中保留源码片段
    pub keep_component_code: bool,
    /// 单个条目的大小上限（字节）
    pub max_entry_bytes: u64,
    /// 目标 ID 不存在时新建组件库的名称
    pub default_library_name: String,
}

impl MergeOptions {
    /// 由导入配置和目标组件库构造合并参数
    pub fn from_config(config: &ImportConfig, target: ImportTarget) -> Self {
        Self {
            target,
            size: ComponentSize {
                width: config.default_width,
                height: config.default_height,
            },
            keep_component_code: config.keep_component_code,
            max_entry_bytes: config.max_entry_bytes,
            default_library_name: config.default_library_name.clone(),
        }
    }
}

/// 批次内暂存的变更，批次结束后一次性写回项目
#[derive(Default)]
struct StagedChanges {
    components: Vec<LibraryComponent>,
    templates: Vec<Template>,
    libraries: Vec<Library>,
}

impl StagedChanges {
    fn is_empty(&self) -> bool {
        self.components.is_empty() && self.templates.is_empty() && self.libraries.is_empty()
    }
}

/// 合并一批勾选的条目到项目中
///
/// # 参数
/// - `project` - 项目数据（仅 `libraries` / `templates` 会被替换）
/// - `entries` - 勾选的条目，按此顺序处理
/// - `reader` - 条目文本读取器
/// - `options` - 合并参数
///
/// # 返回值
/// 逐文件 / 逐导入单元的结果列表，至少包含一条记录
pub async fn merge_import<R: EntryReader>(
    project: &mut ProjectData,
    entries: &[ArchiveEntry],
    reader: &mut R,
    options: &MergeOptions,
) -> Vec<ImportResult> {
    if entries.is_empty() {
        return vec![ImportResult::warning("未选择任何文件")];
    }

    log::info!("开始导入批次：{} 个条目", entries.len());

    let mut results = Vec::new();
    let mut staged = StagedChanges::default();
    let mut skipped: Vec<&str> = Vec::new();

    for entry in entries {
        if entry.auto_excluded {
            log::debug!("跳过自动排除的条目 {}", entry.path);
            skipped.push(&entry.path);
            continue;
        }

        let importable = match entry.category {
            Category::Component => true,
            Category::Data => is_structured_data(&entry.extension),
            _ => false,
        };
        if !importable {
            log::debug!("跳过不支持导入的条目 {}（{:?}）", entry.path, entry.category);
            skipped.push(&entry.path);
            continue;
        }

        if entry.size_bytes > options.max_entry_bytes {
            log::warn!("条目过大，跳过 {}（{} 字节）", entry.path, entry.size_bytes);
            let err = ImportError::TooLarge {
                path: entry.path.clone(),
                size: entry.size_bytes,
                limit: options.max_entry_bytes,
            };
            results.push(ImportResult::error(
                format!("{}: 文件过大，已跳过", entry.path),
                err.to_string(),
            ));
            continue;
        }

        let text = match reader.read_text(&entry.path).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("读取条目失败 {}: {}", entry.path, e);
                results.push(ImportResult::error(
                    format!("{}: 读取失败", entry.path),
                    e.to_string(),
                ));
                continue;
            }
        };

        let result = if entry.category == Category::Component {
            import_code(entry, &text, options, &mut staged)
        } else {
            import_data(entry, &text, project, &mut staged)
        };
        results.extend(result);
    }

    if !skipped.is_empty() {
        results.push(
            ImportResult::warning(format!("跳过 {} 个不支持导入的文件", skipped.len()))
                .with_details(skipped.join("\n"))
                .with_count(skipped.len()),
        );
    }

    if staged.is_empty() {
        if results.is_empty() {
            results.push(ImportResult::warning("未找到可导入的内容"));
        }
        log::info!("导入批次结束：无变更");
        return results;
    }

    apply_changes(project, staged, options, &mut results);
    log::info!("导入批次结束：{} 条结果", results.len());
    results
}

/// 为单文件导入构造条目
///
/// 用户显式选择的文件不受自动排除规则影响，分类按文件名和扩展名计算，
/// 并强制勾选。
pub fn single_file_entry(source: &SourceFile) -> ArchiveEntry {
    ArchiveEntry {
        path: source.path.clone(),
        name: source.name.clone(),
        extension: source.extension.clone(),
        is_directory: false,
        size_bytes: source.size_bytes,
        category: classifier::category_of(&source.name, &source.name, &source.extension),
        auto_excluded: false,
        selected: true,
    }
}

/// 支持解析的数据格式
fn is_structured_data(extension: &str) -> bool {
    matches!(extension.to_ascii_lowercase().as_str(), "json" | "yaml" | "yml")
}

/// 导入组件源码文件
fn import_code(
    entry: &ArchiveEntry,
    text: &str,
    options: &MergeOptions,
    staged: &mut StagedChanges,
) -> Vec<ImportResult> {
    let outcome = parse_source(text);
    let mut results = Vec::new();

    for err in &outcome.errors {
        results.push(ImportResult::warning(format!("{}: {}", entry.path, err)));
    }

    let mut summary = Vec::with_capacity(outcome.components.len());
    let mut element_total = 0usize;

    for parsed in &outcome.components {
        // 批次序号 = 已暂存的组件数，跨文件连续
        let index = staged.components.len();
        let triple = joins::allocate(index);
        if !triple.in_range() {
            results.push(ImportResult::warning(format!(
                "{}: 组件 {} 的 Join 编号超出范围，已导入但未分配 Join",
                entry.path, parsed.name
            )));
        }

        element_total += parsed.detected_elements.len();
        summary.push(format!(
            "{}（{} 个元素）",
            parsed.name,
            parsed.detected_elements.len()
        ));
        staged
            .components
            .push(build_component(parsed, triple, options));
    }

    let count = outcome.components.len();
    let result = if element_total == 0 {
        ImportResult::warning(format!(
            "{}: 导入 {} 个组件，但未检测到任何元素",
            entry.path, count
        ))
        .with_count(count)
    } else {
        ImportResult::success(format!("{}: 导入 {} 个组件", entry.path, count), count)
    };
    results.push(result.with_details(summary.join(", ")));
    results
}

/// 由提取出的组件构造组件库条目
fn build_component(
    parsed: &ParsedComponent,
    triple: JoinTriple,
    options: &MergeOptions,
) -> LibraryComponent {
    let mut joins = BTreeMap::new();
    if triple.in_range() {
        for (key, join_type, number, description) in [
            ("digital", JoinType::Digital, triple.digital, "按下 / 状态"),
            ("analog", JoinType::Analog, triple.analog, "数值"),
            ("serial", JoinType::Serial, triple.serial, "文本"),
        ] {
            joins.insert(
                key.to_string(),
                Join {
                    join_type,
                    number: number as u32,
                    description: Some(description.to_string()),
                },
            );
        }
    }

    LibraryComponent {
        id: format!("comp-{}", Uuid::new_v4()),
        component_type: format!("custom-{}", slugify(&parsed.name)),
        name: parsed.name.clone(),
        x: 0.0,
        y: 0.0,
        width: options.size.width,
        height: options.size.height,
        joins,
        style: serde_json::Map::new(),
        config: ComponentConfig {
            component_code: options
                .keep_component_code
                .then(|| parsed.source_span.clone()),
            declared_props: parsed.declared_props.clone(),
            elements: parsed.detected_elements.clone(),
            extra: serde_json::Map::new(),
        },
    }
}

/// 导入数据文件（模板或组件库）
fn import_data(
    entry: &ArchiveEntry,
    text: &str,
    project: &ProjectData,
    staged: &mut StagedChanges,
) -> Vec<ImportResult> {
    let parsed: Result<Value, String> = match entry.extension.to_ascii_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        _ => serde_json::from_str(text).map_err(|e| e.to_string()),
    };
    let value = match parsed {
        Ok(value) => value,
        Err(e) => {
            log::warn!("数据文件解析失败 {}: {}", entry.path, e);
            return vec![ImportResult::error(
                format!("{}: 数据文件解析失败", entry.path),
                e,
            )];
        }
    };

    let stem = entry
        .name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(&entry.name);

    if value.get("pages").is_some_and(Value::is_array) {
        let mut template: Template = match serde_json::from_value(value) {
            Ok(template) => template,
            Err(e) => {
                return vec![ImportResult::error(
                    format!("{}: 模板格式无效", entry.path),
                    e.to_string(),
                )];
            }
        };
        let taken: HashSet<&str> = project
            .templates
            .iter()
            .chain(&staged.templates)
            .map(|t| t.id.as_str())
            .collect();
        if template.id.is_empty() || taken.contains(template.id.as_str()) {
            template.id = format!("tpl-{}", Uuid::new_v4());
        }
        if template.name.is_empty() {
            template.name = stem.to_string();
        }

        let pages = template.pages.len();
        let result = ImportResult::success(
            format!("{}: 导入模板「{}」", entry.path, template.name),
            pages,
        );
        staged.templates.push(template);
        return vec![result];
    }

    if value.get("components").is_some_and(Value::is_array) {
        let mut library: Library = match serde_json::from_value(value) {
            Ok(library) => library,
            Err(e) => {
                return vec![ImportResult::error(
                    format!("{}: 组件库格式无效", entry.path),
                    e.to_string(),
                )];
            }
        };
        let taken: HashSet<&str> = project
            .libraries
            .iter()
            .chain(&staged.libraries)
            .map(|l| l.id.as_str())
            .collect();
        if library.id.is_empty() || taken.contains(library.id.as_str()) {
            library.id = format!("lib-{}", Uuid::new_v4());
        }
        if library.name.is_empty() {
            library.name = stem.to_string();
        }
        for component in library.components.iter_mut().filter(|c| c.id.is_empty()) {
            component.id = format!("comp-{}", Uuid::new_v4());
        }

        let count = library.components.len();
        let result = ImportResult::success(
            format!("{}: 导入组件库「{}」", entry.path, library.name),
            count,
        );
        staged.libraries.push(library);
        return vec![result];
    }

    vec![ImportResult::warning(format!(
        "{}: 无法识别的数据格式（缺少 pages 或 components 数组），已跳过",
        entry.path
    ))]
}

/// 将暂存的变更写回项目：读取当前列表 → 生成追加后的新列表 → 整体替换
fn apply_changes(
    project: &mut ProjectData,
    staged: StagedChanges,
    options: &MergeOptions,
    results: &mut Vec<ImportResult>,
) {
    let mut libraries = project.libraries.clone();

    if !staged.components.is_empty() {
        let count = staged.components.len();
        let (target_id, new_name) = match &options.target {
            ImportTarget::Existing(id) => (id.clone(), options.default_library_name.clone()),
            ImportTarget::New(name) => (format!("lib-{}", Uuid::new_v4()), name.clone()),
        };

        let library_name = match libraries.iter().position(|lib| lib.id == target_id) {
            Some(i) => {
                libraries[i].components.extend(staged.components);
                libraries[i].name.clone()
            }
            None => {
                libraries.push(Library {
                    id: target_id,
                    name: new_name.clone(),
                    components: staged.components,
                    extra: serde_json::Map::new(),
                });
                new_name
            }
        };

        results.push(ImportResult::success(
            format!("已添加 {} 个组件到组件库「{}」", count, library_name),
            count,
        ));
    }

    libraries.extend(staged.libraries);
    project.libraries = libraries;

    if !staged.templates.is_empty() {
        let mut templates = project.templates.clone();
        templates.extend(staged.templates);
        project.templates = templates;
    }
}

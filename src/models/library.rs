//! # 组件库、模板与导入结果数据模型
//!
//! 定义了项目中被导入流程触及的两个集合（`libraries` 和 `templates`）
//! 及其元素的 Rust 结构体，以及逐文件的导入结果 `ImportResult`。
//!
//! 设计决策：
//! - 项目文件中除 `libraries` / `templates` 外的字段（页面、画布等）由编辑器负责，
//!   这里通过 `#[serde(flatten)]` 原样保留，避免读取后保存时丢失未知字段。
//! - 所有字段都带 `#[serde(default)]`，以便接受外部导入的、字段不全的组件库 JSON。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::source::{DetectedElement, JoinType};

/// 单个 Join
///
/// 编号只保证在同一批导入内唯一，不与项目中已有的 Join 做全局校验。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Join {
    /// Join 类型
    #[serde(rename = "type")]
    pub join_type: JoinType,
    /// Join 编号（1..=65535）
    pub number: u32,
    /// 可选描述
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// 组件的附加配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentConfig {
    /// 原始源码片段，用于在编辑器中回显
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_code: Option<String>,
    /// 源码中声明的属性名
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub declared_props: Vec<String>,
    /// 扫描出的元素（供手动分配 Join 时参考）
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<DetectedElement>,
    /// 其余编辑器自有字段
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 组件库中的组件（导入流程的最终产物）
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface LibraryComponent {
///   id: string;
///   type: string;
///   name: string;
///   x: number; y: number; width: number; height: number;
///   joins: Record<string, Join>;
///   style: Record<string, unknown>;
///   config: ComponentConfig;
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LibraryComponent {
    /// 合并时生成的唯一 ID，此后保持稳定，永不复用
    pub id: String,
    /// 组件类型："custom-<slug>"
    #[serde(rename = "type")]
    pub component_type: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Join 映射：键为 "digital" / "analog" / "serial"
    pub joins: BTreeMap<String, Join>,
    pub style: Map<String, Value>,
    pub config: ComponentConfig,
}

/// 组件库
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Library {
    pub id: String,
    pub name: String,
    pub components: Vec<LibraryComponent>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 页面模板
///
/// 页面几何数据不属于导入流程的职责，`pages` 以原始 JSON 保存。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub pages: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 项目数据中被导入流程读写的部分
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectData {
    pub libraries: Vec<Library>,
    pub templates: Vec<Template>,
    /// 编辑器自有的其余字段，原样保留
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectData {
    /// 按 ID 查找组件库
    pub fn library(&self, id: &str) -> Option<&Library> {
        self.libraries.iter().find(|lib| lib.id == id)
    }
}

/// 导入结果级别（前端分别渲染为绿 / 黄 / 红）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Success,
    Warning,
    Error,
}

/// 单条导入结果
///
/// 每个文件或每个逻辑导入单元一条，仅用于展示。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub kind: ResultKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl ImportResult {
    pub fn success(message: impl Into<String>, count: usize) -> Self {
        Self {
            kind: ResultKind::Success,
            message: message.into(),
            details: None,
            count: Some(count),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: ResultKind::Warning,
            message: message.into(),
            details: None,
            count: None,
        }
    }

    pub fn error(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            kind: ResultKind::Error,
            message: message.into(),
            details: Some(details.into()),
            count: None,
        }
    }

    /// 附加详细信息
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// 附加数量
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

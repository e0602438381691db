//! # 压缩包条目与目录树数据模型
//!
//! 定义了压缩包条目（ArchiveEntry）、条目分类（Category）
//! 以及目录树视图（TreeView）的 Rust 结构体。
//!
//! 目录树视图是只读快照：每次选择/展开操作都会生成新的视图，
//! 前端只负责渲染，不做任何选择状态计算。

use serde::{Deserialize, Serialize};

/// 条目分类
///
/// 每个条目有且只有一个分类。被自动排除的条目统一归为 `Junk`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// UI 组件源码（tsx/jsx/vue/html 等）
    Component,
    /// 样式表
    Style,
    /// 配置文件
    Config,
    /// 图片资源
    Asset,
    /// 结构化数据（json/yaml 等），以及工具目录下的脚本
    Data,
    /// 自动排除的构建产物、锁文件、测试文件等
    Junk,
    /// 文档、文本及未识别的文件
    Other,
}

impl Category {
    /// 该分类的条目是否默认勾选
    pub fn selected_by_default(self) -> bool {
        matches!(
            self,
            Category::Component | Category::Style | Category::Data | Category::Asset
        )
    }
}

/// 压缩包原始条目（分类前）
///
/// 由压缩包读取器枚举得到，目录条目已被剔除。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    pub path: String,
    pub name: String,
    pub extension: String,
    pub size_bytes: u64,
}

/// 压缩包条目
///
/// 只有 `selected` 和 `auto_excluded` 会在导入流程中变化；
/// 导入流程重置时整组条目随之丢弃。
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface ArchiveEntry {
///   path: string;
///   name: string;
///   extension: string;
///   isDirectory: boolean;
///   sizeBytes: number;
///   category: Category;
///   autoExcluded: boolean;
///   selected: boolean;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    /// 压缩包内的相对路径（`/` 分隔）
    pub path: String,
    /// 文件名
    pub name: String,
    /// 小写扩展名（不含点）
    pub extension: String,
    /// 是否为目录（分类器输出中恒为 false）
    pub is_directory: bool,
    /// 解压后字节数
    pub size_bytes: u64,
    /// 分类
    pub category: Category,
    /// 是否被规则表自动排除
    pub auto_excluded: bool,
    /// 是否勾选导入
    pub selected: bool,
}

/// 目录的三态勾选状态（计算得出，不存储）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionState {
    All,
    None,
    Partial,
}

/// 目录树过滤条件
///
/// 过滤只影响渲染内容，绝不修改条目的 `selected` / `auto_excluded`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeFilter {
    /// 路径子串搜索（忽略大小写），空字符串表示不过滤
    pub search: String,
    /// 分类过滤，None 表示全部分类
    pub category: Option<Category>,
    /// 是否显示被自动排除的条目
    pub show_excluded: bool,
}

/// 目录节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryNode {
    /// 目录前缀，以 `/` 结尾（如 "src/components/"）
    pub prefix: String,
    /// 目录名（最后一级）
    pub name: String,
    /// 层级深度，顶层目录为 1
    pub depth: usize,
    /// 是否展开
    pub expanded: bool,
    /// 三态勾选状态
    pub selection: SelectionState,
    /// 过滤后直接位于该目录下的文件
    pub entries: Vec<ArchiveEntry>,
}

/// 目录树视图（IPC 返回给前端的唯一数据源）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeView {
    /// 过滤后位于压缩包根目录的文件
    pub root_files: Vec<ArchiveEntry>,
    /// 当前可见的目录节点，按前缀排序
    pub directories: Vec<DirectoryNode>,
    /// 条目总数
    pub total: usize,
    /// 通过过滤的条目数
    pub visible: usize,
    /// 已勾选的条目数
    pub selected: usize,
}

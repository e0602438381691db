//! # 源码与扫描结果数据模型
//!
//! 定义了源码文件（SourceFile）、扫描出的元素（DetectedElement）
//! 和提取出的组件（ParsedComponent）等 Rust 结构体，
//! 对应前端 TypeScript 中的同名接口。
//!
//! 这些结构体一经创建即不再修改，仅作为后续 Join 预填和合并导入的输入。

use serde::{Deserialize, Serialize};

/// Join 类型
///
/// 决定面板控件与外部控制系统之间的信号类型：
/// - `Digital`：布尔信号（按钮按下、开关状态）
/// - `Analog`：数值信号（滑块、音量、电平）
/// - `Serial`：文本信号（标签、标题、输入框文字）
///
/// 序列化为小写字符串（"digital" | "analog" | "serial"）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    Digital,
    Analog,
    Serial,
}

/// Join 方向
///
/// - `Input`：面板 → 控制系统（用户操作产生的信号）
/// - `Output`：控制系统 → 面板（绑定值、只读状态反馈）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinDirection {
    Input,
    Output,
}

/// 源码文件内容
///
/// 文本类文件（脚本、样式、数据）读取为 `Text`，
/// 图片等二进制资源保留原始字节。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "data")]
pub enum SourceContent {
    Text(String),
    Bytes(Vec<u8>),
}

/// 源码文件
///
/// 从磁盘读取或从压缩包条目解压时创建，读取后不可变。
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface SourceFile {
///   path: string;
///   name: string;
///   extension: string;
///   content: { kind: 'text' | 'bytes'; data: string | number[] };
///   sizeBytes: number;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    /// 文件路径：压缩包内的相对路径，或磁盘上的绝对路径
    pub path: String,
    /// 文件名（含扩展名）
    pub name: String,
    /// 小写扩展名（不含点），无扩展名时为空字符串
    pub extension: String,
    /// 文件内容
    pub content: SourceContent,
    /// 文件字节数
    pub size_bytes: u64,
}

impl SourceFile {
    /// 返回文本内容；二进制文件返回 None
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            SourceContent::Text(text) => Some(text),
            SourceContent::Bytes(_) => None,
        }
    }
}

/// 扫描出的单个标签元素
///
/// 由元素扫描器从一个开标签匹配中生成，仅用于预填 Join。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedElement {
    /// 元素标识："<tag>-<序号>"
    pub id: String,
    /// 可读名称：取自 id / name / aria-label 属性，缺省时与 `id` 相同
    pub display_name: String,
    /// 小写标签名
    pub tag: String,
    /// 是否为可交互元素
    pub interactive: bool,
    /// 建议的 Join 类型
    pub suggested_join_type: JoinType,
    /// 建议的 Join 方向
    pub suggested_direction: JoinDirection,
    /// 建议的 Join 编号（1100 + 序号）
    pub suggested_join_number: u32,
}

/// 从源码中提取出的组件
///
/// 每个导出的组件定义对应一条记录。用户在导入对话框中勾选后
/// 才会进入合并流程，否则随对话框关闭一起丢弃。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedComponent {
    /// 组件名（导出声明中的标识符）
    pub name: String,
    /// 参数列表中声明的属性名
    pub declared_props: Vec<String>,
    /// 组件定义对应的源码片段
    pub source_span: String,
    /// 片段中扫描出的元素
    pub detected_elements: Vec<DetectedElement>,
}

/// `parse_source` 的返回结果
///
/// `errors` 目前始终为空：提取过程只会降级，不会失败。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub components: Vec<ParsedComponent>,
    pub errors: Vec<String>,
}

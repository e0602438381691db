//! # 错误类型
//!
//! 导入流水线内部统一使用 `ImportError`。
//! 合并引擎在文件 / 条目边界把它转换为 `ImportResult`，
//! Tauri command 层则按惯例转换为 `String` 返回前端。

use thiserror::Error;

/// 导入流水线中可能出现的错误
#[derive(Debug, Error)]
pub enum ImportError {
    /// 读取磁盘文件失败
    #[error("读取文件失败 {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 写入磁盘文件失败
    #[error("写入文件失败 {path}: {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 压缩包格式无效或无法打开
    #[error("打开压缩包失败 {path}: {source}")]
    ArchiveOpen {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// 压缩包中不存在指定条目
    #[error("压缩包中不存在条目: {path}")]
    EntryNotFound { path: String },

    /// 条目解压或 UTF-8 解码失败
    #[error("读取压缩包条目失败 {path}: {message}")]
    EntryRead { path: String, message: String },

    /// 条目超过大小上限
    #[error("文件过大 {path}: {size} 字节（上限 {limit} 字节）")]
    TooLarge { path: String, size: u64, limit: u64 },

    /// 项目文件 JSON 无效
    #[error("解析项目文件失败 {path}: {source}")]
    ProjectParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// 导入配置 JSON 无效
    #[error("解析导入配置失败 {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// 序列化失败
    #[error("序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),

    /// 无法确定用户主目录
    #[error("无法获取用户主目录")]
    NoHomeDir,
}

/// 导入流水线的 Result 别名
pub type Result<T> = std::result::Result<T, ImportError>;

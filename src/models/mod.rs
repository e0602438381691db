//! # 数据模型模块
//!
//! 定义了与前端 TypeScript 类型一一对应的 Rust 数据结构。
//! 所有结构体均派生 `Serialize`（大部分同时派生 `Deserialize`），用于 Tauri IPC 传输和 JSON 文件读写。
//! - `source` - 源码文件、扫描元素和提取组件的数据结构
//! - `archive` - 压缩包条目、分类和目录树视图的数据结构
//! - `library` - 组件库、模板、Join 和导入结果的数据结构
//! - `settings` - 导入配置的数据结构

pub mod archive;
pub mod library;
pub mod settings;
pub mod source;

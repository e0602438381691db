//! # Tauri Command 处理模块
//!
//! 本模块包含所有注册到 Tauri 的 command 处理函数，仅在 `desktop` feature 下编译。
//! 每个子模块对应一个功能域：
//! - `import` - 粘贴代码、压缩包浏览与导入、单文件导入
//! - `settings` - 导入配置读写和临时备份查询

pub mod import;
pub mod settings;

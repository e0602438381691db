//! # 通用工具模块
//!
//! - `path` - 路径拆分、命名转换和配置目录定位

pub mod path;

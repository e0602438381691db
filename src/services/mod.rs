//! # 业务逻辑服务模块
//!
//! 包含导入流水线的核心实现，与 Tauri command 层解耦：
//! - `archive` - 压缩包枚举、条目解压、单文件读取
//! - `classifier` - 条目分类器：按路径规则分类并自动排除无关文件
//! - `tree` - 目录树快照：三态勾选、展开、过滤
//! - `extractor` - 组件提取：在源码中定位导出的组件并切片
//! - `element_scanner` - 元素扫描：识别标签并给出 Join 建议
//! - `joins` - Join 编号分配
//! - `merge` - 导入合并引擎：把勾选条目写入组件库 / 模板
//! - `store` - 项目文件与导入配置的读写
//! - `file_guard` - 文件写入守卫：覆写前备份
//! - `cache` - 内存缓存（压缩包会话 LRU、临时备份注册表）

pub mod archive;
pub mod cache;
pub mod classifier;
pub mod element_scanner;
pub mod extractor;
pub mod file_guard;
pub mod joins;
pub mod merge;
pub mod store;
pub mod tree;

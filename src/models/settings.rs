//! # 导入配置数据模型
//!
//! 定义了导入流程的用户配置（ImportConfig），
//! 存储在 `~/.panel-importer/import-config.json`。
//!
//! 对应前端 TypeScript 中的 `ImportConfig` 接口。

use serde::{Deserialize, Serialize};

/// 默认组件宽度
pub const DEFAULT_COMPONENT_WIDTH: f64 = 200.0;

/// 默认组件高度
pub const DEFAULT_COMPONENT_HEIGHT: f64 = 100.0;

/// 单个条目的默认大小上限：2 MiB
///
/// 超过该大小的源码文件几乎不可能是手写的 UI 定义（多为打包产物），
/// 直接跳过以免拖慢整个批次。
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 2 * 1024 * 1024;

/// 导入配置
///
/// 所有字段均有默认值：配置文件缺失或缺少字段时使用默认值补齐。
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface ImportConfig {
///   defaultWidth: number;
///   defaultHeight: number;
///   defaultLibraryName: string;
///   keepComponentCode: boolean;
///   maxEntryBytes: number;
///   autoBackup: boolean;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportConfig {
    /// 新组件的默认宽度（调用方提供的尺寸估计）
    pub default_width: f64,
    /// 新组件的默认高度
    pub default_height: f64,
    /// 目标组件库不存在时，新建组件库使用的名称
    pub default_library_name: String,
    /// 是否在组件的 `config.componentCode` 中保留源码片段
    pub keep_component_code: bool,
    /// 单个条目的大小上限（字节）
    pub max_entry_bytes: u64,
    /// 覆写项目文件前是否在同目录额外创建 `.bak` 备份
    pub auto_backup: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_width: DEFAULT_COMPONENT_WIDTH,
            default_height: DEFAULT_COMPONENT_HEIGHT,
            default_library_name: "Imported Components".to_string(),
            keep_component_code: true,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
            auto_backup: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ImportConfig =
            serde_json::from_str(r#"{"defaultWidth": 320, "autoBackup": true}"#).unwrap();
        assert_eq!(config.default_width, 320.0);
        assert_eq!(config.default_height, DEFAULT_COMPONENT_HEIGHT);
        assert!(config.auto_backup);
        assert!(config.keep_component_code);
        assert_eq!(config.max_entry_bytes, DEFAULT_MAX_ENTRY_BYTES);
    }
}

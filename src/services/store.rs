//! # 项目文件与导入配置读写服务
//!
//! - 项目文件：编辑器保存的 JSON，导入流程只改写 `libraries` / `templates`，
//!   其余字段经 `#[serde(flatten)]` 原样写回。覆写统一经过 `file_guard`。
//! - 导入配置：`~/.panel-importer/import-config.json`，缺失时使用默认值。

use std::path::{Path, PathBuf};

use crate::error::{ImportError, Result};
use crate::models::library::ProjectData;
use crate::models::settings::ImportConfig;
use crate::services::cache::AppCache;
use crate::services::file_guard;
use crate::utils::path;

/// 导入配置文件名
const CONFIG_FILE_NAME: &str = "import-config.json";

/// 读取项目文件
///
/// 文件不存在时返回空项目（新项目尚未保存过）。
///
/// # 错误
/// 文件存在但无法读取返回 `FileRead`，JSON 无效返回 `ProjectParse`
pub async fn read_project(file_path: &str) -> Result<ProjectData> {
    if !Path::new(file_path).exists() {
        return Ok(ProjectData::default());
    }

    let content = tokio::fs::read_to_string(file_path)
        .await
        .map_err(|source| ImportError::FileRead {
            path: file_path.to_string(),
            source,
        })?;

    parse_object(&content).map_err(|source| ImportError::ProjectParse {
        path: file_path.to_string(),
        source,
    })
}

/// 写回项目文件（2 空格缩进），写入前自动备份
///
/// # 返回值
/// 创建了临时备份时返回备份路径
pub async fn write_project(
    file_path: &str,
    project: &ProjectData,
    operation: &str,
    auto_backup: bool,
    cache: &AppCache,
) -> Result<Option<PathBuf>> {
    let content = serde_json::to_string_pretty(project)?;
    file_guard::safe_write_file(file_path, content.as_bytes(), operation, auto_backup, cache).await
}

/// 读取导入配置（`~/.panel-importer/import-config.json`）
pub async fn read_import_config() -> Result<ImportConfig> {
    load_config(&path::get_config_dir()?.join(CONFIG_FILE_NAME)).await
}

/// 读取导入配置，失败时记录警告并使用默认值
///
/// 供导入 command 使用：配置损坏不应阻止导入。
pub async fn import_config_or_default() -> ImportConfig {
    match read_import_config().await {
        Ok(config) => config,
        Err(e) => {
            log::warn!("读取导入配置失败，使用默认配置: {}", e);
            ImportConfig::default()
        }
    }
}

/// 保存导入配置，配置目录不存在时自动创建
pub async fn save_import_config(config: &ImportConfig) -> Result<()> {
    save_config(&path::get_config_dir()?.join(CONFIG_FILE_NAME), config).await
}

/// 从指定路径读取配置，文件不存在时返回默认配置
async fn load_config(config_path: &Path) -> Result<ImportConfig> {
    if !config_path.exists() {
        return Ok(ImportConfig::default());
    }

    let content = tokio::fs::read_to_string(config_path)
        .await
        .map_err(|source| ImportError::FileRead {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

    parse_object(&content).map_err(|source| ImportError::ConfigParse {
        path: config_path.to_string_lossy().to_string(),
        source,
    })
}

/// 解析顶层必须是 JSON 对象的文件
///
/// 结构体带 `#[serde(default)]` 时 serde 会把 `[]` 当作空序列接受，
/// 因此先按对象解析，再转换为目标类型。
fn parse_object<T: serde::de::DeserializeOwned>(content: &str) -> serde_json::Result<T> {
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;
    serde_json::from_value(serde_json::Value::Object(object))
}

/// 将配置写入指定路径
async fn save_config(config_path: &Path, config: &ImportConfig) -> Result<()> {
    if let Some(dir) = config_path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| ImportError::FileWrite {
                path: dir.to_string_lossy().to_string(),
                source,
            })?;
    }

    let content = serde_json::to_string_pretty(config)?;
    tokio::fs::write(config_path, content)
        .await
        .map_err(|source| ImportError::FileWrite {
            path: config_path.to_string_lossy().to_string(),
            source,
        })
}

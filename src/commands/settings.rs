//! # 设置 Tauri Commands
//!
//! - `get_config_dir` - 获取 `~/.panel-importer/` 路径
//! - `read_import_config` / `save_import_config` - 导入配置读写
//! - `get_temp_backups` - 本次运行期间创建的临时备份列表
//!
//! 导入配置存储在 `~/.panel-importer/import-config.json`，与项目文件完全隔离。

use tauri::State;

use crate::models::settings::ImportConfig;
use crate::services::cache::{AppCache, TempBackupEntry};
use crate::services::store;
use crate::utils::path;

/// 获取本应用配置目录的绝对路径
///
/// # 错误
/// 无法确定用户主目录时返回错误
#[tauri::command]
pub async fn get_config_dir() -> Result<String, String> {
    let dir = path::get_config_dir().map_err(|e| e.to_string())?;
    Ok(dir.to_string_lossy().to_string())
}

/// 读取导入配置
///
/// 配置文件不存在（首次使用）时返回默认配置。
///
/// # 错误
/// 文件存在但无法读取或 JSON 解析失败时返回错误
#[tauri::command]
pub async fn read_import_config() -> Result<ImportConfig, String> {
    store::read_import_config().await.map_err(|e| e.to_string())
}

/// 保存导入配置，配置目录不存在时自动创建
#[tauri::command]
pub async fn save_import_config(config: ImportConfig) -> Result<(), String> {
    store::save_import_config(&config)
        .await
        .map_err(|e| e.to_string())
}

/// 获取本次运行期间的临时备份列表
#[tauri::command]
pub async fn get_temp_backups(cache: State<'_, AppCache>) -> Result<Vec<TempBackupEntry>, String> {
    Ok(cache.temp_backups())
}

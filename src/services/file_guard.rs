//! # 文件写入守卫服务
//!
//! 统一项目文件的覆写操作，写入前先备份：
//!
//! ## 临时备份（强制）
//! 目标文件已存在时，先复制到系统 TEMP 目录（`$TMP/panel-importer-backups/`），
//! 并登记到 `AppCache` 的临时备份注册表，供用户在本次运行期间恢复。
//! 备份文件名为完整原始文件名 + 毫秒时间戳。
//!
//! ## 主动备份（可选）
//! `ImportConfig.autoBackup` 开启时，额外在原文件同目录创建 `.bak<timestamp>` 副本，
//! 作为持久化的历史快照。
//!
//! ## 使用方式
//! 所有对项目文件的覆写必须通过 `safe_write_file()`。

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ImportError, Result};
use crate::services::cache::{AppCache, TempBackupEntry};

/// 临时备份目录名（位于系统 TEMP 目录下）
const TEMP_BACKUP_DIR: &str = "panel-importer-backups";

/// 安全写入文件（统一入口）
///
/// 执行流程：
/// 1. 如果原文件存在，创建临时备份（强制）
/// 2. 如果启用主动备份且原文件存在，创建 `.bak` 文件（可选）
/// 3. 执行实际写入
///
/// # 参数
/// - `file_path` - 目标文件路径
/// - `content` - 要写入的字节内容
/// - `operation` - 操作描述（用于备份记录，如 "import_archive"）
/// - `auto_backup` - 是否创建同目录的主动备份
/// - `cache` - AppCache 引用，用于登记临时备份记录
///
/// # 返回值
/// 创建了临时备份时返回备份路径
///
/// # 错误
/// 备份创建失败或写入失败时返回 `ImportError::FileWrite`，此时原文件保持不变
pub async fn safe_write_file(
    file_path: &str,
    content: &[u8],
    operation: &str,
    auto_backup: bool,
    cache: &AppCache,
) -> Result<Option<PathBuf>> {
    let mut backup = None;

    if Path::new(file_path).exists() {
        let temp_dir = std::env::temp_dir().join(TEMP_BACKUP_DIR);
        backup = Some(create_temp_backup(file_path, &temp_dir, operation, cache).await?);

        if auto_backup {
            create_auto_backup(file_path).await?;
        }
    }

    tokio::fs::write(file_path, content)
        .await
        .map_err(|source| ImportError::FileWrite {
            path: file_path.to_string(),
            source,
        })?;

    log::info!("已写入 {}（{} 字节，操作：{}）", file_path, content.len(), operation);
    Ok(backup)
}

/// 当前 Unix 时间戳（毫秒）
fn unix_timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// 创建临时备份并登记到注册表
///
/// 备份路径格式：`<temp_dir>/<原始完整文件名>_<timestamp>.bak`
async fn create_temp_backup(
    file_path: &str,
    temp_dir: &Path,
    operation: &str,
    cache: &AppCache,
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(temp_dir)
        .await
        .map_err(|source| ImportError::FileWrite {
            path: temp_dir.to_string_lossy().to_string(),
            source,
        })?;

    let file_name = Path::new(file_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    let timestamp = unix_timestamp_millis();
    let backup_path = temp_dir.join(format!("{}_{}.bak", file_name, timestamp));

    tokio::fs::copy(file_path, &backup_path)
        .await
        .map_err(|source| ImportError::FileWrite {
            path: backup_path.to_string_lossy().to_string(),
            source,
        })?;

    cache.register_temp_backup(TempBackupEntry {
        original_path: file_path.to_string(),
        temp_path: backup_path.to_string_lossy().to_string(),
        created_at: timestamp.to_string(),
        operation: operation.to_string(),
    });
    log::debug!("已创建临时备份 {}", backup_path.display());

    Ok(backup_path)
}

/// 创建主动备份（与原文件同目录）
///
/// 备份路径格式：`<原始文件路径>.bak<timestamp>`
async fn create_auto_backup(file_path: &str) -> Result<()> {
    let backup_path = format!("{}.bak{}", file_path, unix_timestamp_millis());

    tokio::fs::copy(file_path, &backup_path)
        .await
        .map_err(|source| ImportError::FileWrite {
            path: backup_path.clone(),
            source,
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_file_is_written_without_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        let cache = AppCache::new();

        let backup = safe_write_file(path.to_str().unwrap(), b"{}", "test", false, &cache)
            .await
            .unwrap();

        assert!(backup.is_none());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert!(cache.temp_backups().is_empty());
    }

    #[tokio::test]
    async fn test_overwrite_creates_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(&path, "old").unwrap();
        let cache = AppCache::new();

        let backup = safe_write_file(path.to_str().unwrap(), b"new", "import", true, &cache)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "old");

        let registry = cache.temp_backups();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry[0].operation, "import");
        assert_eq!(registry[0].temp_path, backup.to_string_lossy());

        // 同目录的主动备份
        let sibling = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .find(|e| e.file_name().to_string_lossy().starts_with("project.json.bak"));
        let sibling = sibling.unwrap();
        assert_eq!(std::fs::read_to_string(sibling.path()).unwrap(), "old");

        std::fs::remove_file(backup).unwrap();
    }
}

//! # 内存缓存管理服务
//!
//! 提供导入流程在多次 IPC 调用之间共享的内存状态：
//! - **压缩包会话**：已打开的压缩包字节 + 当前的文件树快照，LRU 淘汰
//! - **临时备份注册表**：本次运行期间 `file_guard` 创建的所有临时备份
//!
//! ## 快照语义
//! 文件树是不可变快照。勾选 / 展开等操作由调用方基于旧快照生成新快照，
//! 再通过 `update_tree` 整体替换缓存中的快照，不会原地修改。
//!
//! ## 线程安全
//! 使用 `std::sync::RwLock` 保证多线程安全访问。
//! Tauri 的 command 可能在不同线程上并发执行，锁中毒时按"缓存未命中"处理。

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::services::archive::ZipBundle;
use crate::services::tree::ArchiveTree;

/// 同时保留的压缩包会话上限
///
/// 每个会话持有整个压缩包的字节，缓存满时淘汰最久未访问的会话。
const ARCHIVE_CACHE_MAX_ENTRIES: usize = 4;

/// 临时备份注册表中的单条记录
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface TempBackupEntry {
///   originalPath: string;
///   tempPath: string;
///   createdAt: string;
///   operation: string;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempBackupEntry {
    /// 被备份的原始文件路径
    pub original_path: String,
    /// 临时备份文件路径（在系统 TEMP 目录下）
    pub temp_path: String,
    /// 备份创建时间（Unix 毫秒时间戳）
    pub created_at: String,
    /// 触发备份的操作描述（如 "import_archive"）
    pub operation: String,
}

/// 应用全局缓存状态
///
/// 通过 Tauri 的 `manage()` 方法注册为应用状态，
/// 所有 command 函数可以通过 `State<AppCache>` 参数访问。
pub struct AppCache {
    /// 压缩包会话：以压缩包路径为 key
    archives: RwLock<HashMap<String, ArchiveSession>>,
    /// 临时备份注册表（按创建顺序）
    temp_backups: RwLock<Vec<TempBackupEntry>>,
}

/// 单个压缩包会话
struct ArchiveSession {
    bundle: ZipBundle,
    tree: ArchiveTree,
    /// 最后访问时间（用于 LRU 淘汰）
    last_accessed: Instant,
}

impl AppCache {
    /// 创建新的空缓存实例
    pub fn new() -> Self {
        Self {
            archives: RwLock::new(HashMap::new()),
            temp_backups: RwLock::new(Vec::new()),
        }
    }

    // ======== 压缩包会话方法 ========

    /// 登记一个新打开的压缩包会话
    ///
    /// 同一路径重复打开时覆盖旧会话（勾选状态重置）。
    /// 缓存已满且是新路径时，先淘汰最久未访问的会话。
    pub fn insert_archive(&self, path: &str, bundle: ZipBundle, tree: ArchiveTree) {
        let Ok(mut archives) = self.archives.write() else {
            return;
        };

        if archives.len() >= ARCHIVE_CACHE_MAX_ENTRIES && !archives.contains_key(path) {
            if let Some(oldest_key) = archives
                .iter()
                .min_by_key(|(_, session)| session.last_accessed)
                .map(|(key, _)| key.clone())
            {
                log::debug!("淘汰压缩包会话 {}", oldest_key);
                archives.remove(&oldest_key);
            }
        }

        archives.insert(
            path.to_string(),
            ArchiveSession {
                bundle,
                tree,
                last_accessed: Instant::now(),
            },
        );
    }

    /// 获取压缩包字节（共享引用，克隆开销很小）
    pub fn archive_bundle(&self, path: &str) -> Option<ZipBundle> {
        let mut archives = self.archives.write().ok()?;
        let session = archives.get_mut(path)?;
        session.last_accessed = Instant::now();
        Some(session.bundle.clone())
    }

    /// 获取当前的文件树快照
    pub fn archive_tree(&self, path: &str) -> Option<ArchiveTree> {
        let mut archives = self.archives.write().ok()?;
        let session = archives.get_mut(path)?;
        session.last_accessed = Instant::now();
        Some(session.tree.clone())
    }

    /// 基于当前快照生成新快照并替换
    ///
    /// # 返回值
    /// - `Some(tree)` - 替换后的新快照
    /// - `None` - 没有该压缩包的会话
    pub fn update_tree<F>(&self, path: &str, update: F) -> Option<ArchiveTree>
    where
        F: FnOnce(&ArchiveTree) -> ArchiveTree,
    {
        let mut archives = self.archives.write().ok()?;
        let session = archives.get_mut(path)?;
        let next = update(&session.tree);
        session.tree = next.clone();
        session.last_accessed = Instant::now();
        Some(next)
    }

    /// 关闭压缩包会话
    pub fn remove_archive(&self, path: &str) {
        if let Ok(mut archives) = self.archives.write() {
            archives.remove(path);
        }
    }

    // ======== 临时备份注册表方法 ========

    /// 登记一次临时备份
    pub fn register_temp_backup(&self, entry: TempBackupEntry) {
        if let Ok(mut backups) = self.temp_backups.write() {
            backups.push(entry);
        }
    }

    /// 本次运行期间创建的全部临时备份（按创建顺序）
    pub fn temp_backups(&self) -> Vec<TempBackupEntry> {
        self.temp_backups
            .read()
            .map(|backups| backups.clone())
            .unwrap_or_default()
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::archive::RawEntry;
    use crate::services::classifier::classify_archive;

    fn session(path: &str) -> (ZipBundle, ArchiveTree) {
        let bundle = ZipBundle::from_bytes(path, Vec::new());
        let tree = ArchiveTree::new(classify_archive(&[RawEntry {
            path: "src/App.tsx".to_string(),
            name: "App.tsx".to_string(),
            extension: "tsx".to_string(),
            size_bytes: 10,
        }]));
        (bundle, tree)
    }

    #[test]
    fn test_update_tree_replaces_snapshot() {
        let cache = AppCache::new();
        let (bundle, tree) = session("a.zip");
        cache.insert_archive("a.zip", bundle, tree);

        let before = cache.archive_tree("a.zip").unwrap();
        let after = cache
            .update_tree("a.zip", |tree| tree.toggle_entry("src/App.tsx"))
            .unwrap();

        assert!(before.entry("src/App.tsx").unwrap().selected);
        assert!(!after.entry("src/App.tsx").unwrap().selected);
        assert!(!cache.archive_tree("a.zip").unwrap().entry("src/App.tsx").unwrap().selected);
        assert!(cache.update_tree("missing.zip", |tree| tree.clone()).is_none());
    }

    #[test]
    fn test_least_recently_used_session_is_evicted() {
        let cache = AppCache::new();
        for i in 0..ARCHIVE_CACHE_MAX_ENTRIES {
            let path = format!("{i}.zip");
            let (bundle, tree) = session(&path);
            cache.insert_archive(&path, bundle, tree);
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        // 访问 0.zip，使 1.zip 成为最久未访问的会话
        assert!(cache.archive_bundle("0.zip").is_some());
        let (bundle, tree) = session("new.zip");
        cache.insert_archive("new.zip", bundle, tree);

        assert!(cache.archive_tree("0.zip").is_some());
        assert!(cache.archive_tree("1.zip").is_none());
        assert!(cache.archive_tree("new.zip").is_some());

        cache.remove_archive("new.zip");
        assert!(cache.archive_bundle("new.zip").is_none());
    }

    #[test]
    fn test_temp_backup_registry_keeps_order() {
        let cache = AppCache::default();
        for op in ["first", "second"] {
            cache.register_temp_backup(TempBackupEntry {
                original_path: "/p/project.json".to_string(),
                temp_path: format!("/tmp/{op}.bak"),
                created_at: "0".to_string(),
                operation: op.to_string(),
            });
        }
        let ops: Vec<String> = cache.temp_backups().into_iter().map(|e| e.operation).collect();
        assert_eq!(ops, vec!["first", "second"]);
    }
}

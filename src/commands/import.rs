//! # 导入 Tauri Commands
//!
//! 导入面板的三个入口及其辅助操作：
//! - `parse_source` / `classify_archive` - 纯计算，不触碰磁盘
//! - `open_archive` / `archive_view` / `close_archive` - 压缩包会话与文件树视图
//! - `toggle_entry` / `toggle_directory` / `select_all` / `set_expanded` - 文件树交互
//! - `import_archive` / `import_source_file` - 执行合并并写回项目文件
//!
//! 文件树状态保存在 `AppCache` 中，每次交互返回新的 `TreeView`。

use tauri::State;

use crate::models::archive::{ArchiveEntry, RawEntry, TreeFilter, TreeView};
use crate::models::library::ImportResult;
use crate::models::source::{ParseOutcome, SourceContent};
use crate::services::archive::{self, EntryReader, MemoryReader, ZipBundle};
use crate::services::cache::AppCache;
use crate::services::classifier;
use crate::services::extractor;
use crate::services::merge::{self, ImportTarget, MergeOptions};
use crate::services::store;
use crate::services::tree::ArchiveTree;

/// 解析一段组件源码（粘贴代码入口）
#[tauri::command]
pub fn parse_source(text: String) -> ParseOutcome {
    extractor::parse_source(&text)
}

/// 对前端自行枚举的条目列表进行分类
#[tauri::command]
pub fn classify_archive(entries: Vec<RawEntry>) -> Vec<ArchiveEntry> {
    classifier::classify_archive(&entries)
}

/// 打开压缩包并返回初始文件树视图
///
/// 同一压缩包重复打开时，之前的勾选状态被重置。
///
/// # 错误
/// 文件不可读或不是有效的 ZIP 时返回错误
#[tauri::command]
pub async fn open_archive(
    archive_path: String,
    filter: Option<TreeFilter>,
    cache: State<'_, AppCache>,
) -> Result<TreeView, String> {
    let bundle = ZipBundle::open(&archive_path)
        .await
        .map_err(|e| e.to_string())?;
    let raw = bundle.list_entries().map_err(|e| e.to_string())?;
    let tree = ArchiveTree::new(classifier::classify_archive(&raw));
    log::info!(
        "压缩包 {} 共 {} 个文件，默认勾选 {} 个",
        archive_path,
        tree.entries().len(),
        tree.selected_entries().len()
    );

    let view = tree.view(&filter.unwrap_or_default());
    cache.insert_archive(&archive_path, bundle, tree);
    Ok(view)
}

/// 按过滤条件重新生成文件树视图（搜索框 / 分类筛选）
#[tauri::command]
pub async fn archive_view(
    archive_path: String,
    filter: Option<TreeFilter>,
    cache: State<'_, AppCache>,
) -> Result<TreeView, String> {
    let tree = cache
        .archive_tree(&archive_path)
        .ok_or_else(|| not_open(&archive_path))?;
    Ok(tree.view(&filter.unwrap_or_default()))
}

/// 关闭压缩包会话，释放缓存的压缩包字节
#[tauri::command]
pub async fn close_archive(archive_path: String, cache: State<'_, AppCache>) -> Result<(), String> {
    cache.remove_archive(&archive_path);
    Ok(())
}

/// 切换单个文件的勾选状态（自动排除的条目不受影响）
#[tauri::command]
pub async fn toggle_entry(
    archive_path: String,
    entry_path: String,
    filter: Option<TreeFilter>,
    cache: State<'_, AppCache>,
) -> Result<TreeView, String> {
    update_view(&cache, &archive_path, filter, |tree| {
        tree.toggle_entry(&entry_path)
    })
}

/// 勾选或取消勾选目录下的全部文件
#[tauri::command]
pub async fn toggle_directory(
    archive_path: String,
    prefix: String,
    select: bool,
    filter: Option<TreeFilter>,
    cache: State<'_, AppCache>,
) -> Result<TreeView, String> {
    update_view(&cache, &archive_path, filter, |tree| {
        tree.toggle_directory_selection(&prefix, select)
    })
}

/// 全选 / 全不选
#[tauri::command]
pub async fn select_all(
    archive_path: String,
    select: bool,
    filter: Option<TreeFilter>,
    cache: State<'_, AppCache>,
) -> Result<TreeView, String> {
    update_view(&cache, &archive_path, filter, |tree| tree.select_all(select))
}

/// 展开或折叠目录
#[tauri::command]
pub async fn set_expanded(
    archive_path: String,
    prefix: String,
    expanded: bool,
    filter: Option<TreeFilter>,
    cache: State<'_, AppCache>,
) -> Result<TreeView, String> {
    update_view(&cache, &archive_path, filter, |tree| {
        tree.set_expanded(&prefix, expanded)
    })
}

/// 将压缩包中勾选的条目导入项目
///
/// # 参数
/// - `archive_path` - 已通过 `open_archive` 打开的压缩包路径
/// - `project_path` - 项目文件路径
/// - `target` - 目标组件库
///
/// # 返回值
/// 逐文件的导入结果
///
/// # 错误
/// 仅在压缩包会话不存在、项目文件无法读取或写回失败时返回错误；
/// 单个文件的失败体现在结果列表中
#[tauri::command]
pub async fn import_archive(
    archive_path: String,
    project_path: String,
    target: ImportTarget,
    cache: State<'_, AppCache>,
) -> Result<Vec<ImportResult>, String> {
    let bundle = cache
        .archive_bundle(&archive_path)
        .ok_or_else(|| not_open(&archive_path))?;
    let tree = cache
        .archive_tree(&archive_path)
        .ok_or_else(|| not_open(&archive_path))?;

    let mut reader = bundle.reader().map_err(|e| e.to_string())?;
    merge_and_save(
        &project_path,
        &tree.selected_entries(),
        &mut reader,
        target,
        "import_archive",
        &cache,
    )
    .await
}

/// 导入单个磁盘源码文件（组件代码或数据文件）
#[tauri::command]
pub async fn import_source_file(
    file_path: String,
    project_path: String,
    target: ImportTarget,
    cache: State<'_, AppCache>,
) -> Result<Vec<ImportResult>, String> {
    let source = archive::load_source_file(&file_path)
        .await
        .map_err(|e| e.to_string())?;
    let entry = merge::single_file_entry(&source);

    let SourceContent::Text(text) = source.content else {
        return Ok(vec![ImportResult::warning(format!(
            "{}: 不是文本文件，无法导入",
            source.name
        ))]);
    };

    let mut reader = MemoryReader::new();
    reader.insert(entry.path.clone(), text);
    merge_and_save(
        &project_path,
        &[entry],
        &mut reader,
        target,
        "import_source_file",
        &cache,
    )
    .await
}

/// 读取项目 → 合并 → 有变更时写回
async fn merge_and_save<R: EntryReader + Send>(
    project_path: &str,
    entries: &[ArchiveEntry],
    reader: &mut R,
    target: ImportTarget,
    operation: &str,
    cache: &AppCache,
) -> Result<Vec<ImportResult>, String> {
    let config = store::import_config_or_default().await;
    let mut project = store::read_project(project_path)
        .await
        .map_err(|e| e.to_string())?;
    let before = project.clone();

    let options = MergeOptions::from_config(&config, target);
    let results = merge::merge_import(&mut project, entries, reader, &options).await;

    if project != before {
        store::write_project(project_path, &project, operation, config.auto_backup, cache)
            .await
            .map_err(|e| e.to_string())?;
    }
    Ok(results)
}

/// 基于缓存中的快照生成新快照，并返回新视图
fn update_view<F>(
    cache: &AppCache,
    archive_path: &str,
    filter: Option<TreeFilter>,
    update: F,
) -> Result<TreeView, String>
where
    F: FnOnce(&ArchiveTree) -> ArchiveTree,
{
    let tree = cache
        .update_tree(archive_path, update)
        .ok_or_else(|| not_open(archive_path))?;
    Ok(tree.view(&filter.unwrap_or_default()))
}

fn not_open(archive_path: &str) -> String {
    format!("压缩包未打开或已被关闭: {}", archive_path)
}

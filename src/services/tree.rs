//! # 压缩包目录树与勾选模型
//!
//! 把分类后的扁平条目列表组织成可过滤、可批量勾选的目录树。
//!
//! ## 快照模型
//! `ArchiveTree` 是不可变快照：条目存放在数组中，另有按路径的索引。
//! 每次勾选 / 展开操作都返回一个新快照，调用方（AppCache）整体替换旧快照，
//! 不在共享集合上做原地修改。
//!
//! ## 支持的操作
//! - `toggle_entry` - 翻转单个条目的勾选；自动排除的条目不受影响
//! - `toggle_directory_selection` - 设置目录前缀下所有未排除条目的勾选
//! - `select_all` - 即前缀为空的 `toggle_directory_selection`
//! - `set_expanded` - 展开 / 折叠目录
//!
//! ## 分组与可见性
//! 根目录文件单独成组；其余文件按所在目录前缀（含结尾 `/`）分组，
//! 祖先目录即使没有直属文件也会生成节点。初始时展开所有顶层目录；
//! 一个目录只有在其所有祖先目录都展开时才可见。
//!
//! 过滤（路径搜索、分类、是否显示排除项）在分组之前执行，只影响渲染结果。

use std::collections::{BTreeMap, BTreeSet, HashMap};

use memchr::memmem;

use crate::models::archive::{
    ArchiveEntry, DirectoryNode, SelectionState, TreeFilter, TreeView,
};
use crate::utils::path::{dir_prefix, parent_prefix, prefix_depth};

/// 目录树快照
#[derive(Debug, Clone, Default)]
pub struct ArchiveTree {
    /// 条目数组（保持压缩包中的原始顺序）
    entries: Vec<ArchiveEntry>,
    /// 路径 → 数组下标
    index: HashMap<String, usize>,
    /// 已展开的目录前缀
    expanded: BTreeSet<String>,
}

impl ArchiveTree {
    /// 由分类后的条目创建快照，所有顶层目录初始展开
    pub fn new(entries: Vec<ArchiveEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.path.clone(), i))
            .collect();
        let expanded = entries
            .iter()
            .filter_map(|entry| entry.path.find('/').map(|idx| entry.path[..=idx].to_string()))
            .collect();

        Self {
            entries,
            index,
            expanded,
        }
    }

    /// 全部条目
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// 按路径查找条目
    pub fn entry(&self, path: &str) -> Option<&ArchiveEntry> {
        self.index.get(path).map(|&i| &self.entries[i])
    }

    /// 已勾选的条目（保持原始顺序，导入时按此顺序处理）
    pub fn selected_entries(&self) -> Vec<ArchiveEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.selected)
            .cloned()
            .collect()
    }

    /// 翻转单个条目的勾选状态
    ///
    /// 条目不存在或被自动排除时返回内容相同的快照。
    pub fn toggle_entry(&self, path: &str) -> Self {
        let mut next = self.clone();
        if let Some(&i) = self.index.get(path) {
            let entry = &mut next.entries[i];
            if !entry.auto_excluded {
                entry.selected = !entry.selected;
            }
        }
        next
    }

    /// 将前缀下所有未排除条目的勾选状态设为 `select`
    ///
    /// # 参数
    /// - `prefix` - 目录前缀，缺少结尾 `/` 时自动补齐；空字符串表示全部条目
    /// - `select` - 目标勾选状态
    pub fn toggle_directory_selection(&self, prefix: &str, select: bool) -> Self {
        let prefix = normalize_prefix(prefix);
        let mut next = self.clone();
        for entry in next
            .entries
            .iter_mut()
            .filter(|entry| !entry.auto_excluded && entry.path.starts_with(prefix.as_str()))
        {
            entry.selected = select;
        }
        next
    }

    /// 全选 / 全不选（自动排除的条目不受影响）
    pub fn select_all(&self, select: bool) -> Self {
        self.toggle_directory_selection("", select)
    }

    /// 展开或折叠目录
    pub fn set_expanded(&self, prefix: &str, expanded: bool) -> Self {
        let prefix = normalize_prefix(prefix);
        let mut next = self.clone();
        if expanded {
            next.expanded.insert(prefix);
        } else {
            next.expanded.remove(&prefix);
        }
        next
    }

    /// 目录是否展开
    pub fn is_expanded(&self, prefix: &str) -> bool {
        self.expanded.contains(&normalize_prefix(prefix))
    }

    /// 计算目录的三态勾选状态
    ///
    /// 只统计前缀下未被自动排除的条目（含子目录），与过滤条件无关。
    /// 没有可勾选条目的目录视为 `None`。
    pub fn directory_state(&self, prefix: &str) -> SelectionState {
        let prefix = normalize_prefix(prefix);
        let (selected, total) = self
            .entries
            .iter()
            .filter(|entry| !entry.auto_excluded && entry.path.starts_with(prefix.as_str()))
            .fold((0usize, 0usize), |(s, t), entry| {
                (s + usize::from(entry.selected), t + 1)
            });

        if total > 0 && selected == total {
            SelectionState::All
        } else if selected == 0 {
            SelectionState::None
        } else {
            SelectionState::Partial
        }
    }

    /// 按过滤条件生成目录树视图
    pub fn view(&self, filter: &TreeFilter) -> TreeView {
        let needle = filter.search.trim().to_lowercase();
        let finder = memmem::Finder::new(needle.as_bytes());

        let filtered: Vec<&ArchiveEntry> = self
            .entries
            .iter()
            .filter(|entry| filter.show_excluded || !entry.auto_excluded)
            .filter(|entry| filter.category.is_none_or(|c| c == entry.category))
            .filter(|entry| {
                needle.is_empty()
                    || finder
                        .find(entry.path.to_lowercase().as_bytes())
                        .is_some()
            })
            .collect();

        // 分组：根目录文件 + 目录前缀 → 直属文件
        let mut root_files = Vec::new();
        let mut buckets: BTreeMap<String, Vec<ArchiveEntry>> = BTreeMap::new();
        for entry in &filtered {
            match dir_prefix(&entry.path) {
                None => root_files.push((*entry).clone()),
                Some(prefix) => {
                    buckets
                        .entry(prefix.to_string())
                        .or_default()
                        .push((*entry).clone());
                    // 补齐没有直属文件的祖先目录
                    let mut ancestor = parent_prefix(prefix);
                    while let Some(p) = ancestor {
                        buckets.entry(p.to_string()).or_default();
                        ancestor = parent_prefix(p);
                    }
                }
            }
        }

        let directories = buckets
            .into_iter()
            .filter(|(prefix, _)| self.ancestors_expanded(prefix))
            .map(|(prefix, entries)| DirectoryNode {
                name: prefix
                    .trim_end_matches('/')
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_string(),
                depth: prefix_depth(&prefix),
                expanded: self.expanded.contains(&prefix),
                selection: self.directory_state(&prefix),
                entries,
                prefix,
            })
            .collect();

        TreeView {
            root_files,
            directories,
            total: self.entries.len(),
            visible: filtered.len(),
            selected: self.entries.iter().filter(|e| e.selected).count(),
        }
    }

    /// 目录的所有祖先是否都已展开（顶层目录恒为 true）
    fn ancestors_expanded(&self, prefix: &str) -> bool {
        let mut ancestor = parent_prefix(prefix);
        while let Some(p) = ancestor {
            if !self.expanded.contains(p) {
                return false;
            }
            ancestor = parent_prefix(p);
        }
        true
    }
}

/// 补齐目录前缀结尾的 `/`；空前缀保持为空
fn normalize_prefix(prefix: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{}/", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::archive::{Category, RawEntry};
    use crate::services::classifier::classify_archive;
    use crate::utils::path::split_file_name;
    use proptest::prelude::*;

    fn tree(paths: &[&str]) -> ArchiveTree {
        let raws: Vec<RawEntry> = paths
            .iter()
            .map(|path| {
                let (name, extension) = split_file_name(path);
                RawEntry {
                    path: path.to_string(),
                    name,
                    extension,
                    size_bytes: 1,
                }
            })
            .collect();
        ArchiveTree::new(classify_archive(&raws))
    }

    fn sample() -> ArchiveTree {
        tree(&[
            "index.html",
            "src/App.tsx",
            "src/components/Button.tsx",
            "src/components/Slider.tsx",
            "src/components/ui/Knob.tsx",
            "src/styles/main.css",
            "node_modules/react/index.js",
            "README.md",
        ])
    }

    #[test]
    fn test_tri_state() {
        let t = sample();
        assert_eq!(t.directory_state("src/components/"), SelectionState::All);

        let t = t.toggle_entry("src/components/ui/Knob.tsx");
        // Button, Slider 勾选，Knob 未勾选
        assert_eq!(t.directory_state("src/components/"), SelectionState::Partial);
        assert_eq!(t.directory_state("src/components/ui/"), SelectionState::None);

        let t = t.toggle_directory_selection("src/components", false);
        assert_eq!(t.directory_state("src/components/"), SelectionState::None);
        assert_eq!(t.directory_state("src/"), SelectionState::Partial);
    }

    #[test]
    fn test_excluded_entries_ignore_toggles() {
        let t = sample();
        let path = "node_modules/react/index.js";
        assert!(!t.entry(path).unwrap().selected);

        let toggled = t.toggle_entry(path);
        assert!(!toggled.entry(path).unwrap().selected);

        let all = t.select_all(true);
        assert!(!all.entry(path).unwrap().selected);
        assert!(all.entry("src/App.tsx").unwrap().selected);

        let none = all.select_all(false);
        assert!(none.selected_entries().is_empty());
    }

    #[test]
    fn test_snapshots_are_independent() {
        let before = sample();
        let after = before.toggle_entry("src/App.tsx");
        assert!(before.entry("src/App.tsx").unwrap().selected);
        assert!(!after.entry("src/App.tsx").unwrap().selected);
    }

    #[test]
    fn test_initial_view_shows_top_level_and_children_of_expanded() {
        let view = sample().view(&TreeFilter::default());
        let prefixes: Vec<&str> = view.directories.iter().map(|d| d.prefix.as_str()).collect();
        // node_modules 被隐藏；ui/ 的父目录 components/ 未展开
        assert_eq!(prefixes, vec!["src/", "src/components/", "src/styles/"]);
        assert_eq!(view.root_files.len(), 1);
        assert_eq!(view.root_files[0].path, "index.html");
        assert_eq!(view.total, 8);
        assert_eq!(view.visible, 6);

        let src = &view.directories[0];
        assert!(src.expanded);
        assert_eq!(src.depth, 1);
        assert_eq!(src.name, "src");
        assert_eq!(src.entries.len(), 1);

        assert!(sample().is_expanded("src"));
        assert!(!sample().is_expanded("src/components/"));

        let expanded = sample().set_expanded("src/components/", true);
        assert!(expanded.is_expanded("src/components"));
        let view = expanded.view(&TreeFilter::default());
        assert!(view
            .directories
            .iter()
            .any(|d| d.prefix == "src/components/ui/" && d.depth == 3));

        let collapsed = sample().set_expanded("src", false);
        let view = collapsed.view(&TreeFilter::default());
        let prefixes: Vec<&str> = view.directories.iter().map(|d| d.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["src/"]);
    }

    #[test]
    fn test_filters_do_not_mutate_state() {
        let t = sample();
        let filter = TreeFilter {
            search: "BUTTON".to_string(),
            category: Some(Category::Component),
            show_excluded: false,
        };
        let view = t.view(&filter);
        assert_eq!(view.visible, 1);
        assert!(view.root_files.is_empty());
        let components = view
            .directories
            .iter()
            .find(|d| d.prefix == "src/components/")
            .unwrap();
        assert_eq!(components.entries[0].name, "Button.tsx");
        assert_eq!(view.selected, t.selected_entries().len());

        let with_excluded = t.view(&TreeFilter {
            show_excluded: true,
            ..TreeFilter::default()
        });
        assert_eq!(with_excluded.visible, 8);
        assert!(with_excluded
            .directories
            .iter()
            .any(|d| d.prefix == "node_modules/"));
    }

    proptest! {
        #[test]
        fn prop_toggle_on_excluded_is_noop(times in 1usize..6) {
            let mut t = sample();
            for _ in 0..times {
                t = t.toggle_entry("README.md");
            }
            let entry = t.entry("README.md").unwrap();
            prop_assert!(entry.auto_excluded);
            prop_assert!(!entry.selected);
        }
    }
}

//! # 压缩包条目分类器
//!
//! 根据固定的规则表，为压缩包中的每个文件条目确定分类（Category）
//! 和是否自动排除。纯函数：只看路径、文件名和扩展名，不读取内容。
//!
//! ## 自动排除规则（任一命中即排除，分类记为 Junk）
//! 1. 任一路径段是构建 / 版本控制 / 缓存目录（node_modules、dist、.git ...）
//! 2. 任一路径段以 `.` 开头（隐藏文件或目录）
//! 3. 文件名是已知的非 UI 文件（锁文件、许可证、README ...）
//! 4. 扩展名是 source map、二进制、字体、音视频、编译产物
//! 5. 文件名符合测试 / stories / 类型声明 / 压缩产物的后缀约定
//!
//! ## 分类规则（未排除的条目）
//! 1. 已知配置文件名或 `*.config.*` → Config
//! 2. 脚本 / 标记扩展名 → Component；位于配置目录下降级为 Config，位于工具目录下降级为 Data
//! 3. 样式表 → Style；结构化数据 → Data；图片 → Asset；配置格式 → Config
//! 4. 文档 / 文本及其余一切 → Other
//!
//! ## 默认勾选
//! 未排除且分类为 Component / Style / Data / Asset 的条目默认勾选。
//! Config / Other 仅用于展示，默认不勾选。

use std::sync::LazyLock;

use regex::Regex;

use crate::models::archive::{ArchiveEntry, Category, RawEntry};

/// 构建产物、版本控制、缓存和测试目录
const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "bower_components",
    "jspm_packages",
    "dist",
    "build",
    "out",
    "target",
    "coverage",
    "storybook-static",
    "__pycache__",
    "__tests__",
    "__mocks__",
    "__snapshots__",
    "__MACOSX",
    "vendor",
    "tmp",
    "temp",
];

/// 已知的非 UI 文件名（忽略大小写）
const EXCLUDED_FILES: &[&str] = &[
    "package-lock.json",
    "npm-shrinkwrap.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
    "composer.lock",
    "license",
    "license.md",
    "license.txt",
    "readme",
    "readme.md",
    "readme.txt",
    "changelog.md",
    "contributing.md",
    "code_of_conduct.md",
    "thumbs.db",
    "desktop.ini",
];

/// 排除的扩展名
const EXCLUDED_EXTENSIONS: &[&str] = &[
    // source map / 编译产物
    "map", "tsbuildinfo", "class", "pyc", "o", "obj", "a", "lib", "wasm", "jar",
    // 二进制 / 压缩包
    "exe", "dll", "so", "dylib", "bin", "zip", "tar", "gz", "tgz", "rar", "7z",
    // 字体
    "woff", "woff2", "ttf", "otf", "eot",
    // 音视频
    "mp3", "mp4", "wav", "ogg", "webm", "mov", "avi", "flac", "m4a",
    // 日志 / 锁
    "log", "lock", "lockb",
];

/// 测试、stories、类型声明和压缩产物的文件名后缀
static EXCLUDED_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\.(?:test|spec|stories|story|e2e|cy)\.[a-z0-9]+$|\.d\.[cm]?ts$|\.min\.(?:js|css)$|\.snap$",
    )
    .unwrap()
});

/// UI 代码扩展名
const COMPONENT_EXTENSIONS: &[&str] = &[
    "tsx", "jsx", "ts", "js", "mjs", "cjs", "vue", "svelte", "astro", "html", "htm",
];

/// 样式表扩展名
const STYLE_EXTENSIONS: &[&str] = &["css", "scss", "sass", "less", "styl"];

/// 结构化数据扩展名
const DATA_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "xml", "csv"];

/// 图片扩展名
const ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "bmp", "avif",
];

/// 配置格式扩展名
const CONFIG_EXTENSIONS: &[&str] = &["toml", "ini", "cfg", "conf", "env"];

/// 已知配置文件名（忽略大小写）
const CONFIG_FILES: &[&str] = &[
    "package.json",
    "tsconfig.json",
    "jsconfig.json",
    "tsconfig.app.json",
    "tsconfig.node.json",
    "components.json",
    "angular.json",
    "vercel.json",
    "manifest.json",
    "browserslist",
];

/// `vite.config.ts` / `tailwind.config.js` 等
static CONFIG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.config\.(?:[cm]?[jt]s|json)$").unwrap());

/// 配置目录：其中的脚本降级为 Config
const CONFIG_DIRS: &[&str] = &["config", "configs", "constants", "settings", "env"];

/// 工具 / 逻辑目录：其中的脚本降级为 Data
const UTILITY_DIRS: &[&str] = &[
    "utils", "util", "helpers", "helper", "lib", "services", "api", "store", "stores", "types",
];

/// 单个条目的分类结论
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub auto_excluded: bool,
}

impl Classification {
    /// 条目的默认勾选状态
    pub fn selected_by_default(&self) -> bool {
        !self.auto_excluded && self.category.selected_by_default()
    }
}

/// 对一个文件条目进行分类
///
/// # 参数
/// - `path` - 压缩包内的相对路径（`/` 分隔）
/// - `name` - 文件名
/// - `extension` - 扩展名（不含点，忽略大小写）
pub fn classify(path: &str, name: &str, extension: &str) -> Classification {
    let extension = extension.to_ascii_lowercase();
    let extension = extension.as_str();
    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    if is_auto_excluded(&segments, name, extension) {
        return Classification {
            category: Category::Junk,
            auto_excluded: true,
        };
    }

    Classification {
        category: categorize(&segments, name, extension),
        auto_excluded: false,
    }
}

/// 只按分类规则计算分类，忽略自动排除规则
///
/// 用于用户显式选择的单个文件：测试文件等同样可以被导入。
pub fn category_of(path: &str, name: &str, extension: &str) -> Category {
    let extension = extension.to_ascii_lowercase();
    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    categorize(&segments, name, &extension)
}

/// 批量分类压缩包条目
///
/// 以 `/` 结尾的目录条目会被剔除；输出顺序与输入一致。
pub fn classify_archive(entries: &[RawEntry]) -> Vec<ArchiveEntry> {
    entries
        .iter()
        .filter(|raw| !raw.path.ends_with('/'))
        .map(classify_entry)
        .collect()
}

/// 将一个原始条目分类为 `ArchiveEntry`
pub fn classify_entry(raw: &RawEntry) -> ArchiveEntry {
    let verdict = classify(&raw.path, &raw.name, &raw.extension);
    ArchiveEntry {
        path: raw.path.clone(),
        name: raw.name.clone(),
        extension: raw.extension.clone(),
        is_directory: false,
        size_bytes: raw.size_bytes,
        category: verdict.category,
        auto_excluded: verdict.auto_excluded,
        selected: verdict.selected_by_default(),
    }
}

/// 自动排除判断
fn is_auto_excluded(segments: &[&str], name: &str, extension: &str) -> bool {
    let excluded_segment = segments.iter().any(|segment| {
        segment.starts_with('.')
            || EXCLUDED_DIRS
                .iter()
                .any(|dir| segment.eq_ignore_ascii_case(dir))
    });
    if excluded_segment {
        return true;
    }

    if EXCLUDED_FILES
        .iter()
        .any(|file| name.eq_ignore_ascii_case(file))
    {
        return true;
    }

    EXCLUDED_EXTENSIONS.contains(&extension) || EXCLUDED_SUFFIX_RE.is_match(name)
}

/// 未排除条目的分类
fn categorize(segments: &[&str], name: &str, extension: &str) -> Category {
    if CONFIG_FILES
        .iter()
        .any(|file| name.eq_ignore_ascii_case(file))
        || CONFIG_NAME_RE.is_match(name)
    {
        return Category::Config;
    }

    // 目录段：去掉最后的文件名
    let dirs = &segments[..segments.len().saturating_sub(1)];
    let in_dir = |table: &[&str]| {
        dirs.iter()
            .any(|dir| table.iter().any(|t| dir.eq_ignore_ascii_case(t)))
    };

    if COMPONENT_EXTENSIONS.contains(&extension) {
        if in_dir(CONFIG_DIRS) {
            Category::Config
        } else if in_dir(UTILITY_DIRS) {
            Category::Data
        } else {
            Category::Component
        }
    } else if STYLE_EXTENSIONS.contains(&extension) {
        Category::Style
    } else if DATA_EXTENSIONS.contains(&extension) {
        Category::Data
    } else if ASSET_EXTENSIONS.contains(&extension) {
        Category::Asset
    } else if CONFIG_EXTENSIONS.contains(&extension) {
        Category::Config
    } else {
        Category::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::path::split_file_name;
    use proptest::prelude::*;

    fn raw(path: &str) -> RawEntry {
        let (name, extension) = split_file_name(path);
        RawEntry {
            path: path.to_string(),
            name,
            extension,
            size_bytes: 10,
        }
    }

    fn verdict(path: &str) -> Classification {
        let (name, extension) = split_file_name(path);
        classify(path, &name, &extension)
    }

    #[test]
    fn test_typical_project_archive() {
        let entries = classify_archive(&[
            raw("src/App.tsx"),
            raw("node_modules/x/index.js"),
            raw("package-lock.json"),
            raw("README.md"),
        ]);
        assert_eq!(entries.len(), 4);

        let app = &entries[0];
        assert_eq!(app.category, Category::Component);
        assert!(!app.auto_excluded);
        assert!(app.selected);

        for entry in &entries[1..] {
            assert!(entry.auto_excluded, "{} should be excluded", entry.path);
            assert!(!entry.selected);
            assert_eq!(entry.category, Category::Junk);
        }
    }

    #[test]
    fn test_directory_entries_are_dropped() {
        let entries = classify_archive(&[raw("src/"), raw("src/index.css")]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, Category::Style);
        assert!(entries[0].selected);
    }

    #[test]
    fn test_hidden_and_suffix_rules() {
        assert!(verdict(".github/workflows/ci.yml").auto_excluded);
        assert!(verdict("src/.env.local").auto_excluded);
        assert!(verdict("src/Button.test.tsx").auto_excluded);
        assert!(verdict("src/Button.stories.jsx").auto_excluded);
        assert!(verdict("src/types/global.d.ts").auto_excluded);
        assert!(verdict("public/vendor.min.js").auto_excluded);
        assert!(verdict("assets/fonts/Inter.woff2").auto_excluded);
        assert!(verdict("dist/bundle.js.map").auto_excluded);
        assert!(!verdict("src/Button.tsx").auto_excluded);
    }

    #[test]
    fn test_category_rules() {
        assert_eq!(verdict("src/utils/format.ts").category, Category::Data);
        assert_eq!(verdict("src/config/routes.js").category, Category::Config);
        assert_eq!(verdict("vite.config.ts").category, Category::Config);
        assert_eq!(verdict("package.json").category, Category::Config);
        assert_eq!(verdict("src/theme.scss").category, Category::Style);
        assert_eq!(verdict("data/rooms.json").category, Category::Data);
        assert_eq!(verdict("public/logo.svg").category, Category::Asset);
        assert_eq!(verdict("docs/guide.md").category, Category::Other);
        assert_eq!(verdict("Makefile").category, Category::Other);
    }

    #[test]
    fn test_category_of_ignores_exclusion() {
        assert_eq!(
            category_of("src/Button.test.tsx", "Button.test.tsx", "tsx"),
            Category::Component
        );
        assert_eq!(
            category_of("node_modules/x/a.css", "a.css", "css"),
            Category::Style
        );
    }

    #[test]
    fn test_extension_case_is_ignored() {
        let entries = classify_archive(&[RawEntry {
            path: "src/Panel.TSX".to_string(),
            name: "Panel.TSX".to_string(),
            extension: "TSX".to_string(),
            size_bytes: 10,
        }]);
        assert_eq!(entries[0].category, Category::Component);
        assert!(entries[0].selected);
        assert!(classify("a/b.MAP", "b.MAP", "MAP").auto_excluded);
        assert_eq!(category_of("Logo.PNG", "Logo.PNG", "PNG"), Category::Asset);
    }

    #[test]
    fn test_default_selection_by_category() {
        assert!(verdict("src/Panel.vue").selected_by_default());
        assert!(verdict("public/logo.png").selected_by_default());
        assert!(!verdict("package.json").selected_by_default());
        assert!(!verdict("docs/guide.md").selected_by_default());
    }

    proptest! {
        #[test]
        fn prop_denylisted_directory_always_excludes(
            dir in prop::sample::select(EXCLUDED_DIRS.to_vec()),
            prefix in "([a-z]{1,8}/){0,2}",
            file in "[A-Za-z]{1,10}",
            ext in prop::sample::select(vec!["tsx", "js", "css", "json", "png", "md", ""]),
        ) {
            let path = if ext.is_empty() {
                format!("{prefix}{dir}/{file}")
            } else {
                format!("{prefix}{dir}/{file}.{ext}")
            };
            let entry = classify_entry(&raw(&path));
            prop_assert!(entry.auto_excluded);
            prop_assert!(!entry.selected);
        }
    }
}

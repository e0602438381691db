//! # 路径工具函数
//!
//! 提供与路径和命名相关的工具函数，包括：
//! - 获取本应用配置目录路径（`~/.panel-importer/`）
//! - 将压缩包条目路径拆分为文件名和扩展名
//! - 将组件名转换为 kebab-case 的类型标识
//! - 目录前缀的层级计算

use std::path::PathBuf;

use crate::error::ImportError;

/// 获取本应用配置目录的绝对路径
///
/// 配置数据独立存储在 `~/.panel-importer/` 目录下，
/// 与编辑器的项目文件分离。
///
/// # 返回值
/// 返回 `~/.panel-importer/` 目录的绝对路径。
///
/// # 错误
/// 如果无法确定用户主目录（如无 HOME 环境变量），返回 `ImportError::NoHomeDir`。
pub fn get_config_dir() -> Result<PathBuf, ImportError> {
    let home = dirs::home_dir().ok_or(ImportError::NoHomeDir)?;
    Ok(home.join(".panel-importer"))
}

/// 将条目路径拆分为 (文件名, 小写扩展名)
///
/// 同时接受 `/` 和 `\` 分隔符（Windows 下打包的 ZIP 可能使用反斜杠）。
/// 以点开头且没有其他点的文件名（如 `.env`）视为无扩展名。
///
/// # 示例
/// - `"src/App.TSX"` → `("App.TSX", "tsx")`
/// - `"Makefile"` → `("Makefile", "")`
/// - `"a/.gitignore"` → `(".gitignore", "")`
pub fn split_file_name(path: &str) -> (String, String) {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let extension = match name.rfind('.') {
        Some(0) | None => String::new(),
        Some(idx) => name[idx + 1..].to_ascii_lowercase(),
    };
    (name.to_string(), extension)
}

/// 将组件名转换为 kebab-case 标识
///
/// 小写字母或数字后紧跟大写字母处断开，非字母数字字符统一替换为 `-`，
/// 连续的 `-` 合并，首尾的 `-` 去除。
///
/// # 示例
/// - `"MyButton"` → `"my-button"`
/// - `"HVACPanel_v2"` → `"hvacpanel-v2"`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len() + 4);
    let mut prev_lower_or_digit = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if ch.is_ascii_uppercase() && prev_lower_or_digit && !slug.ends_with('-') {
                slug.push('-');
            }
            slug.push(ch.to_ascii_lowercase());
            prev_lower_or_digit = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        } else {
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
            prev_lower_or_digit = false;
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// 返回条目所在目录的前缀（含结尾 `/`），根目录文件返回 None
///
/// # 示例
/// - `"src/components/Button.tsx"` → `Some("src/components/")`
/// - `"index.html"` → `None`
pub fn dir_prefix(path: &str) -> Option<&str> {
    path.rfind('/').map(|idx| &path[..=idx])
}

/// 返回目录前缀的父级前缀，顶层目录返回 None
///
/// # 示例
/// - `"src/components/"` → `Some("src/")`
/// - `"src/"` → `None`
pub fn parent_prefix(prefix: &str) -> Option<&str> {
    let trimmed = prefix.strip_suffix('/').unwrap_or(prefix);
    trimmed.rfind('/').map(|idx| &prefix[..=idx])
}

/// 目录前缀的层级深度（顶层目录为 1）
pub fn prefix_depth(prefix: &str) -> usize {
    prefix.matches('/').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_file_name() {
        assert_eq!(
            split_file_name("src/App.TSX"),
            ("App.TSX".to_string(), "tsx".to_string())
        );
        assert_eq!(
            split_file_name("Makefile"),
            ("Makefile".to_string(), String::new())
        );
        assert_eq!(
            split_file_name("a/.gitignore"),
            (".gitignore".to_string(), String::new())
        );
        assert_eq!(
            split_file_name(r"win\dir\Panel.vue"),
            ("Panel.vue".to_string(), "vue".to_string())
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("MyButton"), "my-button");
        assert_eq!(slugify("Foo"), "foo");
        assert_eq!(slugify("HVACPanel_v2"), "hvacpanel-v2");
        assert_eq!(slugify("  Volume  Slider "), "volume-slider");
    }

    #[test]
    fn test_prefix_helpers() {
        assert_eq!(dir_prefix("src/components/Button.tsx"), Some("src/components/"));
        assert_eq!(dir_prefix("index.html"), None);
        assert_eq!(parent_prefix("src/components/"), Some("src/"));
        assert_eq!(parent_prefix("src/"), None);
        assert_eq!(prefix_depth("src/components/"), 2);
    }
}

//! # 压缩包与源码读取服务
//!
//! 负责导入流程中的所有文件读取：
//! - 打开 ZIP 压缩包并枚举文件条目（目录条目剔除）
//! - 按需解压单个条目的文本
//! - 读取单个磁盘源码文件为 `SourceFile`
//!
//! 合并引擎只依赖 `EntryReader` trait，不关心内容来自压缩包还是已加载的文件。

use std::collections::HashMap;
use std::future::Future;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use zip::ZipArchive;

use crate::error::{ImportError, Result};
use crate::models::archive::{Category, RawEntry};
use crate::models::source::{SourceContent, SourceFile};
use crate::services::classifier;
use crate::utils::path::split_file_name;

/// 按路径读取条目文本
///
/// 合并引擎通过此 trait 注入文件读取能力：
/// - `ZipEntryReader`：从已打开的压缩包中解压
/// - `MemoryReader`：从已加载到内存的文件中读取
pub trait EntryReader {
    /// 读取指定路径的 UTF-8 文本
    fn read_text(&mut self, path: &str) -> impl Future<Output = Result<String>> + Send;
}

/// 已打开的 ZIP 压缩包
///
/// 原始字节以 `Arc` 共享：缓存中的会话和正在进行的导入批次可以同时持有，
/// 每个读取器各自创建独立的 `ZipArchive` 游标。
#[derive(Debug, Clone)]
pub struct ZipBundle {
    /// 压缩包在磁盘上的路径（仅用于日志和错误信息）
    pub path: String,
    bytes: Arc<[u8]>,
}

impl ZipBundle {
    /// 从内存字节创建
    pub fn from_bytes(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes: Arc::from(bytes),
        }
    }

    /// 从磁盘读取压缩包
    ///
    /// # 错误
    /// 文件不可读时返回 `ImportError::FileRead`
    pub async fn open(path: &str) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ImportError::FileRead {
                path: path.to_string(),
                source,
            })?;
        log::info!("打开压缩包 {}（{} 字节）", path, bytes.len());
        Ok(Self::from_bytes(path, bytes))
    }

    /// 枚举压缩包中的文件条目
    ///
    /// 目录条目、以及解压后会逃逸出目标目录的路径（`enclosed_name` 为 None）被丢弃。
    /// 条目大小取自中央目录，按压缩包中的顺序逐个获取。
    ///
    /// # 错误
    /// 压缩包格式无效时返回 `ImportError::ArchiveOpen`
    pub fn list_entries(&self) -> Result<Vec<RawEntry>> {
        let mut archive = self.archive()?;
        let mut entries = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let file = match archive.by_index(i) {
                Ok(file) => file,
                Err(e) => {
                    log::warn!("跳过无法读取的压缩包条目 #{}: {}", i, e);
                    continue;
                }
            };
            if file.is_dir() || file.enclosed_name().is_none() {
                continue;
            }

            let path = file.name().replace('\\', "/");
            let (name, extension) = split_file_name(&path);
            entries.push(RawEntry {
                path,
                name,
                extension,
                size_bytes: file.size(),
            });
        }

        Ok(entries)
    }

    /// 创建该压缩包的条目读取器
    ///
    /// 条目路径统一使用 `/` 分隔，读取器记录归一化路径到压缩包内原始名称的映射，
    /// 反斜杠分隔的条目同样可以按 `list_entries` 报告的路径读取。
    pub fn reader(&self) -> Result<ZipEntryReader> {
        let archive = self.archive()?;
        let raw_names = archive
            .file_names()
            .filter(|name| name.contains('\\'))
            .map(|name| (name.replace('\\', "/"), name.to_string()))
            .collect();
        Ok(ZipEntryReader {
            path: self.path.clone(),
            archive,
            raw_names,
        })
    }

    fn archive(&self) -> Result<ZipArchive<Cursor<Arc<[u8]>>>> {
        ZipArchive::new(Cursor::new(Arc::clone(&self.bytes))).map_err(|source| {
            ImportError::ArchiveOpen {
                path: self.path.clone(),
                source,
            }
        })
    }
}

/// 从已打开的压缩包中按路径解压条目
pub struct ZipEntryReader {
    path: String,
    archive: ZipArchive<Cursor<Arc<[u8]>>>,
    /// 归一化路径 → 原始条目名（仅含反斜杠的条目）
    raw_names: HashMap<String, String>,
}

impl ZipEntryReader {
    /// 同步解压条目文本
    fn extract(&mut self, entry_path: &str) -> Result<String> {
        let raw_name = self
            .raw_names
            .get(entry_path)
            .map(String::as_str)
            .unwrap_or(entry_path);
        let mut file = match self.archive.by_name(raw_name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(ImportError::EntryNotFound {
                    path: entry_path.to_string(),
                });
            }
            Err(e) => {
                return Err(ImportError::EntryRead {
                    path: entry_path.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let mut text = String::new();
        file.read_to_string(&mut text)
            .map_err(|e| ImportError::EntryRead {
                path: entry_path.to_string(),
                message: e.to_string(),
            })?;
        log::debug!("从 {} 解压条目 {}（{} 字节）", self.path, entry_path, text.len());
        Ok(text)
    }
}

impl EntryReader for ZipEntryReader {
    async fn read_text(&mut self, path: &str) -> Result<String> {
        self.extract(path)
    }
}

/// 从内存中的已加载文件读取
///
/// 用于单文件导入，以及前端已经读好内容的场景。
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    files: HashMap<String, String>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个文件
    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }
}

impl FromIterator<(String, String)> for MemoryReader {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl EntryReader for MemoryReader {
    async fn read_text(&mut self, path: &str) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ImportError::EntryNotFound {
                path: path.to_string(),
            })
    }
}

/// 读取磁盘上的单个源码文件
///
/// 按分类决定读取方式：图片资源保留原始字节，其余按 UTF-8 文本读取。
///
/// # 错误
/// 文件不可读，或文本文件不是合法 UTF-8 时返回 `ImportError::FileRead`
pub async fn load_source_file(path: &str) -> Result<SourceFile> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ImportError::FileRead {
            path: path.to_string(),
            source,
        })?;

    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);
    let (name, extension) = split_file_name(file_name);
    let size_bytes = bytes.len() as u64;

    let is_asset = classifier::classify(&name, &name, &extension).category == Category::Asset;
    let content = if is_asset {
        SourceContent::Bytes(bytes)
    } else {
        let text = String::from_utf8(bytes).map_err(|e| ImportError::FileRead {
            path: path.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        SourceContent::Text(text)
    };

    Ok(SourceFile {
        path: path.to_string(),
        name,
        extension,
        content,
        size_bytes,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use super::*;
    use zip::write::SimpleFileOptions;

    /// 在内存中构造测试用压缩包
    pub(crate) fn build_zip(files: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            for (path, content) in files {
                if path.ends_with('/') {
                    zip.add_directory(*path, options).unwrap();
                } else {
                    zip.start_file(*path, options).unwrap();
                    zip.write_all(content.as_bytes()).unwrap();
                }
            }
            zip.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_list_entries_skips_directories() {
        let bytes = build_zip(&[
            ("src/", ""),
            ("src/App.tsx", "export function App() { return <div/> }"),
            ("README.md", "# hi"),
        ]);
        let bundle = ZipBundle::from_bytes("test.zip", bytes);
        let entries = bundle.list_entries().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "src/App.tsx");
        assert_eq!(entries[0].name, "App.tsx");
        assert_eq!(entries[0].extension, "tsx");
        assert_eq!(
            entries[0].size_bytes,
            "export function App() { return <div/> }".len() as u64
        );
        assert_eq!(entries[1].path, "README.md");
    }

    #[tokio::test]
    async fn test_backslash_entries_are_readable_by_listed_path() {
        let bytes = build_zip(&[("src\\App.tsx", "export const App = () => <div/>")]);
        let bundle = ZipBundle::from_bytes("windows.zip", bytes);

        let entries = bundle.list_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "src/App.tsx");
        assert_eq!(entries[0].name, "App.tsx");

        let mut reader = bundle.reader().unwrap();
        assert_eq!(
            reader.read_text(&entries[0].path).await.unwrap(),
            "export const App = () => <div/>"
        );
    }

    #[test]
    fn test_invalid_archive_is_reported() {
        let bundle = ZipBundle::from_bytes("broken.zip", b"not a zip".to_vec());
        assert!(matches!(
            bundle.list_entries(),
            Err(ImportError::ArchiveOpen { .. })
        ));
    }

    #[tokio::test]
    async fn test_zip_reader_reads_text_and_reports_missing() {
        let bytes = build_zip(&[("a/b.json", r#"{"pages":[]}"#)]);
        let bundle = ZipBundle::from_bytes("test.zip", bytes);
        let mut reader = bundle.reader().unwrap();

        assert_eq!(reader.read_text("a/b.json").await.unwrap(), r#"{"pages":[]}"#);
        assert!(matches!(
            reader.read_text("missing.json").await,
            Err(ImportError::EntryNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_open_from_disk_and_load_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("project.zip");
        std::fs::write(&zip_path, build_zip(&[("index.html", "<button>Go</button>")])).unwrap();

        let bundle = ZipBundle::open(zip_path.to_str().unwrap()).await.unwrap();
        assert_eq!(bundle.list_entries().unwrap().len(), 1);

        let src_path = dir.path().join("Panel.jsx");
        std::fs::write(&src_path, "export const Panel = () => <div/>").unwrap();
        let source = load_source_file(src_path.to_str().unwrap()).await.unwrap();
        assert_eq!(source.name, "Panel.jsx");
        assert_eq!(source.extension, "jsx");
        assert_eq!(
            source.size_bytes,
            "export const Panel = () => <div/>".len() as u64
        );
        assert_eq!(source.text(), Some("export const Panel = () => <div/>"));

        let missing = load_source_file(dir.path().join("nope.tsx").to_str().unwrap()).await;
        assert!(matches!(missing, Err(ImportError::FileRead { .. })));
    }

    #[tokio::test]
    async fn test_memory_reader() {
        let mut reader: MemoryReader = [("x.tsx".to_string(), "text".to_string())]
            .into_iter()
            .collect();
        reader.insert("y.json", "{}");
        assert_eq!(reader.read_text("x.tsx").await.unwrap(), "text");
        assert_eq!(reader.read_text("y.json").await.unwrap(), "{}");
        assert!(reader.read_text("z").await.is_err());
    }
}

//! # Panel Importer - 导入流水线核心库
//!
//! 把外部 UI 源码（粘贴的代码、压缩包、单个文件）转换为控制面板编辑器的
//! 组件库条目和页面模板。
//!
//! ## 模块结构
//! - `models/` - 数据模型（对应前端 TypeScript 类型）
//! - `services/` - 核心业务逻辑（分类、提取、扫描、合并、读写）
//! - `utils/` - 通用工具函数
//! - `commands/` - Tauri command 处理函数（IPC 接口层，仅 `desktop` feature）
//!
//! 核心库不依赖 Tauri，可以独立编译和测试；桌面应用在 `desktop` feature 下
//! 通过 `run()` 启动。

#[cfg(feature = "desktop")]
mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{ImportError, Result};

// 移动端入口点标记；桌面端由 `main.rs` 直接调用 `run()`。
#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
/// Tauri 应用启动函数
///
/// 1. 注册对话框插件（选择压缩包 / 源码文件 / 项目文件）
/// 2. 初始化应用全局状态（AppCache：压缩包会话、临时备份注册表）
/// 3. 注册所有自定义 Tauri commands
/// 4. 在 `setup` 钩子中按需注册调试专用插件（日志）
///
/// # Panics
/// Tauri 应用启动失败（例如配置文件缺失或窗口创建失败）时 panic。
pub fn run() {
    use services::cache::AppCache;

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .manage(AppCache::new())
        .invoke_handler(tauri::generate_handler![
            // 纯计算
            commands::import::parse_source,
            commands::import::classify_archive,
            // 压缩包会话与文件树
            commands::import::open_archive,
            commands::import::archive_view,
            commands::import::close_archive,
            commands::import::toggle_entry,
            commands::import::toggle_directory,
            commands::import::select_all,
            commands::import::set_expanded,
            // 导入
            commands::import::import_archive,
            commands::import::import_source_file,
            // 设置
            commands::settings::get_config_dir,
            commands::settings::read_import_config,
            commands::settings::save_import_config,
            commands::settings::get_temp_backups,
        ])
        .setup(|app| {
            // 仅在开发调试模式下启用日志插件
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

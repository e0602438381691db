//! # Panel Importer - 桌面应用入口点
//!
//! 仅负责启动应用，插件注册、状态初始化和 command 注册都在 `app_lib::run()` 中完成。

// 在 Windows 平台的 Release 构建中隐藏控制台窗口，请勿移除此属性！
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    app_lib::run();
}

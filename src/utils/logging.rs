//! 日志工具模块
//!
//! 提供日志初始化与格式化辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::{SiteConfig, SubmissionResult, SubmissionStatus};

/// 初始化 tracing 订阅器（RUST_LOG 可覆盖级别，默认 info）
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录引擎启动信息
pub fn log_startup(site: &SiteConfig) {
    info!("{}", "=".repeat(60));
    info!("🚀 文章发布引擎启动");
    info!("🌐 目标站点: {} ({})", site.name, site.start_url);
    info!("{}", "=".repeat(60));
}

/// 打印最终结果
pub fn log_result(result: &SubmissionResult) {
    info!("{}", "=".repeat(60));
    match result.status {
        SubmissionStatus::Draft => info!("✅ 草稿已保存"),
        SubmissionStatus::Published => info!("✅ 文章已发布"),
        SubmissionStatus::Uncertain => {
            info!("⚠️ 提交结果不确定：请到站点后台人工核实，引擎不会自动重发")
        }
        SubmissionStatus::Failed => info!("❌ 提交失败"),
    }
    if let Some(url) = &result.url {
        info!("🔗 地址: {}", url);
    }
    if let Some(detail) = &result.error_detail {
        info!("📋 失败详情: {}", detail);
    }
    if let Some(path) = &result.screenshot_path {
        info!("📸 截图: {}", path.display());
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

//! 失败截图服务 - 业务能力层
//!
//! UI 失败往往不可复现，留一张整页截图供事后排查。
//! 截图在异常向上传播之前完成，异常本身不被包装或吞掉。

use std::path::{Path, PathBuf};

use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use chrono::{DateTime, Local};
use tracing::info;

use crate::error::Result;

/// 失败截图服务
pub struct ScreenshotService {
    dir: PathBuf,
}

impl ScreenshotService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 捕获整页截图，返回保存路径
    pub async fn capture(&self, page: &Page) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(screenshot_filename(Local::now()));

        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        let data = page.screenshot(params).await?;
        tokio::fs::write(&path, data).await?;

        info!("📸 已保存失败截图: {}", path.display());
        Ok(path)
    }
}

/// 时间戳文件名：`failure-YYYYmmdd-HHMMSS-mmm.png`
fn screenshot_filename(now: DateTime<Local>) -> String {
    format!("failure-{}.png", now.format("%Y%m%d-%H%M%S-%3f"))
}

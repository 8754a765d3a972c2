//! 浏览器会话管理
//!
//! 负责浏览器进程与持久化配置目录的生命周期：
//! - 以有头模式启动（手动登录需要可见窗口）
//! - 复用 profile 目录中的 Cookie / localStorage 实现跨次运行的会话复用
//! - 启动前必须拿到 profile 目录的排他锁，防止两个引擎实例争用同一份登录态

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::{EngineError, Result};

const LOCK_FILE_NAME: &str = ".publish.lock";

/// profile 目录排他锁
///
/// 用 create_new 语义创建锁文件：已存在即视为被占用，快速失败
/// 而不是让两个浏览器实例静默争用同一个 profile。
pub struct ProfileLock {
    path: PathBuf,
    released: bool,
}

impl ProfileLock {
    /// 获取指定 profile 目录的锁
    pub fn acquire(profile_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(profile_dir)?;
        let path = profile_dir.join(LOCK_FILE_NAME);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                let _ = write!(file, "{}", std::process::id());
                debug!("已获取 profile 锁: {}", path.display());
                Ok(Self {
                    path,
                    released: false,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(EngineError::Launch {
                    reason: format!(
                        "profile 目录已被其他发布进程占用（锁文件: {}）。\
                         若确认没有其他实例在运行，请手动删除该文件",
                        path.display()
                    ),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 释放锁（可重复调用）
    pub fn release(&mut self) {
        if !self.released {
            if let Err(e) = std::fs::remove_file(&self.path) {
                debug!("删除锁文件失败（可忽略）: {}", e);
            }
            self.released = true;
        }
    }
}

impl Drop for ProfileLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// 浏览器会话
///
/// 状态机：Closed → Launching → Ready → Closed。
/// 一次引擎调用独占一个会话；close() 幂等。
pub struct Session {
    profile_dir: PathBuf,
    browser: Option<Browser>,
    lock: ProfileLock,
    pub created_at: DateTime<Local>,
}

impl Session {
    /// 打开会话：加锁 → 启动浏览器 → 导航到起始页
    ///
    /// 跨次运行幂等：profile 目录中持久化的登录态会被复用。
    pub async fn open(profile_dir: &Path, start_url: &str) -> Result<(Self, Page)> {
        let lock = ProfileLock::acquire(profile_dir)?;

        info!("🚀 启动浏览器（profile: {}）...", profile_dir.display());

        let config = BrowserConfig::builder()
            .with_head()
            .user_data_dir(profile_dir)
            .args(vec![
                "--no-first-run",
                "--no-default-browser-check",
                "--disable-dev-shm-usage", // 防止共享内存不足
            ])
            .build()
            .map_err(|e| EngineError::Launch {
                reason: format!("浏览器配置失败: {}", e),
            })?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            error!("启动浏览器失败: {}", e);
            EngineError::Launch {
                reason: e.to_string(),
            }
        })?;
        debug!("浏览器启动成功");

        // 在后台处理浏览器事件
        tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        // 短暂延迟等待浏览器状态同步
        sleep(tokio::time::Duration::from_millis(300)).await;

        let page = browser.new_page("about:blank").await.map_err(|e| {
            error!("创建页面失败: {}", e);
            EngineError::Launch {
                reason: format!("创建页面失败: {}", e),
            }
        })?;
        page.goto(start_url).await?;
        info!("✅ 已导航到: {}", start_url);

        let session = Self {
            profile_dir: profile_dir.to_path_buf(),
            browser: Some(browser),
            lock,
            created_at: Local::now(),
        };
        Ok((session, page))
    }

    pub fn profile_dir(&self) -> &Path {
        &self.profile_dir
    }

    /// 关闭会话并释放 profile 锁，可重复调用
    pub async fn close(&mut self) -> Result<()> {
        if let Some(mut browser) = self.browser.take() {
            info!("🧹 关闭浏览器会话");
            if let Err(e) = browser.close().await {
                debug!("关闭浏览器时出错（可忽略）: {}", e);
            }
        }
        self.lock.release();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_conflict_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let _first = ProfileLock::acquire(dir.path()).unwrap();

        let second = ProfileLock::acquire(dir.path());
        assert!(matches!(second, Err(EngineError::Launch { .. })));
    }

    #[test]
    fn test_lock_release_allows_reacquire() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = ProfileLock::acquire(dir.path()).unwrap();
        first.release();

        assert!(ProfileLock::acquire(dir.path()).is_ok());
    }

    #[test]
    fn test_lock_release_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut lock = ProfileLock::acquire(dir.path()).unwrap();
        lock.release();
        lock.release();
        assert!(!dir.path().join(LOCK_FILE_NAME).exists());
    }

    #[test]
    fn test_lock_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        {
            let _lock = ProfileLock::acquire(dir.path()).unwrap();
            assert!(dir.path().join(LOCK_FILE_NAME).exists());
        }
        assert!(!dir.path().join(LOCK_FILE_NAME).exists());
    }
}

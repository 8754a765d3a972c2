//! 登录监视服务 - 业务能力层
//!
//! 目标平台普遍要求人工完成登录（账号密码、短信验证码），
//! 引擎无法代劳，只能：打开页面 → 轮询站点提供的登录态谓词 →
//! 谓词为真后放行，或在预算耗尽时报 LoginTimeout。
//!
//! 判定策略：单次正向判定即视为已登录。谓词应当写在登录后才稳定
//! 存在的标记上（如头像节点）；要求连续多次命中会破坏
//! 「谓词已为真时立即返回」的约定并平添延迟。

use std::cell::Cell;
use std::future::Future;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{EngineError, Result};
use crate::infrastructure::{poll_until, JsExecutor};
use crate::models::AuthPredicate;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// 登录监视服务
pub struct LoginMonitor {
    poll_interval: Duration,
}

impl Default for LoginMonitor {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl LoginMonitor {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// 等待登录态确认
    ///
    /// 谓词已为真时立即返回；否则每个间隔重查一次，
    /// 预算耗尽报 `LoginTimeout`（不自动重试——没有新的人工操作时重试无意义）。
    pub async fn await_authenticated(
        &self,
        executor: &JsExecutor,
        predicate: &AuthPredicate,
        timeout: Duration,
    ) -> Result<()> {
        info!(
            "🔐 检查登录状态（最长等待 {} 秒，请在浏览器中完成登录）...",
            timeout.as_secs()
        );

        self.await_with(timeout, || evaluate(executor, predicate))
            .await
    }

    /// 等待骨架：立即首查，之后每个间隔重查，预算耗尽映射为 `LoginTimeout`
    ///
    /// 谓词求值以闭包注入，便于在没有浏览器的环境下验证
    /// 「已为真立即返回」与「预算短于间隔也不超时阻塞」两条约定。
    pub(crate) async fn await_with<F, Fut>(&self, timeout: Duration, mut check: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let prompted = Cell::new(false);
        let prompted = &prompted;
        let outcome = poll_until(
            || {
                let fut = check();
                async move {
                    if fut.await? {
                        Ok(Some(()))
                    } else {
                        if !prompted.get() {
                            info!("⏳ 尚未登录，等待手动登录...");
                            prompted.set(true);
                        }
                        Ok(None)
                    }
                }
            },
            self.poll_interval,
            timeout,
        )
        .await?;

        match outcome {
            Some(()) => {
                info!("✓ 已确认登录状态");
                Ok(())
            }
            None => Err(EngineError::LoginTimeout {
                waited_secs: timeout.as_secs(),
            }),
        }
    }
}

/// 单次谓词求值（页面状态的纯函数）
async fn evaluate(executor: &JsExecutor, predicate: &AuthPredicate) -> Result<bool> {
    match predicate {
        AuthPredicate::UrlMatches { pattern } => {
            let re = Regex::new(pattern)
                .map_err(|e| EngineError::Config(format!("登录谓词正则无效 '{}': {}", pattern, e)))?;
            let url = executor.current_url().await?;
            debug!("登录检查: URL = {}", url);
            Ok(re.is_match(&url))
        }
        AuthPredicate::MarkerPresent { selector } => marker_exists(executor, selector).await,
        AuthPredicate::MarkerAbsent { selector } => {
            Ok(!marker_exists(executor, selector).await?)
        }
    }
}

async fn marker_exists(executor: &JsExecutor, selector: &str) -> Result<bool> {
    let js = format!(
        "!!document.querySelector({})",
        serde_json::to_string(selector)?
    );
    executor.eval_as(js).await
}

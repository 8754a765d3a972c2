//! 提交控制流程 - 流程层
//!
//! 主路径：解析模式对应的按钮并点击。按钮在预算内未出现时，
//! 改用全局快捷键——这是真正不同的交互面，不是对同一次点击的重试。
//!
//! 动作执行后等待一个宽限窗口观察确认信号（URL 变化或成功标记）。
//! 没有信号时结果是 `uncertain` 而不是失败或成功，且绝不自动重发：
//! 对可能已被站点接受的动作再来一次，风险是重复发文。

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{EngineError, Result};
use crate::infrastructure::{poll_until, JsExecutor};
use crate::models::{SelectorSet, Shortcut, SiteConfig, SubmissionResult, SubmitMode};
use crate::services::{dom, ResolveOptions, SelectorResolver};
use crate::workflow::publish_ctx::PublishCtx;

const DEFAULT_GRACE: Duration = Duration::from_secs(8);
const DEFAULT_CONFIRM_TICK: Duration = Duration::from_millis(300);

/// 确认信号
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Confirmation {
    /// URL 变化或成功标记出现
    Success { url: String },
    /// 页面上出现明确的失败标记
    Rejected { detail: String },
}

/// 提交控制流程
pub struct SubmissionController {
    resolver: SelectorResolver,
    control_timeout: Duration,
    grace: Duration,
    confirm_tick: Duration,
}

impl SubmissionController {
    pub fn new(control_timeout: Duration) -> Self {
        Self {
            resolver: SelectorResolver::default(),
            control_timeout,
            grace: DEFAULT_GRACE,
            confirm_tick: DEFAULT_CONFIRM_TICK,
        }
    }

    /// 触发提交并确认结果
    pub async fn submit(
        &self,
        executor: &JsExecutor,
        site: &SiteConfig,
        mode: SubmitMode,
        ctx: &PublishCtx,
    ) -> Result<SubmissionResult> {
        let before_url = executor.current_url().await?;
        let before = before_url.as_str();
        info!("{} 📤 触发{}动作...", ctx, mode);

        let controls = self.mode_controls(site, mode);
        let shortcut = self.mode_shortcut(site, mode);

        self.run_submit_sequence(
            mode,
            || self.activate(executor, ctx, controls, shortcut),
            move || check_confirmation(executor, site, before),
        )
        .await
    }

    /// 模式对应的按钮候选列表（草稿未配置时不点发布按钮，只走快捷键）
    fn mode_controls<'a>(&self, site: &'a SiteConfig, mode: SubmitMode) -> Option<&'a SelectorSet> {
        match mode {
            SubmitMode::Publish => Some(&site.selectors.publish),
            SubmitMode::Draft => site.selectors.draft.as_ref(),
        }
    }

    fn mode_shortcut<'a>(&self, site: &'a SiteConfig, mode: SubmitMode) -> Option<&'a Shortcut> {
        match mode {
            SubmitMode::Publish => site.publish_shortcut.as_ref(),
            SubmitMode::Draft => site.draft_shortcut.as_ref(),
        }
    }

    /// 执行一次提交动作：按钮优先，缺失时回退快捷键
    async fn activate(
        &self,
        executor: &JsExecutor,
        ctx: &PublishCtx,
        controls: Option<&SelectorSet>,
        shortcut: Option<&Shortcut>,
    ) -> Result<()> {
        let opts = ResolveOptions {
            timeout: self.control_timeout,
            require_visible: true,
        };

        if let Some(set) = controls {
            match self
                .resolver
                .try_selectors(executor, "submit_control", set, &opts)
                .await
            {
                Ok(resolved) => {
                    dom::click(executor, &resolved.selector).await?;
                    info!("{} ✓ 已点击提交按钮: {}", ctx, resolved.selector);
                    return Ok(());
                }
                Err(EngineError::ElementNotFound { .. }) => {
                    warn!("{} ⚠️ 未找到提交按钮，尝试快捷键", ctx);
                }
                Err(e) => return Err(e),
            }
        }

        match shortcut {
            Some(sc) => {
                dom::dispatch_shortcut(executor, sc).await?;
                info!(
                    "{} ✓ 已派发快捷键: {}",
                    ctx,
                    sc.describe(cfg!(target_os = "macos"))
                );
                Ok(())
            }
            None => Err(EngineError::SubmissionFailed {
                reason: "提交按钮未出现，且站点未配置提交快捷键".to_string(),
            }),
        }
    }

    /// 提交序列骨架：动作恰好执行一次，然后在宽限窗口内轮询确认信号
    ///
    /// 动作与确认以闭包注入，便于在没有浏览器的环境下验证
    /// 「不自动重试」与「无信号 → uncertain」两条约定。
    pub(crate) async fn run_submit_sequence<A, AF, C, CF>(
        &self,
        mode: SubmitMode,
        activate: A,
        confirm: C,
    ) -> Result<SubmissionResult>
    where
        A: FnOnce() -> AF,
        AF: Future<Output = Result<()>>,
        C: FnMut() -> CF,
        CF: Future<Output = Result<Option<Confirmation>>>,
    {
        activate().await?;

        let confirmed = poll_until(confirm, self.confirm_tick, self.grace).await?;
        match confirmed {
            Some(Confirmation::Success { url }) => {
                info!("✅ 提交已确认: {}", url);
                Ok(SubmissionResult::succeeded(mode, url))
            }
            Some(Confirmation::Rejected { detail }) => {
                warn!("❌ 站点明确拒绝了提交: {}", detail);
                Ok(SubmissionResult::failed(detail))
            }
            None => {
                warn!("⚠️ 宽限窗口内未观察到确认信号，结果标记为 uncertain（不自动重试）");
                Ok(SubmissionResult::uncertain())
            }
        }
    }
}

/// 单个 tick 的确认检查：失败标记 → 成功标记 → URL 变化
async fn check_confirmation(
    executor: &JsExecutor,
    site: &SiteConfig,
    before_url: &str,
) -> Result<Option<Confirmation>> {
    if let Some(markers) = &site.failure_markers {
        if let Some(detail) = first_marker_text(executor, markers).await? {
            return Ok(Some(Confirmation::Rejected { detail }));
        }
    }

    if let Some(markers) = &site.success_markers {
        if first_marker_text(executor, markers).await?.is_some() {
            let url = executor.current_url().await?;
            return Ok(Some(Confirmation::Success { url }));
        }
    }

    let url = executor.current_url().await?;
    if url != before_url {
        return Ok(Some(Confirmation::Success { url }));
    }

    Ok(None)
}

/// 返回第一个出现的标记元素的文本（用作失败详情）
async fn first_marker_text(
    executor: &JsExecutor,
    markers: &SelectorSet,
) -> Result<Option<String>> {
    let list = serde_json::to_string(markers.candidates())?;
    let js = format!(
        r#"
        (() => {{
            const sels = {list};
            for (const sel of sels) {{
                let el = null;
                try {{ el = document.querySelector(sel); }} catch (e) {{ continue; }}
                if (el) return (el.innerText || sel).trim();
            }}
            return null;
        }})()
        "#
    );
    executor.eval_as(js).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubmissionStatus;
    use std::cell::Cell;
    use tokio::time::Instant;

    fn controller() -> SubmissionController {
        SubmissionController::new(Duration::from_secs(5))
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_signal_yields_uncertain_without_second_attempt() {
        let activations = Cell::new(0usize);
        let result = controller()
            .run_submit_sequence(
                SubmitMode::Draft,
                || {
                    activations.set(activations.get() + 1);
                    async { Ok(()) }
                },
                || async { Ok(None) },
            )
            .await
            .unwrap();

        assert_eq!(result.status, SubmissionStatus::Uncertain);
        assert!(result.url.is_none());
        // 提交动作恰好执行一次，绝不重发
        assert_eq!(activations.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_url_change_confirms_draft() {
        let result = controller()
            .run_submit_sequence(
                SubmitMode::Draft,
                || async { Ok(()) },
                || async {
                    Ok(Some(Confirmation::Success {
                        url: "https://example.com/drafts/42".to_string(),
                    }))
                },
            )
            .await
            .unwrap();

        assert_eq!(result.status, SubmissionStatus::Draft);
        assert_eq!(result.url.as_deref(), Some("https://example.com/drafts/42"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_marker_yields_failed() {
        let result = controller()
            .run_submit_sequence(
                SubmitMode::Publish,
                || async { Ok(()) },
                || async {
                    Ok(Some(Confirmation::Rejected {
                        detail: "内容包含敏感词".to_string(),
                    }))
                },
            )
            .await
            .unwrap();

        assert_eq!(result.status, SubmissionStatus::Failed);
        assert_eq!(result.error_detail.as_deref(), Some("内容包含敏感词"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_grace_window_is_bounded() {
        let start = Instant::now();
        let result = controller()
            .run_submit_sequence(SubmitMode::Publish, || async { Ok(()) }, || async {
                Ok(None)
            })
            .await
            .unwrap();

        assert_eq!(result.status, SubmissionStatus::Uncertain);
        assert_eq!(start.elapsed(), DEFAULT_GRACE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activation_error_propagates_before_confirmation() {
        let confirms = Cell::new(0usize);
        let err = controller()
            .run_submit_sequence(
                SubmitMode::Publish,
                || async {
                    Err(EngineError::SubmissionFailed {
                        reason: "按钮与快捷键均不可用".to_string(),
                    })
                },
                || {
                    confirms.set(confirms.get() + 1);
                    async { Ok(None) }
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::SubmissionFailed { .. }));
        // 动作未成功时不进入确认阶段
        assert_eq!(confirms.get(), 0);
    }
}

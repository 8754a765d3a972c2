//! 发布引擎 - 编排层
//!
//! ## 职责
//!
//! 整个应用的入口，持有全部资源并严格按阶段推进：
//!
//! 1. **会话阶段**：加锁 → 启动浏览器 → 导航到编辑器入口
//! 2. **登录门禁**：登录谓词确认之前，任何填充/提交操作都不会执行
//! 3. **填充阶段**：FormFiller 逐字段填充
//! 4. **提交阶段**：SubmissionController 触发并确认
//!
//! 各阶段预算相互独立：登录阶段省下的时间不会延长选择器解析的预算。
//! 填充/提交序列中任何错误都会在向上传播之前捕获一张整页截图，
//! 错误本身原样传播，不做包装。

use std::time::Duration;

use tracing::{error, warn};

use crate::browser::Session;
use crate::config::UserConfig;
use crate::error::Result;
use crate::infrastructure::JsExecutor;
use crate::models::{ArticleDraft, SiteConfig, SubmissionResult, SubmissionStatus, SubmitMode};
use crate::services::{LoginMonitor, ScreenshotService};
use crate::utils::logging;
use crate::workflow::{FormFiller, PublishCtx, SubmissionController};

/// 发布引擎
///
/// 一次引擎实例对应一个发布任务和一个独占的浏览器会话。
pub struct PublishEngine {
    config: UserConfig,
    site: SiteConfig,
    session: Session,
    executor: JsExecutor,
    login: LoginMonitor,
    filler: FormFiller,
    submitter: SubmissionController,
    screenshots: ScreenshotService,
}

impl PublishEngine {
    /// 初始化引擎：打开浏览器会话并导航到站点编辑器入口
    pub async fn initialize(config: UserConfig, site: SiteConfig) -> Result<Self> {
        logging::log_startup(&site);

        let (session, page) = Session::open(&config.profile_dir, &site.start_url).await?;
        let executor = JsExecutor::new(page);

        let selector_timeout = Duration::from_secs(config.selector_timeout_secs);
        let screenshots = ScreenshotService::new(config.screenshot_dir.clone());

        Ok(Self {
            config,
            site,
            session,
            executor,
            login: LoginMonitor::default(),
            filler: FormFiller::new(selector_timeout),
            submitter: SubmissionController::new(selector_timeout),
            screenshots,
        })
    }

    /// 发布一篇文章
    ///
    /// 阶段严格顺序执行：登录门禁 → 填充 → 提交，互不重叠。
    pub async fn publish(
        &self,
        draft: &ArticleDraft,
        mode: SubmitMode,
    ) -> Result<SubmissionResult> {
        draft.validate()?;
        let ctx = PublishCtx::new(self.site.name.as_str(), draft.title.as_str(), mode);

        // ========== 登录门禁 ==========
        self.login
            .await_authenticated(
                &self.executor,
                &self.site.auth,
                Duration::from_secs(self.config.login_timeout_secs),
            )
            .await?;

        // ========== 填充 + 提交（失败先截图再原样抛出）==========
        match self.fill_and_submit(draft, mode, &ctx).await {
            Ok(mut result) => {
                // 站点明确拒绝也留现场
                if result.status == SubmissionStatus::Failed {
                    match self.screenshots.capture(self.executor.page()).await {
                        Ok(path) => result.screenshot_path = Some(path),
                        Err(shot_err) => {
                            warn!("⚠️ {} 站点拒绝后截图失败: {}", ctx, shot_err)
                        }
                    }
                }
                Ok(result)
            }
            Err(e) => {
                match self.screenshots.capture(self.executor.page()).await {
                    Ok(path) => {
                        error!("❌ {} 处理失败: {}（截图: {}）", ctx, e, path.display())
                    }
                    Err(shot_err) => {
                        error!("❌ {} 处理失败: {}（截图也失败了: {}）", ctx, e, shot_err)
                    }
                }
                Err(e)
            }
        }
    }

    async fn fill_and_submit(
        &self,
        draft: &ArticleDraft,
        mode: SubmitMode,
        ctx: &PublishCtx,
    ) -> Result<SubmissionResult> {
        self.filler
            .fill(&self.executor, &self.site, draft, ctx)
            .await?;
        self.submitter
            .submit(&self.executor, &self.site, mode, ctx)
            .await
    }

    /// 关闭会话并释放 profile 锁（幂等）
    pub async fn close(&mut self) -> Result<()> {
        self.session.close().await
    }
}

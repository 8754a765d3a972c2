//! 表单填充流程 - 流程层
//!
//! 按固定顺序填充 ArticleDraft 的各字段：
//! 编辑器就绪 → 标题 → 副标题 → 正文 → 分类 → 标签。
//!
//! 标题/副标题/标签走原生输入框路径；正文先探测编辑器表面再注入。
//! 可选字段没有对应的 SelectorSet 时跳过（no-op），不报错。

use std::time::Duration;

use tracing::{debug, info};

use crate::error::Result;
use crate::infrastructure::JsExecutor;
use crate::models::{ArticleDraft, SiteConfig};
use crate::services::{dom, ContentInjector, ResolveOptions, SelectorResolver};
use crate::utils::logging::truncate_text;
use crate::workflow::publish_ctx::PublishCtx;

/// 分类选择器中的占位符，填充时替换为归一化后的分类名
const CATEGORY_PLACEHOLDER: &str = "$CATEGORY";

/// 表单填充流程
pub struct FormFiller {
    resolver: SelectorResolver,
    injector: ContentInjector,
    opts: ResolveOptions,
}

impl FormFiller {
    pub fn new(selector_timeout: Duration) -> Self {
        Self {
            resolver: SelectorResolver::default(),
            injector: ContentInjector::new(),
            opts: ResolveOptions {
                timeout: selector_timeout,
                require_visible: true,
            },
        }
    }

    /// 填充文章的全部字段
    pub async fn fill(
        &self,
        executor: &JsExecutor,
        site: &SiteConfig,
        draft: &ArticleDraft,
        ctx: &PublishCtx,
    ) -> Result<()> {
        // ========== 编辑器就绪 ==========
        if let Some(ready) = &site.selectors.editor_ready {
            self.resolver
                .wait_for_any(executor, "editor_ready", ready, self.opts.timeout)
                .await?;
        }

        // ========== 标题 ==========
        info!("{} ✏️ 填充标题: {}", ctx, truncate_text(&draft.title, 30));
        let title = self
            .resolver
            .try_selectors(executor, "title", &site.selectors.title, &self.opts)
            .await?;
        self.injector
            .fill_native(executor, &title.selector, &draft.title)
            .await?;

        // ========== 副标题 ==========
        match (&draft.subtitle, &site.selectors.subtitle) {
            (Some(subtitle), Some(set)) => {
                let resolved = self
                    .resolver
                    .try_selectors(executor, "subtitle", set, &self.opts)
                    .await?;
                self.injector
                    .fill_native(executor, &resolved.selector, subtitle)
                    .await?;
            }
            _ => debug!("{} 无副标题或站点不支持，跳过", ctx),
        }

        // ========== 正文 ==========
        info!(
            "{} 📝 填充正文（{} 字符）...",
            ctx,
            draft.content.chars().count()
        );
        let body = self
            .resolver
            .try_selectors(executor, "body", &site.selectors.body, &self.opts)
            .await?;
        let surface = self
            .injector
            .detect_surface(executor, &body.selector, &site.editor_probes)
            .await?;
        info!("{} ✓ 编辑器表面: {}", ctx, surface.kind());
        self.injector
            .fill_content(executor, &surface, &draft.content)
            .await?;

        // ========== 分类 ==========
        match (&draft.category, &site.selectors.category) {
            (Some(category), Some(set)) => {
                let name = site.normalize_category(category);
                info!("{} 🗂️ 选择分类: {}", ctx, name);
                let substituted = set.substitute(CATEGORY_PLACEHOLDER, &name);
                let resolved = self
                    .resolver
                    .try_selectors(executor, "category", &substituted, &self.opts)
                    .await?;
                dom::click(executor, &resolved.selector).await?;
            }
            _ => debug!("{} 无分类或站点不支持，跳过", ctx),
        }

        // ========== 标签 ==========
        if let Some(set) = &site.selectors.tags {
            if !draft.tags.is_empty() {
                let input = self
                    .resolver
                    .try_selectors(executor, "tags", set, &self.opts)
                    .await?;
                for tag in &draft.tags {
                    debug!("{} 🏷️ 录入标签: {}", ctx, tag);
                    // 写值 → 提交键确认 → 清空，为下一个标签让位
                    self.injector
                        .fill_native(executor, &input.selector, tag)
                        .await?;
                    dom::press_commit_key(executor, &input.selector).await?;
                    self.injector
                        .fill_native(executor, &input.selector, "")
                        .await?;
                }
                info!("{} ✓ 已录入 {} 个标签", ctx, draft.tags.len());
            }
        } else if !draft.tags.is_empty() {
            debug!("{} 站点未配置标签选择器，跳过 {} 个标签", ctx, draft.tags.len());
        }

        info!("{} ✅ 表单填充完成", ctx);
        Ok(())
    }
}

//! # Article Publish
//!
//! 一个通过受控浏览器向内容平台自动发布文章的 Rust 引擎
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 能力
//! - `poll_until` - 登录等待 / 选择器解析 / 提交确认共用的轮询组合子
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述「我能做什么」，只处理单个动作
//! - `SelectorResolver` - 按声明顺序解析候选选择器（抗标记漂移）
//! - `ContentInjector` - 兼容三种编辑器表面的内容注入
//! - `LoginMonitor` - 等待人工登录完成
//! - `ScreenshotService` - 失败现场整页截图
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义「一篇文章」的完整发布流程
//! - `PublishCtx` - 上下文封装（站点 + 文章 + 模式）
//! - `FormFiller` - 字段填充编排
//! - `SubmissionController` - 提交触发与结果确认（绝不自动重发）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/engine` - 发布引擎，管理会话资源和阶段顺序
//!
//! ## 设计要点
//!
//! 站点之间的差异（选择器、登录判定、分类词表、快捷键）全部收敛为
//! `SiteConfig` 纯数据；引擎本身不包含任何站点专属控制流。

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::Session;
pub use config::UserConfig;
pub use error::{EngineError, Result};
pub use infrastructure::JsExecutor;
pub use models::{
    load_markdown_article, ArticleDraft, AuthPredicate, SelectorSet, SiteConfig, SubmissionResult,
    SubmissionStatus, SubmitMode,
};
pub use orchestrator::PublishEngine;
pub use workflow::{FormFiller, PublishCtx, SubmissionController};

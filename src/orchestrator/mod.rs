//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::PublishEngine (一次发布任务)
//!     ↓
//! workflow::FormFiller / SubmissionController (字段填充与提交确认)
//!     ↓
//! services (能力层：selector / injector / login / screenshot)
//!     ↓
//! infrastructure (基础设施：JsExecutor / poll_until)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层持有 Session 和 JsExecutor
//! 2. **阶段顺序**：会话 → 登录 → 填充 → 提交，严格串行
//! 3. **无站点逻辑**：站点差异全部在 SiteConfig 数据里

pub mod engine;

pub use engine::PublishEngine;

//! 流程层（Workflow Layer）
//!
//! 定义「一篇文章」的完整发布流程：
//! - `PublishCtx` - 上下文封装（站点 + 文章 + 模式）
//! - `FormFiller` - 字段填充编排（标题 → 副标题 → 正文 → 分类 → 标签）
//! - `SubmissionController` - 提交触发与结果确认

pub mod form_filler;
pub mod publish_ctx;
pub mod submission;

pub use form_filler::FormFiller;
pub use publish_ctx::PublishCtx;
pub use submission::SubmissionController;

//! 数据模型
//!
//! - `article` - 文章草稿（外部解析器提供）
//! - `outcome` - 提交模式 / 状态 / 结果
//! - `site` - 站点配置（选择器、登录谓词、词表等纯数据）
//! - `loaders` - 文件加载器

pub mod article;
pub mod loaders;
pub mod outcome;
pub mod site;

pub use article::ArticleDraft;
pub use loaders::markdown_loader::load_markdown_article;
pub use outcome::{SubmissionResult, SubmissionStatus, SubmitMode};
pub use site::{AuthPredicate, ScriptedProbe, SelectorSet, Shortcut, SiteConfig, SiteSelectors};

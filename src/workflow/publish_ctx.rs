//! 发布上下文
//!
//! 封装「我正在向哪个站点发什么文章」这一信息，仅用于日志显示。

use std::fmt::Display;

use crate::models::SubmitMode;
use crate::utils::logging::truncate_text;

/// 发布上下文
#[derive(Debug, Clone)]
pub struct PublishCtx {
    /// 站点名称
    pub site_name: String,
    /// 文章标题
    pub title: String,
    /// 提交模式
    pub mode: SubmitMode,
}

impl PublishCtx {
    pub fn new(site_name: impl Into<String>, title: impl Into<String>, mode: SubmitMode) -> Self {
        Self {
            site_name: site_name.into(),
            title: title.into(),
            mode,
        }
    }
}

impl Display for PublishCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[站点#{} 文章《{}》 模式#{}]",
            self.site_name,
            truncate_text(&self.title, 20),
            self.mode
        )
    }
}

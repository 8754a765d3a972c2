//! 文章草稿模型
//!
//! ArticleDraft 由外部的 Markdown/front matter 解析器整体提供，
//! 引擎不做任何进一步的内容归一化。

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// 文章草稿
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDraft {
    /// 标题（必填，非空）
    pub title: String,

    /// 正文内容（必填，允许为空字符串）
    pub content: String,

    /// 副标题/摘要
    #[serde(default)]
    pub subtitle: Option<String>,

    /// 分类名称（部分站点不适用）
    #[serde(default)]
    pub category: Option<String>,

    /// 标签列表（有序）
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ArticleDraft {
    /// 校验草稿是否满足提交前提
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(EngineError::Config("文章标题不能为空".to_string()));
        }
        Ok(())
    }
}

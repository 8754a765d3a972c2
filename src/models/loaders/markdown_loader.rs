//! Markdown 文章加载器
//!
//! 从带 `+++` 分隔 TOML front matter 的 Markdown 文件加载 ArticleDraft。
//! 引擎只消费解析结果，不对正文做任何归一化。

use std::path::Path;

use serde::Deserialize;
use tokio::fs;
use tracing::info;

use crate::error::{EngineError, Result};
use crate::models::ArticleDraft;

/// front matter 字段
#[derive(Debug, Deserialize)]
struct FrontMatter {
    title: String,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

/// 从 Markdown 文件加载文章草稿
///
/// 文件格式：
///
/// ```text
/// +++
/// title = "文章标题"
/// tags = ["rust", "自动化"]
/// +++
/// 正文内容...
/// ```
pub async fn load_markdown_article(path: &Path) -> Result<ArticleDraft> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|e| EngineError::Config(format!("无法读取文章 {}: {}", path.display(), e)))?;

    let (front, body) = split_front_matter(&raw).ok_or_else(|| {
        EngineError::Config(format!(
            "文章 {} 缺少 +++ 分隔的 front matter（title 为必填）",
            path.display()
        ))
    })?;

    let meta: FrontMatter = toml::from_str(front)?;

    let draft = ArticleDraft {
        title: meta.title,
        content: body.to_string(),
        subtitle: meta.subtitle,
        category: meta.category,
        tags: meta.tags,
    };
    draft.validate()?;

    info!(
        "✓ 已加载文章《{}》（正文 {} 字符，{} 个标签）",
        draft.title,
        draft.content.chars().count(),
        draft.tags.len()
    );

    Ok(draft)
}

/// 切分 front matter 与正文，返回 (front matter, 正文)
fn split_front_matter(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.strip_prefix("+++")?;
    let rest = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n"))?;
    let end = rest.find("\n+++")?;
    let front = &rest[..end];
    let after = &rest[end + "\n+++".len()..];
    let body = after.trim_start_matches(['\r', '\n']);
    Some((front, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_front_matter() {
        let raw = "+++\ntitle = \"t\"\n+++\n正文第一行\n第二行";
        let (front, body) = split_front_matter(raw).unwrap();
        assert_eq!(front, "title = \"t\"");
        assert_eq!(body, "正文第一行\n第二行");
    }

    #[test]
    fn test_missing_front_matter() {
        assert!(split_front_matter("# 普通 Markdown\n内容").is_none());
    }

    #[tokio::test]
    async fn test_load_full_article() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("article.md");
        tokio::fs::write(
            &path,
            "+++\ntitle = \"Hello\"\nsubtitle = \"副标题\"\ncategory = \"后端\"\ntags = [\"rust\", \"cdp\"]\n+++\nWorld",
        )
        .await
        .unwrap();

        let draft = load_markdown_article(&path).await.unwrap();
        assert_eq!(draft.title, "Hello");
        assert_eq!(draft.content, "World");
        assert_eq!(draft.subtitle.as_deref(), Some("副标题"));
        assert_eq!(draft.category.as_deref(), Some("后端"));
        assert_eq!(draft.tags, vec!["rust", "cdp"]);
    }

    #[tokio::test]
    async fn test_load_rejects_empty_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("article.md");
        tokio::fs::write(&path, "+++\ntitle = \"\"\n+++\n正文").await.unwrap();

        assert!(load_markdown_article(&path).await.is_err());
    }
}

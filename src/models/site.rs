//! 站点配置模型
//!
//! 站点之间的差异全部收敛为纯数据：选择器候选列表、登录判定谓词、
//! 分类名称归一化表、快捷键。引擎本身不包含任何站点专属代码。

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::config::strip_jsonc_comments;
use crate::error::{EngineError, Result};

/// 有序的选择器候选列表
///
/// 按作者置信度/特异性排序，构造后不可变。解析时按声明顺序取第一个命中者。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorSet(Vec<String>);

impl SelectorSet {
    pub fn new(candidates: Vec<String>) -> Self {
        Self(candidates)
    }

    pub fn candidates(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 将每个候选中的占位符替换为具体值，返回新的列表（原列表不变）
    pub fn substitute(&self, placeholder: &str, value: &str) -> SelectorSet {
        SelectorSet(
            self.0
                .iter()
                .map(|s| s.replace(placeholder, value))
                .collect(),
        )
    }
}

impl<S: Into<String>> FromIterator<S> for SelectorSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// 登录态判定谓词
///
/// 站点提供的纯页面状态判定：URL 模式，或 DOM 标记的存在/缺失。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthPredicate {
    /// 当前 URL 匹配正则
    UrlMatches { pattern: String },
    /// 页面上存在标记元素（如头像节点）
    MarkerPresent { selector: String },
    /// 页面上不存在标记元素（如「登录」按钮消失）
    MarkerAbsent { selector: String },
}

/// 脚本化编辑器 API 探针
///
/// 「探测某个全局/实例引用是否暴露编程式设置内容的方法」的抽象：
/// 按声明顺序逐个求值 `detect`，第一个成功的探针胜出。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedProbe {
    /// 探针名称（仅用于日志）
    pub name: String,
    /// JS 布尔表达式，true 表示该编辑器 API 可用
    pub detect: String,
    /// 设置内容的 JS 语句，`$CONTENT` 会被替换为 JSON 编码后的正文
    pub set_content: String,
}

impl ScriptedProbe {
    /// 渲染设置内容脚本，正文经 JSON 编码后注入，避免引号/换行破坏脚本
    pub fn render_set_content(&self, text: &str) -> Result<String> {
        let encoded = serde_json::to_string(text)?;
        Ok(self.set_content.replace("$CONTENT", &encoded))
    }
}

/// 提交快捷键（按钮缺失时的备用交互面）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shortcut {
    /// 键名，如 "Enter" / "s"
    pub key: String,
    /// 是否带平台主修饰键（macOS 为 Cmd，其余为 Ctrl）
    #[serde(default)]
    pub ctrl_or_cmd: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
}

impl Shortcut {
    /// 解析平台主修饰键，返回 (ctrlKey, metaKey)
    pub fn resolved_modifiers(&self, macos: bool) -> (bool, bool) {
        if !self.ctrl_or_cmd {
            (false, false)
        } else if macos {
            (false, true)
        } else {
            (true, false)
        }
    }

    /// 人类可读形式，用于日志
    pub fn describe(&self, macos: bool) -> String {
        let mut parts = Vec::new();
        if self.ctrl_or_cmd {
            parts.push(if macos { "Cmd" } else { "Ctrl" });
        }
        if self.shift {
            parts.push("Shift");
        }
        if self.alt {
            parts.push("Alt");
        }
        parts.push(&self.key);
        parts.join("+")
    }
}

/// 各逻辑字段的选择器定义
///
/// 可选字段（副标题、分类、标签等）缺失时对应填充步骤为 no-op。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSelectors {
    pub title: SelectorSet,
    pub body: SelectorSet,
    #[serde(default)]
    pub subtitle: Option<SelectorSet>,
    /// 候选表达式中可使用 `$CATEGORY` 占位符，填充时替换为归一化后的分类名
    #[serde(default)]
    pub category: Option<SelectorSet>,
    #[serde(default)]
    pub tags: Option<SelectorSet>,
    /// 任意一个出现即认为编辑器加载完成
    #[serde(default)]
    pub editor_ready: Option<SelectorSet>,
    pub publish: SelectorSet,
    #[serde(default)]
    pub draft: Option<SelectorSet>,
}

/// 目标站点配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// 站点名称（仅用于日志）
    pub name: String,
    /// 编辑器入口 URL
    pub start_url: String,
    /// 登录态判定谓词
    pub auth: AuthPredicate,
    pub selectors: SiteSelectors,
    /// 脚本化编辑器探针，按优先级排序
    #[serde(default)]
    pub editor_probes: Vec<ScriptedProbe>,
    /// 分类名称归一化表：文章里的分类名 → 站点词表里的分类名
    #[serde(default)]
    pub category_names: HashMap<String, String>,
    #[serde(default)]
    pub publish_shortcut: Option<Shortcut>,
    #[serde(default)]
    pub draft_shortcut: Option<Shortcut>,
    /// 出现任一标记视为提交成功
    #[serde(default)]
    pub success_markers: Option<SelectorSet>,
    /// 出现任一标记视为提交被站点明确拒绝
    #[serde(default)]
    pub failure_markers: Option<SelectorSet>,
}

impl SiteConfig {
    /// 从 JSON（允许注释）文件加载站点配置
    pub async fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).await.map_err(|e| {
            EngineError::Config(format!("无法读取站点配置 {}: {}", path.display(), e))
        })?;
        let stripped = strip_jsonc_comments(&raw);
        let site: SiteConfig = serde_json::from_str(&stripped).map_err(|e| {
            EngineError::Config(format!("站点配置 {} 解析失败: {}", path.display(), e))
        })?;
        Ok(site)
    }

    /// 归一化分类名：查表命中则映射，否则原样返回
    pub fn normalize_category(&self, raw: &str) -> String {
        self.category_names
            .get(raw)
            .cloned()
            .unwrap_or_else(|| raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_set_preserves_order() {
        let set: SelectorSet = ["#a", ".b", "div[c]"].into_iter().collect();
        assert_eq!(set.candidates(), &["#a", ".b", "div[c]"]);
    }

    #[test]
    fn test_substitute_does_not_mutate_original() {
        let set: SelectorSet = [r#"li[data-name="$CATEGORY"]"#].into_iter().collect();
        let replaced = set.substitute("$CATEGORY", "后端");
        assert_eq!(replaced.candidates(), &[r#"li[data-name="后端"]"#]);
        assert_eq!(set.candidates(), &[r#"li[data-name="$CATEGORY"]"#]);
    }

    #[test]
    fn test_probe_render_escapes_content() {
        let probe = ScriptedProbe {
            name: "cm".to_string(),
            detect: "window.editor && typeof window.editor.setValue === 'function'".to_string(),
            set_content: "window.editor.setValue($CONTENT)".to_string(),
        };
        let js = probe.render_set_content("第一行\n\"引号\"").unwrap();
        assert_eq!(js, r#"window.editor.setValue("第一行\n\"引号\"")"#);
    }

    #[test]
    fn test_shortcut_modifiers_are_platform_aware() {
        let sc = Shortcut {
            key: "Enter".to_string(),
            ctrl_or_cmd: true,
            shift: false,
            alt: false,
        };
        assert_eq!(sc.resolved_modifiers(true), (false, true));
        assert_eq!(sc.resolved_modifiers(false), (true, false));
        assert_eq!(sc.describe(true), "Cmd+Enter");
        assert_eq!(sc.describe(false), "Ctrl+Enter");
    }

    #[test]
    fn test_site_config_parses_with_comments() {
        let raw = r#"
        {
            // 示例站点
            "name": "demo",
            "start_url": "https://example.com/editor",
            "auth": { "type": "marker_absent", "selector": ".login-button" },
            "selectors": {
                "title": ["input.title-input", "textarea[placeholder*=\"标题\"]"],
                "body": [".editor-content"],
                "publish": ["button.publish-btn"]
            },
            "category_names": { "后端开发": "后端" }
        }
        "#;
        let stripped = strip_jsonc_comments(raw);
        let site: SiteConfig = serde_json::from_str(&stripped).unwrap();
        assert_eq!(site.name, "demo");
        assert_eq!(site.selectors.title.candidates().len(), 2);
        assert!(site.selectors.draft.is_none());
        assert_eq!(site.normalize_category("后端开发"), "后端");
        assert_eq!(site.normalize_category("未知分类"), "未知分类");
    }
}

//! 用户配置
//!
//! 从固定的每用户位置读取 JSON（允许注释）配置文件，
//! 提供浏览器配置目录、是否自动发布等标量配置。
//! 文件缺失时使用默认值，引擎照常可用。

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{EngineError, Result};

fn default_screenshot_dir() -> PathBuf {
    PathBuf::from("screenshots")
}

fn default_login_timeout_secs() -> u64 {
    300
}

fn default_selector_timeout_secs() -> u64 {
    5
}

/// 用户配置
#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    /// 浏览器配置目录（持久化 Cookie / localStorage，实现会话复用）
    pub profile_dir: PathBuf,

    /// 未指定模式时是否直接发布（false 则存草稿）
    #[serde(default)]
    pub auto_publish: bool,

    /// 失败截图保存目录
    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: PathBuf,

    /// 手动登录等待预算（秒）
    #[serde(default = "default_login_timeout_secs")]
    pub login_timeout_secs: u64,

    /// 单个字段的选择器解析预算（秒，跨候选共享）
    #[serde(default = "default_selector_timeout_secs")]
    pub selector_timeout_secs: u64,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            profile_dir: default_config_dir().join("profile"),
            auto_publish: false,
            screenshot_dir: default_screenshot_dir(),
            login_timeout_secs: default_login_timeout_secs(),
            selector_timeout_secs: default_selector_timeout_secs(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".config").join("article_publish")
}

impl UserConfig {
    /// 配置文件的固定位置：`~/.config/article_publish/config.jsonc`
    pub fn default_path() -> PathBuf {
        default_config_dir().join("config.jsonc")
    }

    /// 从指定文件加载配置
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("无法读取用户配置 {}: {}", path.display(), e))
        })?;
        let config: UserConfig =
            serde_json::from_str(&strip_jsonc_comments(&raw)).map_err(|e| {
                EngineError::Config(format!("用户配置 {} 解析失败: {}", path.display(), e))
            })?;
        Ok(config)
    }

    /// 从固定位置加载，文件不存在时回退到默认配置
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        if path.exists() {
            match Self::load(&path) {
                Ok(config) => {
                    debug!("已加载用户配置: {}", path.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!("用户配置解析失败，使用默认配置: {}", e);
                }
            }
        } else {
            info!("未找到用户配置 {}，使用默认配置", path.display());
        }
        Self::default()
    }
}

/// 去除 JSONC 中的 `//` 行注释和 `/* */` 块注释
///
/// 字符串字面量内的注释样式字符原样保留。
pub fn strip_jsonc_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' => match chars.peek() {
                Some('/') => {
                    // 行注释：丢弃到行尾，保留换行
                    for next in chars.by_ref() {
                        if next == '\n' {
                            out.push('\n');
                            break;
                        }
                    }
                }
                Some('*') => {
                    chars.next();
                    let mut prev = '\0';
                    for next in chars.by_ref() {
                        if prev == '*' && next == '/' {
                            break;
                        }
                        prev = next;
                    }
                }
                _ => out.push(c),
            },
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_comments() {
        let raw = "{\n  \"a\": 1, // 注释\n  \"b\": 2\n}";
        let v: serde_json::Value = serde_json::from_str(&strip_jsonc_comments(raw)).unwrap();
        assert_eq!(v["a"], 1);
        assert_eq!(v["b"], 2);
    }

    #[test]
    fn test_strip_block_comments() {
        let raw = "{ /* 块注释\n跨行 */ \"a\": true }";
        let v: serde_json::Value = serde_json::from_str(&strip_jsonc_comments(raw)).unwrap();
        assert_eq!(v["a"], true);
    }

    #[test]
    fn test_preserves_slashes_inside_strings() {
        let raw = r#"{ "url": "https://example.com/a", "glob": "a/*b*/c" }"#;
        let v: serde_json::Value = serde_json::from_str(&strip_jsonc_comments(raw)).unwrap();
        assert_eq!(v["url"], "https://example.com/a");
        assert_eq!(v["glob"], "a/*b*/c");
    }

    #[test]
    fn test_preserves_escaped_quotes() {
        let raw = r#"{ "s": "he said \"// not a comment\"" }"#;
        let v: serde_json::Value = serde_json::from_str(&strip_jsonc_comments(raw)).unwrap();
        assert_eq!(v["s"], r#"he said "// not a comment""#);
    }

    #[test]
    fn test_config_defaults_apply() {
        let raw = r#"{ "profile_dir": "/tmp/profile" }"#;
        let config: UserConfig = serde_json::from_str(&strip_jsonc_comments(raw)).unwrap();
        assert!(!config.auto_publish);
        assert_eq!(config.login_timeout_secs, 300);
        assert_eq!(config.selector_timeout_secs, 5);
        assert_eq!(config.screenshot_dir, PathBuf::from("screenshots"));
    }
}

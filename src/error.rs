//! 引擎错误类型
//!
//! 错误分类对应发布流程的各个阶段：
//! - 启动阶段 → `Launch`
//! - 登录阶段 → `LoginTimeout`
//! - 定位阶段 → `ElementNotFound`
//! - 注入阶段 → `Fill`
//! - 提交阶段 → `SubmissionFailed`
//!
//! 注意：「提交结果不确定」不是错误，而是 `SubmissionStatus::Uncertain`——
//! 引擎不允许把 uncertain 自动升级为成功或失败。

use thiserror::Error;

/// 发布引擎错误
#[derive(Debug, Error)]
pub enum EngineError {
    /// 浏览器启动失败（运行时不可用、配置目录被锁定等）
    #[error("浏览器启动失败: {reason}")]
    Launch { reason: String },

    /// 手动登录未在预算时间内完成
    #[error("登录等待超时（已等待 {waited_secs} 秒），请先完成手动登录后重试")]
    LoginTimeout { waited_secs: u64 },

    /// 选择器候选列表全部耗尽仍未找到元素
    #[error("未找到页面元素「{field}」，已尝试的选择器: {candidates:?}")]
    ElementNotFound {
        field: String,
        candidates: Vec<String>,
    },

    /// 内容注入失败
    #[error("内容注入失败（编辑器类型: {surface}）: {reason}")]
    Fill { surface: String, reason: String },

    /// 提交序列中观察到明确的失败，或提交动作本身无法执行
    #[error("提交失败: {reason}")]
    SubmissionFailed { reason: String },

    /// 配置数据错误（站点配置、用户配置、文章格式）
    #[error("配置错误: {0}")]
    Config(String),

    /// 浏览器协议层错误
    #[error("浏览器协议错误: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    /// 文件 IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化/反序列化失败
    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::Config(format!("TOML 解析失败: {}", err))
    }
}

/// 引擎结果类型
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_not_found_carries_candidates() {
        let err = EngineError::ElementNotFound {
            field: "title".to_string(),
            candidates: vec!["#title".to_string(), "input.title".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("title"));
        assert!(msg.contains("#title"));
        assert!(msg.contains("input.title"));
    }

    #[test]
    fn test_login_timeout_message() {
        let err = EngineError::LoginTimeout { waited_secs: 300 };
        assert!(err.to_string().contains("300"));
    }
}

//! 提交结果模型

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 提交模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    /// 存为草稿（不公开）
    Draft,
    /// 正式发布
    Publish,
}

impl SubmitMode {
    /// 从命令行参数解析
    pub fn parse(arg: &str) -> Option<Self> {
        match arg {
            "draft" => Some(SubmitMode::Draft),
            "publish" => Some(SubmitMode::Publish),
            _ => None,
        }
    }
}

impl fmt::Display for SubmitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitMode::Draft => write!(f, "草稿"),
            SubmitMode::Publish => write!(f, "发布"),
        }
    }
}

/// 提交状态
///
/// `Uncertain` 与 `Failed` 是两个独立状态：提交动作不可安全重试，
/// 未观察到确认信号时只能如实报告「不确定」，由人或调用方裁决。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Draft,
    Published,
    Uncertain,
    Failed,
}

impl SubmissionStatus {
    /// 映射为进程退出码：成功为 0，失败为 1，不确定为 2
    pub fn exit_code(self) -> i32 {
        match self {
            SubmissionStatus::Draft | SubmissionStatus::Published => 0,
            SubmissionStatus::Failed => 1,
            SubmissionStatus::Uncertain => 2,
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubmissionStatus::Draft => "draft",
            SubmissionStatus::Published => "published",
            SubmissionStatus::Uncertain => "uncertain",
            SubmissionStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// 提交结果，返回给命令行包装层
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResult {
    pub status: SubmissionStatus,
    pub url: Option<String>,
    pub error_detail: Option<String>,
    pub screenshot_path: Option<PathBuf>,
}

impl SubmissionResult {
    /// 提交动作得到确认信号后的成功结果
    pub fn succeeded(mode: SubmitMode, url: String) -> Self {
        let status = match mode {
            SubmitMode::Draft => SubmissionStatus::Draft,
            SubmitMode::Publish => SubmissionStatus::Published,
        };
        Self {
            status,
            url: Some(url),
            error_detail: None,
            screenshot_path: None,
        }
    }

    /// 宽限窗口内未观察到任何确认信号
    pub fn uncertain() -> Self {
        Self {
            status: SubmissionStatus::Uncertain,
            url: None,
            error_detail: None,
            screenshot_path: None,
        }
    }

    /// 页面上出现了明确的失败标记
    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            status: SubmissionStatus::Failed,
            url: None,
            error_detail: Some(detail.into()),
            screenshot_path: None,
        }
    }
}

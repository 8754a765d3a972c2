//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露「执行 JS」的能力。
//! 选择器解析、内容注入、登录检测都通过这一层访问页面，
//! 不认识 ArticleDraft / SiteConfig，不处理业务流程。

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::Result;

/// JS 执行器
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于截图等非 eval 操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 读取当前页面 URL
    pub async fn current_url(&self) -> Result<String> {
        self.eval_as::<String>("location.href").await
    }
}

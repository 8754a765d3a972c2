//! 内容注入服务 - 业务能力层
//!
//! 同一个「往编辑器里写文本」的动作要兼容三种互不兼容的编辑器表面，
//! 按优先级探测，第一个探测成功者胜出：
//!
//! 1. 脚本化编辑器 API —— 编辑器自己暴露的设置内容方法。优先使用，
//!    因为它能维持编辑器内部派生状态（撤销历史、语法高亮），
//!    直接改 DOM 会让这些状态失去同步。
//! 2. contentEditable —— 必须先 focus（部分编辑器丢弃未聚焦区域的
//!    修改），设置文本后派发合成 input 事件让监听方观察到更新。
//! 3. 原生 input/textarea —— 通过原型链上的原生 value setter 赋值
//!    （框架虚拟 DOM 可能忽略其他写入路径），再派发 input/change。
//!
//! 填充是幂等的；空字符串同样会清掉已有的占位内容，不是 no-op。

use tracing::{debug, info};

use crate::error::{EngineError, Result};
use crate::infrastructure::JsExecutor;
use crate::models::ScriptedProbe;

/// 编辑器表面，填充时探测得到，不跨调用持久化
#[derive(Debug, Clone)]
pub enum EditorSurface {
    /// 脚本化编辑器 API
    ScriptedApi { probe: ScriptedProbe },
    /// contentEditable 区域
    ContentEditable { selector: String },
    /// 原生 input / textarea
    NativeInput { selector: String },
}

impl EditorSurface {
    pub fn kind(&self) -> &'static str {
        match self {
            EditorSurface::ScriptedApi { .. } => "scripted_api",
            EditorSurface::ContentEditable { .. } => "content_editable",
            EditorSurface::NativeInput { .. } => "native_input",
        }
    }
}

/// 内容注入服务
#[derive(Default)]
pub struct ContentInjector;

impl ContentInjector {
    pub fn new() -> Self {
        Self
    }

    /// 按优先级探测编辑器表面
    pub async fn detect_surface(
        &self,
        executor: &JsExecutor,
        selector: &str,
        probes: &[ScriptedProbe],
    ) -> Result<EditorSurface> {
        // 1. 脚本化 API 探针，按声明顺序
        for probe in probes {
            let js = format!("!!({})", probe.detect);
            if executor.eval_as::<bool>(js).await.unwrap_or(false) {
                info!("✓ 探测到脚本化编辑器 API: {}", probe.name);
                return Ok(EditorSurface::ScriptedApi {
                    probe: probe.clone(),
                });
            }
            debug!("探针「{}」未命中", probe.name);
        }

        let sel = serde_json::to_string(selector)?;

        // 2. contentEditable
        let js = format!(
            "(() => {{ const el = document.querySelector({sel}); return !!(el && el.isContentEditable); }})()"
        );
        if executor.eval_as::<bool>(js).await? {
            return Ok(EditorSurface::ContentEditable {
                selector: selector.to_string(),
            });
        }

        // 3. 原生 input / textarea
        let js = format!(
            "(() => {{ const el = document.querySelector({sel}); \
             return !!(el && (el.tagName === 'INPUT' || el.tagName === 'TEXTAREA')); }})()"
        );
        if executor.eval_as::<bool>(js).await? {
            return Ok(EditorSurface::NativeInput {
                selector: selector.to_string(),
            });
        }

        Err(EngineError::Fill {
            surface: "unknown".to_string(),
            reason: format!("无法识别 {} 的编辑器表面类型", selector),
        })
    }

    /// 向已探测的编辑器表面写入文本
    pub async fn fill_content(
        &self,
        executor: &JsExecutor,
        surface: &EditorSurface,
        text: &str,
    ) -> Result<()> {
        let js = match surface {
            EditorSurface::ScriptedApi { probe } => build_scripted_fill_js(probe, text)?,
            EditorSurface::ContentEditable { selector } => {
                build_content_editable_fill_js(selector, text)?
            }
            EditorSurface::NativeInput { selector } => build_native_fill_js(selector, text)?,
        };

        let ok: bool = executor.eval_as(js).await?;
        if !ok {
            return Err(EngineError::Fill {
                surface: surface.kind().to_string(),
                reason: "填充脚本返回失败（元素缺失或编辑器 API 抛出异常）".to_string(),
            });
        }
        debug!(
            "✓ 已写入 {} 字符（表面: {}）",
            text.chars().count(),
            surface.kind()
        );
        Ok(())
    }

    /// 便捷方法：按原生输入框路径填充（标题/副标题/标签输入框）
    pub async fn fill_native(
        &self,
        executor: &JsExecutor,
        selector: &str,
        text: &str,
    ) -> Result<()> {
        let surface = EditorSurface::NativeInput {
            selector: selector.to_string(),
        };
        self.fill_content(executor, &surface, text).await
    }
}

fn build_scripted_fill_js(probe: &ScriptedProbe, text: &str) -> Result<String> {
    let set = probe.render_set_content(text)?;
    Ok(format!(
        "(() => {{ try {{ {set}; return true; }} catch (e) {{ return false; }} }})()"
    ))
}

fn build_content_editable_fill_js(selector: &str, text: &str) -> Result<String> {
    let sel = serde_json::to_string(selector)?;
    let content = serde_json::to_string(text)?;
    Ok(format!(
        r#"
        (() => {{
            const el = document.querySelector({sel});
            if (!el) return false;
            el.focus();
            el.textContent = {content};
            el.dispatchEvent(new InputEvent('input', {{ bubbles: true }}));
            return true;
        }})()
        "#
    ))
}

fn build_native_fill_js(selector: &str, text: &str) -> Result<String> {
    let sel = serde_json::to_string(selector)?;
    let content = serde_json::to_string(text)?;
    Ok(format!(
        r#"
        (() => {{
            const el = document.querySelector({sel});
            if (!el) return false;
            el.focus();
            const proto = el.tagName === 'TEXTAREA'
                ? window.HTMLTextAreaElement.prototype
                : window.HTMLInputElement.prototype;
            const setter = Object.getOwnPropertyDescriptor(proto, 'value').set;
            setter.call(el, {content});
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()
        "#
    ))
}

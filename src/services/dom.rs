//! DOM 交互助手 - 业务能力层
//!
//! 点击与键盘事件派发。提交快捷键走这里而不是重复点击同一个按钮：
//! 部分站点把动作同时绑定在条件渲染的按钮和全局快捷键上，
//! 按钮缺失时快捷键是真正不同的交互面。

use tracing::debug;

use crate::error::{EngineError, Result};
use crate::infrastructure::JsExecutor;
use crate::models::Shortcut;

/// 点击选择器命中的元素
pub async fn click(executor: &JsExecutor, selector: &str) -> Result<()> {
    let sel = serde_json::to_string(selector)?;
    let js = format!(
        "(() => {{ const el = document.querySelector({sel}); if (!el) return false; el.click(); return true; }})()"
    );
    let ok: bool = executor.eval_as(js).await?;
    if !ok {
        return Err(EngineError::ElementNotFound {
            field: "click".to_string(),
            candidates: vec![selector.to_string()],
        });
    }
    debug!("✓ 已点击: {}", selector);
    Ok(())
}

/// 在指定元素上派发提交键（Enter），用于标签录入的确认动作
pub async fn press_commit_key(executor: &JsExecutor, selector: &str) -> Result<()> {
    let sel = serde_json::to_string(selector)?;
    let js = format!(
        r#"
        (() => {{
            const el = document.querySelector({sel});
            if (!el) return false;
            const opts = {{ key: 'Enter', code: 'Enter', keyCode: 13, bubbles: true, cancelable: true }};
            el.dispatchEvent(new KeyboardEvent('keydown', opts));
            el.dispatchEvent(new KeyboardEvent('keyup', opts));
            return true;
        }})()
        "#
    );
    let ok: bool = executor.eval_as(js).await?;
    if !ok {
        return Err(EngineError::ElementNotFound {
            field: "commit_key".to_string(),
            candidates: vec![selector.to_string()],
        });
    }
    Ok(())
}

/// 向页面派发全局快捷键
pub async fn dispatch_shortcut(executor: &JsExecutor, shortcut: &Shortcut) -> Result<()> {
    dispatch_shortcut_for(executor, shortcut, cfg!(target_os = "macos")).await
}

/// 平台修饰键显式传入，便于测试脚本生成
async fn dispatch_shortcut_for(
    executor: &JsExecutor,
    shortcut: &Shortcut,
    macos: bool,
) -> Result<()> {
    let js = build_shortcut_js(shortcut, macos)?;
    debug!("派发快捷键: {}", shortcut.describe(macos));
    executor.eval(js).await?;
    Ok(())
}

fn build_shortcut_js(shortcut: &Shortcut, macos: bool) -> Result<String> {
    let (ctrl, meta) = shortcut.resolved_modifiers(macos);
    let key = serde_json::to_string(&shortcut.key)?;
    Ok(format!(
        r#"
        (() => {{
            const opts = {{
                key: {key},
                ctrlKey: {ctrl},
                metaKey: {meta},
                shiftKey: {shift},
                altKey: {alt},
                bubbles: true,
                cancelable: true
            }};
            const target = document.activeElement || document.body;
            target.dispatchEvent(new KeyboardEvent('keydown', opts));
            document.dispatchEvent(new KeyboardEvent('keydown', opts));
            return true;
        }})()
        "#,
        shift = shortcut.shift,
        alt = shortcut.alt,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_js_uses_meta_on_macos() {
        let sc = Shortcut {
            key: "Enter".to_string(),
            ctrl_or_cmd: true,
            shift: false,
            alt: false,
        };
        let js = build_shortcut_js(&sc, true).unwrap();
        assert!(js.contains("metaKey: true"));
        assert!(js.contains("ctrlKey: false"));

        let js = build_shortcut_js(&sc, false).unwrap();
        assert!(js.contains("metaKey: false"));
        assert!(js.contains("ctrlKey: true"));
    }

    #[test]
    fn test_shortcut_js_escapes_key() {
        let sc = Shortcut {
            key: "s".to_string(),
            ctrl_or_cmd: true,
            shift: true,
            alt: false,
        };
        let js = build_shortcut_js(&sc, false).unwrap();
        assert!(js.contains(r#"key: "s""#));
        assert!(js.contains("shiftKey: true"));
    }
}

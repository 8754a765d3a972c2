//! 选择器解析服务 - 业务能力层
//!
//! 站点标记随版本/语言环境漂移，单一选择器经常误报「元素不存在」。
//! 这里按声明顺序尝试一组候选选择器：每个轮询 tick 用一段脚本
//! 一次性遍历全部候选，取第一个满足存在性/可见性要求的；
//! 超时预算跨全部候选共享，而不是逐个候选串行等待。

use std::time::Duration;

use tracing::{debug, info};

use crate::error::{EngineError, Result};
use crate::infrastructure::{poll_until, JsExecutor};
use crate::models::SelectorSet;

const DEFAULT_TICK: Duration = Duration::from_millis(150);

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 跨全部候选共享的总预算
    pub timeout: Duration,
    /// 是否要求元素可见（就绪探测只要求存在）
    pub require_visible: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            require_visible: true,
        }
    }
}

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// 命中的选择器表达式
    pub selector: String,
    /// 在候选列表中的位置
    pub index: usize,
}

/// 选择器解析服务
pub struct SelectorResolver {
    tick: Duration,
}

impl Default for SelectorResolver {
    fn default() -> Self {
        Self { tick: DEFAULT_TICK }
    }
}

impl SelectorResolver {
    pub fn new(tick: Duration) -> Self {
        Self { tick }
    }

    /// 按声明顺序解析候选列表中第一个满足要求的元素
    ///
    /// 同一轮询瞬间有多个候选可见时，列表中靠前者胜出（确定性保证）。
    /// 预算耗尽返回 `ElementNotFound`，其中携带完整的输入候选列表。
    pub async fn try_selectors(
        &self,
        executor: &JsExecutor,
        field: &str,
        set: &SelectorSet,
        opts: &ResolveOptions,
    ) -> Result<Resolved> {
        let js = build_probe_js(set.candidates(), opts.require_visible)?;
        let result = self
            .resolve_with(field, set, opts.timeout, || probe(executor, &js))
            .await?;
        debug!(
            "✓ 字段「{}」命中候选 #{}: {}",
            field, result.index, result.selector
        );
        Ok(result)
    }

    /// 阻塞直到任一「就绪」选择器出现（只要求存在，不要求可见）
    ///
    /// 用于探测「编辑器加载完成」这类就绪条件。
    pub async fn wait_for_any(
        &self,
        executor: &JsExecutor,
        field: &str,
        set: &SelectorSet,
        timeout: Duration,
    ) -> Result<Resolved> {
        let opts = ResolveOptions {
            timeout,
            require_visible: false,
        };
        let result = self.try_selectors(executor, field, set, &opts).await?;
        info!("✓ 就绪条件「{}」已满足", field);
        Ok(result)
    }

    /// 轮询骨架，探测函数以参数注入以便单元测试
    pub(crate) async fn resolve_with<F, Fut>(
        &self,
        field: &str,
        set: &SelectorSet,
        timeout: Duration,
        probe: F,
    ) -> Result<Resolved>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<Option<usize>>>,
    {
        let index = poll_until(probe, self.tick, timeout).await?;
        match index {
            Some(index) => Ok(Resolved {
                selector: set.candidates()[index].clone(),
                index,
            }),
            None => Err(EngineError::ElementNotFound {
                field: field.to_string(),
                candidates: set.candidates().to_vec(),
            }),
        }
    }
}

/// 单个 tick 的探测：执行脚本并把命中下标转成 Option
async fn probe(executor: &JsExecutor, js: &str) -> Result<Option<usize>> {
    let index: i64 = executor.eval_as(js).await?;
    Ok(usize::try_from(index).ok())
}

/// 生成遍历候选列表的探测脚本
///
/// 候选列表以 JSON 数组注入，遍历顺序即声明顺序；无效选择器
/// （querySelector 抛异常）按未命中处理，不中断遍历。
fn build_probe_js(candidates: &[String], require_visible: bool) -> Result<String> {
    let list = serde_json::to_string(candidates)?;
    Ok(format!(
        r#"
        (() => {{
            const sels = {list};
            for (let i = 0; i < sels.length; i++) {{
                let el = null;
                try {{ el = document.querySelector(sels[i]); }} catch (e) {{ continue; }}
                if (!el) continue;
                if ({require_visible}) {{
                    const rect = el.getBoundingClientRect();
                    const style = window.getComputedStyle(el);
                    if (rect.width === 0 || rect.height === 0) continue;
                    if (style.display === 'none' || style.visibility === 'hidden') continue;
                }}
                return i;
            }}
            return -1;
        }})()
        "#
    ))
}

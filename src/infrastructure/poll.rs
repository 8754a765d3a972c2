//! 轮询组合子 - 基础设施层
//!
//! 登录等待、选择器解析、提交确认三处共用的「固定间隔轮询直到条件满足」
//! 逻辑统一在这里，避免各处重复实现 sleep 循环。

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::error::Result;

/// 以固定间隔轮询 `check`，直到它返回 `Some` 或总预算耗尽
///
/// 行为约定：
/// - 第一次检查立即执行，不等待间隔（条件已满足时立即返回）
/// - 预算小于一个间隔时，在截止时刻补一次最终检查，总阻塞不超过预算
/// - 超时返回 `Ok(None)`，由调用方决定映射为哪种错误
///
/// # 参数
/// - `check`: 每个 tick 执行的检查，`Some(T)` 表示条件满足
/// - `interval`: 轮询间隔
/// - `timeout`: 总预算（跨所有 tick 共享，不是单次预算）
pub async fn poll_until<T, F, Fut>(
    mut check: F,
    interval: Duration,
    timeout: Duration,
) -> Result<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(value) = check().await? {
            return Ok(Some(value));
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }

        // 最后一个 tick 只睡到截止时刻
        let remaining = deadline - now;
        sleep(remaining.min(interval)).await;
    }
}

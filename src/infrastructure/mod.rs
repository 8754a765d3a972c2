//! 基础设施层（Infrastructure Layer）
//!
//! 持有稀缺资源（Page），只暴露能力：
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 能力
//! - `poll_until` - 登录等待 / 选择器解析 / 提交确认共用的轮询组合子

pub mod js_executor;
pub mod poll;

pub use js_executor::JsExecutor;
pub use poll::poll_until;

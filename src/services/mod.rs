//! 业务能力层（Services Layer）
//!
//! 描述「我能做什么」，每个服务只提供一种能力，不编排流程：
//! - `SelectorResolver` - 按声明顺序解析候选选择器
//! - `ContentInjector` - 向三种编辑器表面写入文本
//! - `LoginMonitor` - 等待人工登录完成
//! - `ScreenshotService` - 失败现场截图
//! - `dom` - 点击 / 键盘事件派发

pub mod content_injector;
pub mod dom;
pub mod login_monitor;
pub mod screenshot;
pub mod selector_resolver;

pub use content_injector::{ContentInjector, EditorSurface};
pub use login_monitor::LoginMonitor;
pub use screenshot::ScreenshotService;
pub use selector_resolver::{ResolveOptions, Resolved, SelectorResolver};

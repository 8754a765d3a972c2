//! 浏览器层
//!
//! 会话生命周期（进程、profile 目录、页面句柄）的唯一入口。

pub mod session;

pub use session::{ProfileLock, Session};

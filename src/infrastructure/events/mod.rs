//! Events - 页面事件推送

mod publisher;

pub use publisher::{EventPublisher, WsEvent};

//! Translation Adapter - 机器翻译客户端实现

mod google_translator;

pub use google_translator::{GoogleTranslator, GoogleTranslatorConfig};

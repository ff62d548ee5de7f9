//! 记忆层：会话内对话历史与按用户键隔离的会话管理

pub mod conversation;
pub mod session;

pub use conversation::{ConversationMemory, Message, Role};
pub use session::{Session, SessionStore};

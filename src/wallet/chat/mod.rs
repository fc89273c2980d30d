//! 会话模块（只读协作方）
//!
//! 会话数据由聊天服务维护，连接同步只用它生成待清理会话负载

pub mod dao;
pub mod models;

pub use dao::ChatDao;
pub use models::LocalChat;

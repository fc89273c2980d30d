pub mod chat;
pub mod connection;
pub mod db;
pub mod types;

// 重新导出连接同步相关类型和函数
pub use connection::{ConnectionSyncer, ConnectionSyncerConfig, Contact, Invitation};

pub mod wallet;

// 重新导出常用类型和函数，方便外部使用
pub use wallet::{
    chat::{ChatDao, LocalChat},
    connection::{ConnectionListener, ConnectionSyncer, ConnectionSyncerConfig, Contact, Invitation},
};

//! 连接（联系人 / 邀请）模块
//!
//! 实现连接关系快照的同步与调和

pub mod api;
pub mod dao;
pub mod listener;
pub mod models;
pub mod reconcile;
pub mod service;
pub mod types;

// 重新导出主要类型和函数
pub use api::ConnectionApi;
pub use dao::ConnectionDao;
pub use listener::{ConnectionListener, EmptyConnectionListener};
pub use models::{Contact, ConnectionSyncerConfig, Invitation, TYPE_RECEIVED, TYPE_SENT};
pub use reconcile::{
    reconcile_connections, parse_iso_seconds, ReconcileOutcome, RecordError, SkippedRecord,
};
pub use service::ConnectionSyncer;
pub use types::{ConnectionListResp, RemoteRelationship, TargetUserInfo};

//! 连接本地模型定义

use serde::{Deserialize, Serialize};

/// 邀请类型：本端发出的邀请
pub const TYPE_SENT: &str = "sent";
/// 邀请类型：对端发来的邀请
pub const TYPE_RECEIVED: &str = "received";

/// 本地联系人数据结构（对应一条 accepted 关系）
///
/// `id` 取关系记录里 targetUserInfo.userId；
/// 时间戳为带小数的 epoch 秒（由服务器的 ISO-8601 换算而来）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "id")]
    pub id: i64,
    #[serde(rename = "ethAddress")]
    pub eth_address: String,
    #[serde(rename = "username")]
    pub username: String,
    #[serde(rename = "profileImage")]
    pub profile_image: String,
    #[serde(rename = "createdAt")]
    pub created_at: f64,
    #[serde(rename = "updatedAt")]
    pub updated_at: f64,
    #[serde(rename = "status")]
    pub status: String,
}

/// 本地邀请数据结构（对应一条 pending 关系）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    #[serde(rename = "id")]
    pub id: i64,
    #[serde(rename = "username")]
    pub username: String,
    #[serde(rename = "profileImage")]
    pub profile_image: String,
    /// TYPE_SENT / TYPE_RECEIVED，由关系记录的 direction 换算
    #[serde(rename = "type")]
    pub invite_type: String,
    #[serde(rename = "createdAt")]
    pub created_at: f64,
    #[serde(rename = "updatedAt")]
    pub updated_at: f64,
}

/// 连接同步器配置
pub struct ConnectionSyncerConfig {
    /// 当前用户 ID
    pub user_id: i64,
    /// API 基础 URL
    pub api_base_url: String,
    /// Token
    pub token: String,
    /// 数据库路径（SQLite），与会话共用同一个文件即可
    pub db_path: String,
}

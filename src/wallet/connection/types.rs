//! 连接 API DTO（请求和响应结构体）
//!
//! `RemoteRelationship` 的字段名与后端接口约定一致，属于固定契约，不能改动

use serde::{Deserialize, Deserializer, Serialize};

/// 关系记录的 status 取值（后端枚举，字符串形式）
pub mod relationship_status {
    pub const ACCEPTED: &str = "accepted";
    pub const PENDING: &str = "pending";
    pub const MUTED: &str = "muted";
    pub const BLOCKED: &str = "blocked";
}

/// pending 记录的 direction 取值
pub mod relationship_direction {
    pub const SENT: &str = "sent";
    pub const RECEIVED: &str = "received";
}

/// 反序列化数组字段，处理 null 值
pub(crate) fn deserialize_vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// 对端用户信息（嵌在关系记录里）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetUserInfo {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "username")]
    pub username: String,
    #[serde(rename = "profileImage", default)]
    pub profile_image: String,
    #[serde(rename = "profileLargeImage", default)]
    pub profile_large_image: String,
    #[serde(rename = "ethAddress", default)]
    pub eth_address: String,
}

/// 服务器下发的关系记录（当前用户视角的权威快照条目）
///
/// `targetUserInfo` 用 Option 承接：个别记录缺失该字段时按单条跳过处理，
/// 不能让整个响应反序列化失败
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteRelationship {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "targetUserId")]
    pub target_user_id: i64,
    #[serde(rename = "status")]
    pub status: String,
    /// ISO-8601 字符串，例如 "2019-04-17T08:57:54.547Z"
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    /// 仅 pending 记录携带：sent / received
    #[serde(rename = "direction", default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(rename = "targetUserInfo", default)]
    pub target_user_info: Option<TargetUserInfo>,
}

/// 连接关系列表响应（业务逻辑层结构体，可直接从 API 响应反序列化）
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionListResp {
    #[serde(rename = "connections")]
    #[serde(deserialize_with = "deserialize_vec_or_null")]
    pub connections: Vec<RemoteRelationship>,
    #[serde(default)]
    pub total: Option<i32>,
}

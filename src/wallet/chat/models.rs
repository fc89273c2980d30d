//! 会话本地模型定义

use serde::{Deserialize, Serialize};

/// 本地会话数据结构（按对端用户维度，单聊）
///
/// 由聊天服务写入维护，连接同步只读取，
/// 用于在联系人被移除时生成待清理会话负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalChat {
    /// 对端用户 ID
    #[serde(rename = "counterpartId")]
    pub counterpart_id: i64,
    #[serde(rename = "username")]
    pub username: String,
    /// 未读消息数
    #[serde(rename = "unreadCount", default)]
    pub unread_count: i32,
    /// 最新消息摘要
    #[serde(rename = "latestMsg", default)]
    pub latest_msg: String,
    /// 最新消息时间（epoch 秒）
    #[serde(rename = "latestMsgTime", default)]
    pub latest_msg_time: f64,
}

//! 连接关系调和核心
//!
//! 把服务器下发的关系快照换算成三份本地列表：邀请、联系人、待清理会话。
//! 纯函数实现，不做任何 I/O；取数和结果分发都在服务层

use crate::wallet::chat::models::LocalChat;
use crate::wallet::connection::models::{Contact, Invitation, TYPE_RECEIVED, TYPE_SENT};
use crate::wallet::connection::types::{
    relationship_direction, relationship_status, RemoteRelationship,
};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// 单条记录校验失败的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("缺少 targetUserInfo 字段")]
    MissingTargetUserInfo,
    #[error("时间戳解析失败: {0}")]
    BadTimestamp(String),
}

/// 被跳过的记录及原因
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub target_user_id: i64,
    pub reason: RecordError,
}

/// 一次调和的完整结果
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    /// pending 关系换算出的邀请列表
    pub invitations: Vec<Invitation>,
    /// accepted 关系换算出的联系人列表
    pub contacts: Vec<Contact>,
    /// 不再是联系人、且存在本地会话的对端对应的会话条目（供下游清理）
    pub cleared_chats: Vec<LocalChat>,
    /// 校验失败被跳过的记录
    pub skipped: Vec<SkippedRecord>,
}

/// 把 ISO-8601 时间戳换算成带小数的 epoch 秒
///
/// 例如 "2019-04-17T08:57:54.547Z" -> 1555491474.547
pub fn parse_iso_seconds(ts: &str) -> Result<f64, RecordError> {
    let dt = chrono::DateTime::parse_from_rfc3339(ts)
        .map_err(|_| RecordError::BadTimestamp(ts.to_string()))?;
    Ok(dt.timestamp_millis() as f64 / 1000.0)
}

/// 调和连接关系：以服务器快照为准，整体替换本地的联系人和邀请列表
///
/// - accepted -> 联系人，pending -> 邀请，其余状态不产生条目
/// - 结果顺序与快照里首次出现的顺序一致，不重新排序
/// - 缺少 targetUserInfo 或时间戳不合法的记录按单条跳过，不中断整次调和
/// - `prev_contacts` 只用于计算被移除的联系人；对应会话存在时进入清理负载
pub fn reconcile_connections(
    remote: &[RemoteRelationship],
    prev_contacts: &[Contact],
    chats: &HashMap<i64, LocalChat>,
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    for record in remote {
        let accepted = record.status == relationship_status::ACCEPTED;
        let pending = record.status == relationship_status::PENDING;
        if !accepted && !pending {
            debug!(
                "[Reconcile] 忽略状态为 {} 的记录: {}",
                record.status, record.target_user_id
            );
            continue;
        }

        let info = match &record.target_user_info {
            Some(info) => info,
            None => {
                outcome.skipped.push(SkippedRecord {
                    target_user_id: record.target_user_id,
                    reason: RecordError::MissingTargetUserInfo,
                });
                continue;
            }
        };

        let created_at = match parse_iso_seconds(&record.created_at) {
            Ok(v) => v,
            Err(reason) => {
                outcome.skipped.push(SkippedRecord {
                    target_user_id: record.target_user_id,
                    reason,
                });
                continue;
            }
        };
        let updated_at = match parse_iso_seconds(&record.updated_at) {
            Ok(v) => v,
            Err(reason) => {
                outcome.skipped.push(SkippedRecord {
                    target_user_id: record.target_user_id,
                    reason,
                });
                continue;
            }
        };

        if accepted {
            outcome.contacts.push(Contact {
                id: info.user_id,
                eth_address: info.eth_address.clone(),
                username: info.username.clone(),
                profile_image: info.profile_image.clone(),
                created_at,
                updated_at,
                status: relationship_status::ACCEPTED.to_string(),
            });
        } else {
            // direction 缺失时按 received 处理
            let invite_type = match record.direction.as_deref() {
                Some(d) if d == relationship_direction::SENT => TYPE_SENT,
                _ => TYPE_RECEIVED,
            };
            outcome.invitations.push(Invitation {
                id: info.user_id,
                username: info.username.clone(),
                profile_image: info.profile_image.clone(),
                invite_type: invite_type.to_string(),
                created_at,
                updated_at,
            });
        }
    }

    // 被移除的联系人：上一份本地列表里有、新列表里没有的 id；
    // 没有对应会话的对端不进入清理负载
    let new_ids: HashSet<i64> = outcome.contacts.iter().map(|c| c.id).collect();
    for prev in prev_contacts {
        if new_ids.contains(&prev.id) {
            continue;
        }
        if let Some(chat) = chats.get(&prev.id) {
            outcome.cleared_chats.push(chat.clone());
        }
    }

    outcome
}

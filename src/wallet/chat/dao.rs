//! 会话数据访问层（DAO）
//!
//! 会话表由聊天服务维护，这里只提供连接同步需要的只读查询

use crate::wallet::chat::models::LocalChat;
use anyhow::{Context, Result};
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

/// 会话 DAO（基于 sqlx，只读）
pub struct ChatDao {
    db: Pool<Sqlite>,
    user_id: i64,
}

impl ChatDao {
    /// 创建新的会话 DAO
    pub fn new(db: Pool<Sqlite>, user_id: i64) -> Self {
        Self { db, user_id }
    }

    /// 从数据库获取所有会话
    pub async fn get_all_chats(&self) -> Result<Vec<LocalChat>> {
        let rows = sqlx::query(
            r#"
            SELECT counterpart_id, username, unread_count, latest_msg, latest_msg_time
            FROM local_chats
            WHERE owner_user_id = ?
            "#,
        )
        .bind(self.user_id)
        .fetch_all(&self.db)
        .await
        .context("查询会话列表失败")?;

        let chats: Vec<LocalChat> = rows
            .into_iter()
            .map(|m| LocalChat {
                counterpart_id: m.get("counterpart_id"),
                username: m.get("username"),
                unread_count: m.get::<i64, _>("unread_count") as i32,
                latest_msg: m.get("latest_msg"),
                latest_msg_time: m.get("latest_msg_time"),
            })
            .collect();

        debug!("[ChatDAO] 获取本地会话列表，共 {} 个会话", chats.len());
        Ok(chats)
    }

    /// 按对端用户 ID 查询会话
    pub async fn get_chat_by_counterpart(&self, counterpart_id: i64) -> Result<Option<LocalChat>> {
        let row = sqlx::query(
            r#"
            SELECT counterpart_id, username, unread_count, latest_msg, latest_msg_time
            FROM local_chats
            WHERE owner_user_id = ? AND counterpart_id = ?
            "#,
        )
        .bind(self.user_id)
        .bind(counterpart_id)
        .fetch_optional(&self.db)
        .await
        .context("查询会话失败")?;

        Ok(row.map(|m| LocalChat {
            counterpart_id: m.get("counterpart_id"),
            username: m.get("username"),
            unread_count: m.get::<i64, _>("unread_count") as i32,
            latest_msg: m.get("latest_msg"),
            latest_msg_time: m.get("latest_msg_time"),
        }))
    }
}

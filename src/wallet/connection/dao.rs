//! 连接数据访问层（DAO）
//!
//! 负责联系人和邀请的数据库操作，将数据访问逻辑与业务逻辑分离。
//! 两张表都是整体替换语义：每次成功同步后用服务器快照的换算结果覆盖本地数据

use crate::wallet::connection::models::{Contact, Invitation};
use anyhow::{Context, Result};
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

/// 连接 DAO（基于 sqlx）
pub struct ConnectionDao {
    db: Pool<Sqlite>,
    user_id: i64,
}

impl ConnectionDao {
    /// 创建新的连接 DAO
    pub fn new(db: Pool<Sqlite>, user_id: i64) -> Self {
        Self { db, user_id }
    }

    /// 从数据库获取所有联系人
    pub async fn get_all_contacts(&self) -> Result<Vec<Contact>> {
        let rows = sqlx::query(
            r#"
            SELECT
                contact_user_id,
                eth_address,
                username,
                profile_image,
                created_at,
                updated_at,
                status
            FROM local_contacts
            WHERE owner_user_id = ?
            "#,
        )
        .bind(self.user_id)
        .fetch_all(&self.db)
        .await
        .context("查询联系人列表失败")?;

        let contacts: Vec<Contact> = rows
            .into_iter()
            .map(|m| Contact {
                id: m.get("contact_user_id"),
                eth_address: m.get("eth_address"),
                username: m.get("username"),
                profile_image: m.get("profile_image"),
                created_at: m.get("created_at"),
                updated_at: m.get("updated_at"),
                status: m.get("status"),
            })
            .collect();

        debug!(
            "[ConnDAO] 获取本地联系人列表，共 {} 个联系人",
            contacts.len()
        );
        Ok(contacts)
    }

    /// 从数据库获取所有邀请
    pub async fn get_all_invitations(&self) -> Result<Vec<Invitation>> {
        let rows = sqlx::query(
            r#"
            SELECT
                invite_user_id,
                username,
                profile_image,
                invite_type,
                created_at,
                updated_at
            FROM local_invitations
            WHERE owner_user_id = ?
            "#,
        )
        .bind(self.user_id)
        .fetch_all(&self.db)
        .await
        .context("查询邀请列表失败")?;

        let invitations: Vec<Invitation> = rows
            .into_iter()
            .map(|m| Invitation {
                id: m.get("invite_user_id"),
                username: m.get("username"),
                profile_image: m.get("profile_image"),
                invite_type: m.get("invite_type"),
                created_at: m.get("created_at"),
                updated_at: m.get("updated_at"),
            })
            .collect();

        debug!("[ConnDAO] 获取本地邀请列表，共 {} 个邀请", invitations.len());
        Ok(invitations)
    }

    /// 用新列表整体替换本地联系人（同一事务内先删后插）
    pub async fn replace_contacts(&self, contacts: &[Contact]) -> Result<()> {
        let mut tx = self.db.begin().await.context("开启事务失败")?;

        sqlx::query("DELETE FROM local_contacts WHERE owner_user_id = ?")
            .bind(self.user_id)
            .execute(&mut *tx)
            .await
            .context("清空联系人列表失败")?;

        for c in contacts {
            sqlx::query(
                r#"
                INSERT INTO local_contacts (
                    owner_user_id,
                    contact_user_id,
                    eth_address,
                    username,
                    profile_image,
                    created_at,
                    updated_at,
                    status
                ) VALUES (?,?,?,?,?,?,?,?)
                "#,
            )
            .bind(self.user_id)
            .bind(c.id)
            .bind(&c.eth_address)
            .bind(&c.username)
            .bind(&c.profile_image)
            .bind(c.created_at)
            .bind(c.updated_at)
            .bind(&c.status)
            .execute(&mut *tx)
            .await
            .context("写入联系人失败")?;
        }

        tx.commit().await.context("提交联系人事务失败")?;
        debug!("[ConnDAO] 联系人列表已整体替换，共 {} 个", contacts.len());
        Ok(())
    }

    /// 用新列表整体替换本地邀请（同一事务内先删后插）
    pub async fn replace_invitations(&self, invitations: &[Invitation]) -> Result<()> {
        let mut tx = self.db.begin().await.context("开启事务失败")?;

        sqlx::query("DELETE FROM local_invitations WHERE owner_user_id = ?")
            .bind(self.user_id)
            .execute(&mut *tx)
            .await
            .context("清空邀请列表失败")?;

        for inv in invitations {
            sqlx::query(
                r#"
                INSERT INTO local_invitations (
                    owner_user_id,
                    invite_user_id,
                    username,
                    profile_image,
                    invite_type,
                    created_at,
                    updated_at
                ) VALUES (?,?,?,?,?,?,?)
                "#,
            )
            .bind(self.user_id)
            .bind(inv.id)
            .bind(&inv.username)
            .bind(&inv.profile_image)
            .bind(&inv.invite_type)
            .bind(inv.created_at)
            .bind(inv.updated_at)
            .execute(&mut *tx)
            .await
            .context("写入邀请失败")?;
        }

        tx.commit().await.context("提交邀请事务失败")?;
        debug!("[ConnDAO] 邀请列表已整体替换，共 {} 个", invitations.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::connection::models::TYPE_SENT;
    use crate::wallet::db::create_sqlite_pool_with_migration;

    async fn test_dao() -> Result<ConnectionDao> {
        let path = std::env::temp_dir().join(format!(
            "conn_dao_test_{}.db",
            uuid::Uuid::new_v4().simple()
        ));
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let pool = create_sqlite_pool_with_migration(&url).await?;
        Ok(ConnectionDao::new(pool, 1))
    }

    fn contact(id: i64, username: &str) -> Contact {
        Contact {
            id,
            eth_address: format!("0x{:03}", id),
            username: username.to_string(),
            profile_image: "".to_string(),
            created_at: 1555491474.547,
            updated_at: 1555491474.547,
            status: "accepted".to_string(),
        }
    }

    #[tokio::test]
    async fn replace_contacts_is_full_replace() -> Result<()> {
        let dao = test_dao().await?;

        dao.replace_contacts(&[contact(2, "a"), contact(3, "b")])
            .await?;
        assert_eq!(dao.get_all_contacts().await?.len(), 2);

        // 第二次替换后，不在新列表里的行必须消失
        dao.replace_contacts(&[contact(3, "b2")]).await?;
        let all = dao.get_all_contacts().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, 3);
        assert_eq!(all[0].username, "b2");
        assert_eq!(all[0].created_at, 1555491474.547);
        Ok(())
    }

    #[tokio::test]
    async fn invitations_round_trip() -> Result<()> {
        let dao = test_dao().await?;

        let inv = Invitation {
            id: 4,
            username: "user4".to_string(),
            profile_image: "profileImgUrl4".to_string(),
            invite_type: TYPE_SENT.to_string(),
            created_at: 1555491474.547,
            updated_at: 1555491474.547,
        };
        dao.replace_invitations(std::slice::from_ref(&inv)).await?;
        assert_eq!(dao.get_all_invitations().await?, vec![inv]);

        dao.replace_invitations(&[]).await?;
        assert!(dao.get_all_invitations().await?.is_empty());
        Ok(())
    }
}

//! 连接同步服务层
//!
//! 把服务器的连接关系快照调和成本地的联系人 / 邀请 / 待清理会话三份列表，
//! 落库后按固定顺序回调监听器

use crate::wallet::chat::dao::ChatDao;
use crate::wallet::chat::models::LocalChat;
use crate::wallet::connection::api::ConnectionApi;
use crate::wallet::connection::dao::ConnectionDao;
use crate::wallet::connection::listener::{ConnectionListener, EmptyConnectionListener};
use crate::wallet::connection::models::{Contact, ConnectionSyncerConfig, Invitation};
use crate::wallet::connection::reconcile::{reconcile_connections, ReconcileOutcome};
use crate::wallet::db::create_sqlite_pool_with_migration;
use anyhow::{Context, Result};
use sqlx::{Pool, Sqlite};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// 连接同步器
pub struct ConnectionSyncer {
    config: ConnectionSyncerConfig,
    /// 连接 API 客户端
    api: ConnectionApi,
    /// 连接 DAO
    connection_dao: ConnectionDao,
    /// 会话 DAO（只读）
    chat_dao: ChatDao,
    /// 连接监听器
    listener: Arc<dyn ConnectionListener>,
    /// 同步代数：每次发起同步递增一次，过期代数的结果直接丢弃
    generation: AtomicU64,
}

impl ConnectionSyncer {
    /// 创建新的连接同步器（使用默认空监听器）
    pub async fn new(config: ConnectionSyncerConfig) -> Result<Self> {
        Self::with_listener(config, Arc::new(EmptyConnectionListener)).await
    }

    /// 创建新的连接同步器（带自定义监听器，内部创建连接池）
    pub async fn with_listener(
        config: ConnectionSyncerConfig,
        listener: Arc<dyn ConnectionListener>,
    ) -> Result<Self> {
        let db_url = config.db_path.clone();
        info!(
            "[ConnSync] 创建连接同步器，用户ID: {}, SQLite数据库: {}",
            config.user_id, db_url
        );

        let db = create_sqlite_pool_with_migration(&db_url)
            .await
            .context(format!("连接SQLite数据库失败: {}", db_url))?;

        Self::with_listener_and_db(config, listener, Arc::new(db)).await
    }

    /// 创建新的连接同步器（使用共享连接池）
    pub async fn with_listener_and_db(
        config: ConnectionSyncerConfig,
        listener: Arc<dyn ConnectionListener>,
        db: Arc<Pool<Sqlite>>,
    ) -> Result<Self> {
        // 创建带认证拦截器的 HTTP 客户端（token 通过 default_headers 自动添加）
        let http_client = reqwest::ClientBuilder::new()
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::HeaderName::from_static("token"),
                    reqwest::header::HeaderValue::from_str(&config.token)
                        .context("无效的 token")?,
                );
                headers
            })
            .build()
            .context("创建 HTTP 客户端失败")?;

        let api = ConnectionApi::new(http_client, config.api_base_url.clone(), config.user_id);
        let connection_dao = ConnectionDao::new((*db).clone(), config.user_id);
        let chat_dao = ChatDao::new((*db).clone(), config.user_id);
        Ok(Self {
            api,
            connection_dao,
            chat_dao,
            listener,
            generation: AtomicU64::new(0),
            config,
        })
    }

    /// 从数据库获取所有联系人
    pub async fn get_all_contacts(&self) -> Result<Vec<Contact>> {
        self.connection_dao.get_all_contacts().await
    }

    /// 从数据库获取所有邀请
    pub async fn get_all_invitations(&self) -> Result<Vec<Invitation>> {
        self.connection_dao.get_all_invitations().await
    }

    /// 同步连接关系（一次完整的调和运行）
    ///
    /// 流程：取服务器快照 -> 读本地输入 -> 纯函数调和 -> 落库 -> 按序回调。
    /// 快照拉取失败时直接返回错误，不落库也不回调；
    /// 运行期间有更新的同步发起时，本次结果整体丢弃
    pub async fn sync_connections(&self) -> Result<()> {
        let run_generation = self.next_generation();
        info!(
            "[ConnSync] 🔄 开始同步连接关系，用户ID: {}, 代数: {}",
            self.config.user_id, run_generation
        );

        // 唯一一次网络读取；失败前不触碰任何本地状态
        let remote = self.api.get_connection_list().await?;

        let prev_contacts = self.connection_dao.get_all_contacts().await?;
        let chats = self.chat_dao.get_all_chats().await?;
        let chat_map: HashMap<i64, LocalChat> =
            chats.into_iter().map(|c| (c.counterpart_id, c)).collect();

        let outcome = reconcile_connections(&remote, &prev_contacts, &chat_map);
        for s in &outcome.skipped {
            warn!("[ConnSync] ⚠️ 跳过记录 {}: {}", s.target_user_id, s.reason);
        }

        if self.apply_outcome(run_generation, &outcome).await? {
            info!(
                "[ConnSync] ✅ 连接同步完成 - 联系人: {}, 邀请: {}, 待清理会话: {}, 跳过: {}",
                outcome.contacts.len(),
                outcome.invitations.len(),
                outcome.cleared_chats.len(),
                outcome.skipped.len()
            );
        }
        Ok(())
    }

    /// 取下一个同步代数
    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// 落库并按固定顺序回调（邀请 -> 联系人 -> 会话）
    ///
    /// 返回结果是否被应用；代数过期时丢弃：不落库、不回调
    async fn apply_outcome(&self, run_generation: u64, outcome: &ReconcileOutcome) -> Result<bool> {
        if self.generation.load(Ordering::SeqCst) != run_generation {
            warn!(
                "[ConnSync] ⚠️ 丢弃过期同步结果，代数: {}",
                run_generation
            );
            return Ok(false);
        }

        self.connection_dao
            .replace_invitations(&outcome.invitations)
            .await?;
        self.connection_dao
            .replace_contacts(&outcome.contacts)
            .await?;

        // 三次回调无条件依次发出，列表为空或未变化时同样回调
        if let Ok(json) = serde_json::to_string(&outcome.invitations) {
            self.listener.on_invitations_updated(json).await;
        }
        if let Ok(json) = serde_json::to_string(&outcome.contacts) {
            self.listener.on_contacts_updated(json).await;
        }
        if let Ok(json) = serde_json::to_string(&outcome.cleared_chats) {
            self.listener.on_chats_updated(json).await;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Mutex, Once};
    use tracing::info;

    static INIT_LOGGER: Once = Once::new();

    fn init_test_logger() {
        INIT_LOGGER.call_once(|| {
            use tracing_subscriber::prelude::*;
            use tracing_subscriber::EnvFilter;

            // 测试中默认打开当前 crate 和 sqlx 的 debug，关闭底层 HTTP 客户端的 debug 噪音
            let filter_layer = EnvFilter::new(
                "info,connections_sdk_core_rust=debug,sqlx=debug,hyper_util::client=info,reqwest=info",
            );

            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_test_writer();

            tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt_layer)
                .init();
        });
    }

    /// 记录回调顺序和负载的监听器
    struct RecordingListener {
        events: Mutex<Vec<(String, String)>>,
    }

    impl RecordingListener {
        fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
            }
        }

        fn events(&self) -> Vec<(String, String)> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ConnectionListener for RecordingListener {
        async fn on_invitations_updated(&self, invitations_json: String) {
            self.events
                .lock()
                .unwrap()
                .push(("invitations".to_string(), invitations_json));
        }

        async fn on_contacts_updated(&self, contacts_json: String) {
            self.events
                .lock()
                .unwrap()
                .push(("contacts".to_string(), contacts_json));
        }

        async fn on_chats_updated(&self, chats_json: String) {
            self.events
                .lock()
                .unwrap()
                .push(("chats".to_string(), chats_json));
        }
    }

    fn temp_db_url() -> String {
        let path = std::env::temp_dir().join(format!(
            "conn_sync_test_{}.db",
            uuid::Uuid::new_v4().simple()
        ));
        format!("sqlite://{}?mode=rwc", path.display())
    }

    fn test_config(api_base_url: &str) -> ConnectionSyncerConfig {
        ConnectionSyncerConfig {
            user_id: 1,
            api_base_url: api_base_url.to_string(),
            token: "test-token".to_string(),
            db_path: temp_db_url(),
        }
    }

    #[tokio::test]
    async fn transport_failure_dispatches_nothing() -> Result<()> {
        init_test_logger();

        // 端口 9 没有服务在听，拉取快照必然失败
        let listener = Arc::new(RecordingListener::new());
        let syncer =
            ConnectionSyncer::with_listener(test_config("http://127.0.0.1:9"), listener.clone())
                .await?;

        let result = syncer.sync_connections().await;
        assert!(result.is_err());

        // 三个回调一个都不能发出，本地状态也不能被改动
        assert!(listener.events().is_empty());
        assert!(syncer.get_all_contacts().await?.is_empty());
        assert!(syncer.get_all_invitations().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn stale_generation_is_discarded() -> Result<()> {
        init_test_logger();

        let listener = Arc::new(RecordingListener::new());
        let syncer =
            ConnectionSyncer::with_listener(test_config("http://127.0.0.1:9"), listener.clone())
                .await?;

        let outcome = ReconcileOutcome {
            contacts: vec![Contact {
                id: 3,
                eth_address: "0x003".to_string(),
                username: "user3".to_string(),
                profile_image: "profileImgUrl3".to_string(),
                created_at: 1555491474.547,
                updated_at: 1555491474.547,
                status: "accepted".to_string(),
            }],
            ..Default::default()
        };

        // 第一次运行尚未应用结果时，第二次运行已经开始
        let stale = syncer.next_generation();
        let current = syncer.next_generation();

        assert!(!syncer.apply_outcome(stale, &outcome).await?);
        assert!(listener.events().is_empty());
        assert!(syncer.get_all_contacts().await?.is_empty());

        assert!(syncer.apply_outcome(current, &outcome).await?);
        let contacts = syncer.get_all_contacts().await?;
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].id, 3);
        Ok(())
    }

    #[tokio::test]
    async fn dispatch_order_is_fixed_and_unconditional() -> Result<()> {
        init_test_logger();

        let listener = Arc::new(RecordingListener::new());
        let syncer =
            ConnectionSyncer::with_listener(test_config("http://127.0.0.1:9"), listener.clone())
                .await?;

        // 空结果同样要发出全部三个回调
        let generation = syncer.next_generation();
        assert!(
            syncer
                .apply_outcome(generation, &ReconcileOutcome::default())
                .await?
        );

        let events = listener.events();
        let names: Vec<&str> = events.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["invitations", "contacts", "chats"]);
        for (_, payload) in &events {
            assert_eq!(payload, "[]");
        }
        Ok(())
    }

    #[tokio::test]
    #[ignore]
    async fn test_connection_sync_against_local_backend() -> Result<()> {
        // 需要本地起一个后端服务才能跑
        init_test_logger();

        let config = ConnectionSyncerConfig {
            user_id: 1,
            api_base_url: "http://localhost:10002".to_string(),
            token: "dev-token".to_string(),
            db_path: "sqlite://test_connections.db?mode=rwc".to_string(),
        };

        struct TestConnectionListener;

        #[async_trait]
        impl ConnectionListener for TestConnectionListener {
            async fn on_invitations_updated(&self, invitations_json: String) {
                info!("邀请列表更新: {}", invitations_json);
            }
            async fn on_contacts_updated(&self, contacts_json: String) {
                info!("联系人列表更新: {}", contacts_json);
            }
            async fn on_chats_updated(&self, chats_json: String) {
                info!("待清理会话: {}", chats_json);
            }
        }

        let syncer =
            ConnectionSyncer::with_listener(config, Arc::new(TestConnectionListener)).await?;
        syncer.sync_connections().await?;
        Ok(())
    }
}

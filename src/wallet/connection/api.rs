//! 连接 HTTP API 客户端
//!
//! 负责连接关系相关的 HTTP 请求

use crate::wallet::connection::types::{ConnectionListResp, RemoteRelationship};
use crate::wallet::types::handle_http_response;
use anyhow::{Context, Result};
use tracing::{debug, info};
use uuid::Uuid;

/// 连接相关的 HTTP API 客户端
pub struct ConnectionApi {
    client: reqwest::Client,
    api_base_url: String,
    user_id: i64,
}

impl ConnectionApi {
    /// 创建新的连接 API 客户端
    ///
    /// `client` 应该已经在外部配置好认证拦截器
    pub fn new(client: reqwest::Client, api_base_url: String, user_id: i64) -> Self {
        Self {
            client,
            api_base_url,
            user_id,
        }
    }

    /// 从服务器获取当前用户的全量连接关系快照
    ///
    /// 传输失败、HTTP 状态错误、errCode 非 0 或响应体不合法都按错误返回，
    /// 调用方在拿到快照之前不会改动任何本地状态
    pub async fn get_connection_list(&self) -> Result<Vec<RemoteRelationship>> {
        let operation_id = Uuid::new_v4().to_string();
        let url = format!("{}/connection/get_connection_list", self.api_base_url);

        info!("[ConnAPI] 📡 请求连接关系列表");
        debug!("[ConnAPI]   请求URL: {}", url);
        debug!(
            "[ConnAPI]   用户ID: {}, 操作ID: {}",
            self.user_id, operation_id
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("operationID", &operation_id)
            .json(&serde_json::json!({
                "userID": self.user_id,
                "pagination": {
                    "pageNumber": 1,
                    "showNumber": 1000
                }
            }))
            .send()
            .await
            .context("请求失败")?;

        let api_resp = handle_http_response::<ConnectionListResp>(response, "连接关系列表").await?;

        let data = api_resp
            .data
            .ok_or_else(|| anyhow::anyhow!("响应中缺少 data 字段"))?;

        info!(
            "[ConnAPI] ✅ 连接关系列表响应，条目数: {}",
            data.connections.len()
        );

        Ok(data.connections)
    }
}

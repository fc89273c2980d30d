//! 连接同步 CLI 客户端（测试版）
//!
//! 非交互式 CLI，用于测试和展示连接同步功能
//! 启动时通过命令行参数指定用户和后端地址，执行一次同步并打印结果

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use connections_sdk_core_rust::wallet::connection::listener::ConnectionListener;
use connections_sdk_core_rust::wallet::connection::models::ConnectionSyncerConfig;
use connections_sdk_core_rust::wallet::connection::service::ConnectionSyncer;
use std::sync::Arc;
use tracing::info;

/// 连接同步 CLI 客户端
#[derive(Parser, Debug)]
#[command(name = "connections-cli")]
#[command(about = "连接同步 CLI 客户端 - 用于测试和展示连接同步功能", long_about = None)]
struct Args {
    /// 当前用户 ID
    #[arg(short, long)]
    user_id: i64,

    /// API 基础 URL（默认: http://localhost:10002）
    #[arg(short, long, default_value = "http://localhost:10002")]
    api_url: String,

    /// 认证 Token
    #[arg(short, long)]
    token: String,

    /// SQLite 数据库路径（默认: sqlite://connections.db?mode=rwc）
    #[arg(short, long, default_value = "sqlite://connections.db?mode=rwc")]
    db_path: String,

    /// 日志级别（默认: info,connections_sdk_core_rust=debug）
    #[arg(long, default_value = "info,connections_sdk_core_rust=debug")]
    log_level: String,
}

/// 初始化日志（同时输出到 stdout 和文件）
fn init_logger(log_level: &str) {
    use std::fs::OpenOptions;
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // 优先使用环境变量 RUST_LOG（如果设置了），否则使用命令行参数
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // 创建日志文件（追加模式）
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("无法创建日志文件 debug.log");

    // 输出到 stdout（控制台），保留 ANSI 颜色代码用于终端显示
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(true);

    // 输出到文件，禁用 ANSI 颜色代码（文件不需要颜色）
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("[CLI] 📝 日志已同时输出到控制台和文件: debug.log");
}

/// 打印所有回调负载的监听器
struct CliConnectionListener;

#[async_trait]
impl ConnectionListener for CliConnectionListener {
    async fn on_invitations_updated(&self, invitations_json: String) {
        info!("[CLI/Connection] 📝 邀请列表更新: {}", invitations_json);
    }

    async fn on_contacts_updated(&self, contacts_json: String) {
        info!("[CLI/Connection] 👥 联系人列表更新: {}", contacts_json);
    }

    async fn on_chats_updated(&self, chats_json: String) {
        info!("[CLI/Connection] 🗑️ 待清理会话: {}", chats_json);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    init_logger(&args.log_level);

    info!("[CLI] 🚀 连接同步 CLI 客户端（测试模式）");
    info!("[CLI] 👤 用户ID: {}", args.user_id);
    info!("[CLI] 🌐 API: {}", args.api_url);

    let config = ConnectionSyncerConfig {
        user_id: args.user_id,
        api_base_url: args.api_url,
        token: args.token,
        db_path: args.db_path,
    };

    let syncer = ConnectionSyncer::with_listener(config, Arc::new(CliConnectionListener))
        .await
        .map_err(|e| anyhow::anyhow!("创建连接同步器失败: {}", e))?;

    info!("[CLI] 🔄 正在同步连接关系...");
    syncer
        .sync_connections()
        .await
        .map_err(|e| anyhow::anyhow!("同步失败: {}", e))?;
    info!("[CLI] ✅ 同步完成！");

    // 显示同步后的本地状态
    let contacts = syncer.get_all_contacts().await?;
    info!("[CLI] 👥 联系人列表（共 {} 个）:", contacts.len());
    for c in contacts.iter().take(10) {
        info!("[CLI]   - {} | {} | {}", c.id, c.username, c.eth_address);
    }

    let invitations = syncer.get_all_invitations().await?;
    info!("[CLI] 📝 邀请列表（共 {} 个）:", invitations.len());
    for inv in invitations.iter().take(10) {
        info!("[CLI]   - {} | {} | {}", inv.id, inv.username, inv.invite_type);
    }

    Ok(())
}

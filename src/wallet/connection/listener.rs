//! 连接监听器回调接口

use async_trait::async_trait;

/// 连接监听器回调接口（对应宿主应用的 store 分发边界）
///
/// 一次成功同步固定按 邀请 -> 联系人 -> 会话 的顺序依次回调，
/// 列表为空或未变化时同样回调
#[async_trait]
pub trait ConnectionListener: Send + Sync {
    /// 邀请列表已更新（整体替换结果），参数为 JSON 数组字符串
    async fn on_invitations_updated(&self, invitations_json: String);

    /// 联系人列表已更新（整体替换结果），参数为 JSON 数组字符串
    async fn on_contacts_updated(&self, contacts_json: String);

    /// 待清理会话列表（被移除联系人对应的会话），参数为 JSON 数组字符串
    async fn on_chats_updated(&self, chats_json: String);
}

/// 默认空实现（无操作）
pub struct EmptyConnectionListener;

#[async_trait]
impl ConnectionListener for EmptyConnectionListener {
    async fn on_invitations_updated(&self, _invitations_json: String) {
        // 默认不做任何处理
    }

    async fn on_contacts_updated(&self, _contacts_json: String) {
        // 默认不做任何处理
    }

    async fn on_chats_updated(&self, _chats_json: String) {
        // 默认不做任何处理
    }
}

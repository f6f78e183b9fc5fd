// ==========================================
// 物流配送调度看板 - 运营消息领域模型
// ==========================================
// 对应表: messages (仓库/司机/代理间的运营留言)
// ==========================================

use crate::domain::types::ItemKind;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 客户替换消息的固定主题
pub const SUBJECT_WRONG_CUSTOMER: &str = "order filed under wrong customer";

// ==========================================
// OperationalMessage - 运营消息
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalMessage {
    pub message_id: String,              // 消息ID (UUID)
    pub sender_role: String,             // 发送方角色 (warehouse/driver/agent/office)
    pub subject: String,                 // 主题
    pub body: String,                    // 正文 (自由文本, 替换消息采用 key: value 行)
    pub related_kind: Option<ItemKind>,  // 关联单据类型
    pub related_id: Option<i64>,         // 关联单据号
    pub created_at: NaiveDateTime,       // 创建时间
}

impl OperationalMessage {
    /// 构造新消息（自动生成 UUID 和时间戳）
    pub fn new(sender_role: &str, subject: &str, body: &str) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            sender_role: sender_role.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            related_kind: None,
            related_id: None,
            created_at: chrono::Local::now().naive_local(),
        }
    }

    /// 判断是否为客户替换消息
    pub fn is_wrong_customer_notice(&self) -> bool {
        self.subject.trim().eq_ignore_ascii_case(SUBJECT_WRONG_CUSTOMER)
    }
}

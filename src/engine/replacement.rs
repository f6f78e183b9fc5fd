// ==========================================
// 物流配送调度看板 - 客户替换提取引擎
// ==========================================
// 职责: 从运营消息推导客户替换映射
// 输入: 主题为"订单挂错客户"的消息 + 客户档案快照
// 正文格式 (key: value 行, 大小写不敏感):
//   order: 12          (或 return: 7)
//   customer: Levi
//   city: Akko         (可省略)
// 红线: 不可解析的消息跳过并记 debug 日志, 绝不使整批失败
// ==========================================

use crate::domain::customer::{Customer, CustomerReplacement, ReplacementKey};
use crate::domain::message::OperationalMessage;
use crate::domain::types::ItemKind;
use crate::engine::identity::ReplacementMap;
use tracing::debug;

// ==========================================
// ReplacementExtractor - 替换提取引擎
// ==========================================
pub struct ReplacementExtractor {
    // 无状态引擎,不需要注入依赖
}

impl Default for ReplacementExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplacementExtractor {
    pub fn new() -> Self {
        Self {}
    }

    /// 从消息快照构建替换映射
    ///
    /// 同一单据存在多条替换消息时, 以 created_at 最新的一条为准。
    ///
    /// # 参数
    /// - messages: 当前消息快照 (不要求预先按主题过滤)
    /// - customers: 客户档案快照, 用于判定 exists_in_system 并补全资料
    pub fn build_map(
        &self,
        messages: &[OperationalMessage],
        customers: &[Customer],
    ) -> ReplacementMap {
        let mut map = ReplacementMap::new();
        let mut latest: std::collections::HashMap<ReplacementKey, chrono::NaiveDateTime> =
            std::collections::HashMap::new();

        for msg in messages {
            if !msg.is_wrong_customer_notice() {
                continue;
            }
            let parsed = match self.parse_notice(msg) {
                Some(p) => p,
                None => {
                    debug!(message_id = %msg.message_id, "skipping unparseable wrong-customer notice");
                    continue;
                }
            };

            // 仅保留最新一条
            if let Some(prev) = latest.get(&parsed.key) {
                if *prev >= msg.created_at {
                    continue;
                }
            }
            latest.insert(parsed.key, msg.created_at);

            let resolved = customers
                .iter()
                .find(|c| c.customer_name == parsed.customer_name)
                .cloned();

            map.insert(
                parsed.key,
                CustomerReplacement {
                    key: parsed.key,
                    exists_in_system: resolved.is_some(),
                    correct_customer_name: parsed.customer_name,
                    correct_city: parsed.city,
                    resolved,
                },
            );
        }

        map
    }

    /// 解析单条替换消息正文
    fn parse_notice(&self, msg: &OperationalMessage) -> Option<ParsedNotice> {
        let mut key: Option<ReplacementKey> = None;
        let mut customer_name: Option<String> = None;
        let mut city: Option<String> = None;

        for line in msg.body.lines() {
            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            let field = field.trim().to_ascii_lowercase();
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match field.as_str() {
                "order" => {
                    if let Ok(id) = value.parse::<i64>() {
                        key = Some(ReplacementKey::new(ItemKind::Order, id));
                    }
                }
                "return" => {
                    if let Ok(id) = value.parse::<i64>() {
                        key = Some(ReplacementKey::new(ItemKind::Return, id));
                    }
                }
                "customer" => customer_name = Some(value.to_string()),
                "city" => city = Some(value.to_string()),
                _ => {}
            }
        }

        // 正文未指明单据时回退到消息的关联单据字段
        if key.is_none() {
            if let (Some(kind), Some(id)) = (msg.related_kind, msg.related_id) {
                key = Some(ReplacementKey::new(kind, id));
            }
        }

        Some(ParsedNotice {
            key: key?,
            customer_name: customer_name?,
            city,
        })
    }
}

struct ParsedNotice {
    key: ReplacementKey,
    customer_name: String,
    city: Option<String>,
}

// ==========================================
// 物流配送调度看板 - 渲染身份解析引擎
// ==========================================
// 职责: 结合客户替换映射, 决定单据在看板上展示的客户身份
// 红线: 替换客户不在档案时, 原单据的地址/电话绝不允许透出 ——
//       地址置空、联系字段缺省, 渲染层按"未知"展示
// ==========================================

use crate::domain::customer::{CustomerReplacement, DisplayIdentity, ReplacementKey};
use crate::domain::item::DispatchItem;
use std::collections::HashMap;

/// 替换映射: 单据键 -> 替换投影
pub type ReplacementMap = HashMap<ReplacementKey, CustomerReplacement>;

// ==========================================
// IdentityResolver - 身份解析引擎
// ==========================================
pub struct IdentityResolver {
    // 无状态引擎,不需要注入依赖
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 解析单据的展示身份
    ///
    /// 三种情形:
    /// 1. 无替换记录: 原样返回单据自身字段 (恒等)
    /// 2. 替换且命中档案: 返回替换客户**当前**档案资料
    ///    (而非单据行上的陈旧数据)
    /// 3. 替换但未命中档案: 仅名称+城市可用, 地址为空串,
    ///    编号/电话缺省
    pub fn resolve_display_identity(
        &self,
        item: &DispatchItem,
        replacements: &ReplacementMap,
    ) -> DisplayIdentity {
        let key = ReplacementKey::new(item.kind, item.id);
        let replacement = match replacements.get(&key) {
            Some(r) => r,
            None => {
                return DisplayIdentity::from_item_fields(
                    &item.customer_name,
                    &item.address,
                    &item.city,
                    item.customer_number.as_deref(),
                );
            }
        };

        if replacement.exists_in_system {
            if let Some(customer) = &replacement.resolved {
                return DisplayIdentity {
                    customer_name: customer.customer_name.clone(),
                    address: customer.address.clone(),
                    city: customer.city.clone(),
                    customer_number: Some(customer.customer_number.clone()),
                    phone: customer.phone.clone(),
                };
            }
            // exists_in_system 置位但快照缺失: 数据不一致, 按未命中降级
            tracing::warn!(key = %key, "replacement marked resolved but carries no customer snapshot");
        }

        DisplayIdentity {
            customer_name: replacement.correct_customer_name.clone(),
            address: String::new(),
            city: replacement
                .correct_city
                .clone()
                .unwrap_or_else(|| item.city.clone()),
            customer_number: None,
            phone: None,
        }
    }
}

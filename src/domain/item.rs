// ==========================================
// 物流配送调度看板 - 订单/退货领域模型
// ==========================================
// 对应表: mainorder / mainreturns
// ==========================================

use crate::domain::types::{ItemKind, ScheduleOverlay};
use serde::{Deserialize, Serialize};

// ==========================================
// DispatchItem - 调度单据 (订单或退货)
// ==========================================
// 红线: 描述性字段由外部录入流程维护,本系统只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchItem {
    pub kind: ItemKind,                    // 单据类型 (订单/退货)
    pub id: i64,                           // 订单号/退货号 (各自独立编号)
    pub customer_name: String,             // 客户名称
    pub city: String,                      // 城市
    pub address: String,                   // 地址
    pub customer_number: Option<String>,   // 客户编号
    pub agent_number: Option<String>,      // 代理编号
    pub primary_schedule_id: Option<i64>,  // 原始归属调度 (null = 未分配)
    pub reassigned_ref: ScheduleOverlay,   // 调线覆盖 (入库时已归一化)
    pub reassigned_raw: Option<String>,    // 覆盖字段原始 JSON (None = 字段缺失)
}

impl DispatchItem {
    /// 构造未分配的新单据
    pub fn new(kind: ItemKind, id: i64, customer_name: &str, city: &str, address: &str) -> Self {
        Self {
            kind,
            id,
            customer_name: customer_name.to_string(),
            city: city.to_string(),
            address: address.to_string(),
            customer_number: None,
            agent_number: None,
            primary_schedule_id: None,
            reassigned_ref: ScheduleOverlay::Unset,
            reassigned_raw: None,
        }
    }

    /// 判断是否属于未分配池 (无原始归属且无覆盖)
    pub fn is_unassigned(&self) -> bool {
        self.primary_schedule_id.is_none() && self.reassigned_ref.ids().is_empty()
    }

    /// 替换消息映射键, 形如 "order-12" / "return-7"
    pub fn replacement_key(&self) -> String {
        format!("{}-{}", self.kind, self.id)
    }
}

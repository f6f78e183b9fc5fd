// ==========================================
// 物流配送调度看板 - 客户领域模型
// ==========================================
// 对应表: customerlist
// 含: 客户替换 (误挂客户更正) 投影
// ==========================================

use crate::domain::types::ItemKind;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Customer - 客户档案
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub customer_number: String,       // 客户编号
    pub customer_name: String,         // 客户名称
    pub city: String,                  // 城市
    pub address: String,               // 地址
    pub phone: Option<String>,         // 联系电话
    pub agent_number: Option<String>,  // 负责代理
}

// ==========================================
// ReplacementKey - 替换映射键 (单据类型 + 单据号)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplacementKey {
    pub kind: ItemKind,
    pub id: i64,
}

impl ReplacementKey {
    pub fn new(kind: ItemKind, id: i64) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for ReplacementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.id)
    }
}

// ==========================================
// CustomerReplacement - 客户替换投影
// ==========================================
// 来源: 主题为"订单挂错客户"的运营消息,每次查询时从消息重新推导
// 红线: resolved 仅在 exists_in_system 时存在;
//       不存在时除名称+城市外其余字段为"真未知",不得以原单据字段兜底
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerReplacement {
    pub key: ReplacementKey,                // 作用单据
    pub correct_customer_name: String,      // 更正后客户名称
    pub correct_city: Option<String>,       // 更正后城市
    pub exists_in_system: bool,             // 是否命中客户档案
    pub resolved: Option<Customer>,         // 命中档案时的完整资料快照
}

// ==========================================
// DisplayIdentity - 渲染用身份字段
// ==========================================
// None 表示"未知",渲染层必须按未知展示,不得回退到原单据字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayIdentity {
    pub customer_name: String,
    pub address: String,
    pub city: String,
    pub customer_number: Option<String>,
    pub phone: Option<String>,
}

impl DisplayIdentity {
    /// 从单据自身字段构造 (无替换时的恒等映射)
    pub fn from_item_fields(
        customer_name: &str,
        address: &str,
        city: &str,
        customer_number: Option<&str>,
    ) -> Self {
        Self {
            customer_name: customer_name.to_string(),
            address: address.to_string(),
            city: city.to_string(),
            customer_number: customer_number.map(|s| s.to_string()),
            phone: None,
        }
    }
}

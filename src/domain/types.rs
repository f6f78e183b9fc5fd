// ==========================================
// 物流配送调度看板 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 单据类型 (Item Kind)
// ==========================================
// 订单与退货在归属解析上结构完全一致,仅编号空间独立
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Order,  // 订单 (mainorder)
    Return, // 退货 (mainreturns)
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Order => write!(f, "order"),
            ItemKind::Return => write!(f, "return"),
        }
    }
}

// ==========================================
// 调线覆盖 (Schedule Overlay)
// ==========================================
// 历史数据迁移导致覆盖字段形态不一: 裸整数 / {scheduleId} 对象 / 混合数组。
// 入库读取时一次性归一化为本枚举,下游不再对原始形态分支。
// 红线: Many 允许为空 —— 字段存在但全部元素畸形时仍视为"被动过"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleOverlay {
    Unset,          // 字段缺失/null
    Single(i64),    // 单个覆盖调度
    Many(Vec<i64>), // 多个覆盖调度 (可为空)
}

impl ScheduleOverlay {
    /// 判断覆盖字段是否存在（不论解析出多少调度号）
    pub fn is_set(&self) -> bool {
        !matches!(self, ScheduleOverlay::Unset)
    }

    /// 展平为调度号切片视图
    pub fn ids(&self) -> Vec<i64> {
        match self {
            ScheduleOverlay::Unset => Vec::new(),
            ScheduleOverlay::Single(id) => vec![*id],
            ScheduleOverlay::Many(ids) => ids.clone(),
        }
    }
}

impl Default for ScheduleOverlay {
    fn default() -> Self {
        ScheduleOverlay::Unset
    }
}

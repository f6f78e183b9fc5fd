// ==========================================
// 物流配送调度看板 - 配送调度领域模型
// ==========================================
// 对应表: distribution_schedule / distribution_groups / cities
// ==========================================

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

// ==========================================
// DistributionSchedule - 配送调度 (司机 + 区域 + 日期)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionSchedule {
    pub schedule_id: i64,           // 调度号
    pub driver_name: String,        // 司机
    pub group_id: Option<i64>,      // 配送区域
    pub schedule_date: NaiveDate,   // 配送日期
}

impl DistributionSchedule {
    /// 配送日所在星期 (代理拜访日安排按星期维护)
    pub fn weekday(&self) -> Weekday {
        use chrono::Datelike;
        self.schedule_date.weekday()
    }
}

// ==========================================
// DistributionGroup - 配送区域
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionGroup {
    pub group_id: i64,       // 区域ID
    pub group_name: String,  // 区域名称
}

// ==========================================
// City - 城市 (区域归属)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub city_name: String,      // 城市名 (主键)
    pub group_id: Option<i64>,  // 所属配送区域 (可未划区)
}

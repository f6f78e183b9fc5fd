// ==========================================
// 物流配送调度看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod customer;
pub mod item;
pub mod message;
pub mod schedule;
pub mod types;

// 重导出核心类型
pub use customer::{Customer, CustomerReplacement, DisplayIdentity, ReplacementKey};
pub use item::DispatchItem;
pub use message::OperationalMessage;
pub use schedule::{City, DistributionGroup, DistributionSchedule};
pub use types::{ItemKind, ScheduleOverlay};

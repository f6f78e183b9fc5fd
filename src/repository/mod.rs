// ==========================================
// 物流配送调度看板 - 数据仓储层
// ==========================================
// 职责: 访问托管库镜像表 (mainorder / mainreturns /
//       distribution_schedule / distribution_groups /
//       cities / messages / customerlist)
// 红线: 仓储只做 CRUD 与行解码, 归属/身份规则一律在引擎层
// ==========================================

pub mod customer_repo;
pub mod error;
pub mod item_repo;
pub mod message_repo;
pub mod schedule_repo;

// 重导出核心类型
pub use customer_repo::CustomerRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use item_repo::ItemRepository;
pub use message_repo::MessageRepository;
pub use schedule_repo::ScheduleRepository;

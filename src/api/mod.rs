// ==========================================
// 物流配送调度看板 - API 层
// ==========================================
// 职责: 组装看板视图, 供前端渲染层调用
// ==========================================

pub mod board_api;
pub mod error;

// 重导出核心类型
pub use board_api::{BoardApi, BoardEntry, CustomerRow, ScheduleBoardView};
pub use error::{ApiError, ApiResult};

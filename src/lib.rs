// ==========================================
// 物流配送调度看板 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 调度状态管理核心 (UI 渲染层独立承载)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 归属/身份解析规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 看板视图组装
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ItemKind, ScheduleOverlay};

// 领域实体
pub use domain::{
    City, Customer, CustomerReplacement, DispatchItem, DisplayIdentity, DistributionGroup,
    DistributionSchedule, OperationalMessage, ReplacementKey,
};

// 引擎
pub use engine::{
    CityAreaCache, IdentityResolver, MembershipResolver, OverlayParse, ReplacementExtractor,
};

// API
pub use api::BoardApi;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "物流配送调度看板";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

// ==========================================
// 物流配送调度看板 - 引擎层
// ==========================================
// 职责: 实现归属/身份解析规则,不拼 SQL
// 红线: 引擎全部为同步纯函数,畸形数据降级跳过,绝不向上抛错
// ==========================================

pub mod area_cache;
pub mod identity;
pub mod membership;
pub mod overlay;
pub mod replacement;

// 重导出核心引擎
pub use area_cache::CityAreaCache;
pub use identity::{IdentityResolver, ReplacementMap};
pub use membership::MembershipResolver;
pub use overlay::{parse_overlay, OverlayParse};
pub use replacement::ReplacementExtractor;

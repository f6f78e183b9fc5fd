// ==========================================
// 物流配送调度看板 - 看板 API
// ==========================================
// 职责: 把仓储快照与引擎结果组装成前端可直接渲染的视图
// 架构: API 层 → Engine 层 (纯函数) + Repository 层 (快照)
// 红线: 视图按"归属集包含"取数; 客户行划线依据
//       all_items_transferred_for_customer
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::customer::DisplayIdentity;
use crate::domain::item::DispatchItem;
use crate::domain::message::SUBJECT_WRONG_CUSTOMER;
use crate::domain::schedule::DistributionSchedule;
use crate::domain::types::ItemKind;
use crate::engine::identity::{IdentityResolver, ReplacementMap};
use crate::engine::membership::MembershipResolver;
use crate::engine::replacement::ReplacementExtractor;
use crate::repository::customer_repo::CustomerRepository;
use crate::repository::item_repo::ItemRepository;
use crate::repository::message_repo::MessageRepository;
use crate::repository::schedule_repo::ScheduleRepository;

// ==========================================
// 视图结构
// ==========================================

/// 看板上的单条单据
#[derive(Debug, Clone)]
pub struct BoardEntry {
    pub item: DispatchItem,
    pub identity: DisplayIdentity,   // 解析后的展示身份
    pub transferred: bool,           // 是否为调入当前调度
    pub modified: bool,              // 是否被动过
}

/// 看板上的客户行 (同客户的订单与退货聚合)
#[derive(Debug, Clone)]
pub struct CustomerRow {
    pub customer_name: String,
    pub city: String,
    pub entries: Vec<BoardEntry>,
    pub fully_transferred: bool,     // 客户全部单据均为调入 → 整行划线
}

/// 单个调度的完整看板视图
#[derive(Debug, Clone)]
pub struct ScheduleBoardView {
    pub schedule: DistributionSchedule,
    pub rows: Vec<CustomerRow>,
}

// ==========================================
// BoardApi - 看板 API
// ==========================================
pub struct BoardApi {
    item_repo: Arc<ItemRepository>,
    schedule_repo: Arc<ScheduleRepository>,
    customer_repo: Arc<CustomerRepository>,
    message_repo: Arc<MessageRepository>,
    membership: MembershipResolver,
    identity: IdentityResolver,
    extractor: ReplacementExtractor,
}

impl BoardApi {
    /// 创建新的 BoardApi 实例
    pub fn new(
        item_repo: Arc<ItemRepository>,
        schedule_repo: Arc<ScheduleRepository>,
        customer_repo: Arc<CustomerRepository>,
        message_repo: Arc<MessageRepository>,
    ) -> Self {
        Self {
            item_repo,
            schedule_repo,
            customer_repo,
            message_repo,
            membership: MembershipResolver::new(),
            identity: IdentityResolver::new(),
            extractor: ReplacementExtractor::new(),
        }
    }

    /// 重建客户替换映射 (每次取视图时从当前快照推导)
    pub fn refresh_replacements(&self) -> ApiResult<ReplacementMap> {
        let messages = self.message_repo.list_by_subject(SUBJECT_WRONG_CUSTOMER)?;
        let customers = self.customer_repo.list()?;
        Ok(self.extractor.build_map(&messages, &customers))
    }

    /// 组装单个调度的看板视图
    ///
    /// 取数口径: 订单与退货的有效归属集包含该调度即入选,
    /// 与 primary_schedule_id 是否相等无关。
    pub fn schedule_board(&self, schedule_id: i64) -> ApiResult<ScheduleBoardView> {
        let schedule = self
            .schedule_repo
            .find_schedule(schedule_id)?
            .ok_or_else(|| ApiError::NotFound(format!("distribution_schedule {}", schedule_id)))?;

        let orders = self.item_repo.list(ItemKind::Order)?;
        let returns = self.item_repo.list(ItemKind::Return)?;
        let replacements = self.refresh_replacements()?;

        // 按 (客户, 城市) 聚合归属当前调度的单据
        let mut grouped: BTreeMap<(String, String), Vec<BoardEntry>> = BTreeMap::new();
        for item in orders.iter().chain(returns.iter()) {
            if !self.membership.belongs_to_schedule(item, schedule_id) {
                continue;
            }
            let entry = BoardEntry {
                identity: self.identity.resolve_display_identity(item, &replacements),
                transferred: self.membership.is_transferred_into(item, schedule_id),
                modified: self.membership.is_modified(item),
                item: item.clone(),
            };
            grouped
                .entry((item.customer_name.clone(), item.city.clone()))
                .or_default()
                .push(entry);
        }

        let rows = grouped
            .into_iter()
            .map(|((customer_name, city), entries)| {
                let fully_transferred = self.membership.all_items_transferred_for_customer(
                    &customer_name,
                    &city,
                    &orders,
                    &returns,
                    schedule_id,
                );
                CustomerRow {
                    customer_name,
                    city,
                    entries,
                    fully_transferred,
                }
            })
            .collect();

        Ok(ScheduleBoardView { schedule, rows })
    }

    /// 查询城市所属配送区域 (经由调用方注入的备忘缓存)
    ///
    /// 缓存仅为会话内优化; 城市划区变更后由调用方 invalidate
    pub fn city_group(
        &self,
        cache: &mut crate::engine::area_cache::CityAreaCache,
        city: &str,
    ) -> ApiResult<Option<i64>> {
        let repo = Arc::clone(&self.schedule_repo);
        cache
            .get_or_compute(city, |name| repo.find_city_group(name))
            .map_err(ApiError::from)
    }

    /// 未分配池 (无原始归属且无覆盖的订单与退货)
    pub fn unassigned_pool(&self) -> ApiResult<Vec<BoardEntry>> {
        let replacements = self.refresh_replacements()?;
        let mut entries = Vec::new();
        for kind in [ItemKind::Order, ItemKind::Return] {
            for item in self.item_repo.list_unassigned(kind)? {
                entries.push(BoardEntry {
                    identity: self.identity.resolve_display_identity(&item, &replacements),
                    transferred: false,
                    modified: self.membership.is_modified(&item),
                    item,
                });
            }
        }
        Ok(entries)
    }
}

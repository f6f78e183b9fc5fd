// ==========================================
// 物流配送调度看板 - 调度归属解析引擎
// ==========================================
// 职责: 判定单据出现在哪些调度之下
// 有效归属集 = {原始归属} ∪ 覆盖调度集 (去重)
// 红线: 看板按"归属集包含"过滤, 绝不按 primary 相等过滤 ——
//       单据可以出现在它从未原始归属过的调度下
// ==========================================

use crate::domain::item::DispatchItem;
use std::collections::BTreeSet;

// ==========================================
// MembershipResolver - 归属解析引擎
// ==========================================
pub struct MembershipResolver {
    // 无状态引擎,不需要注入依赖
}

impl Default for MembershipResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MembershipResolver {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 解析单据的有效归属集
    ///
    /// # 返回
    /// 去重后的调度号集合。集合无序语义, 调用方不得依赖插入顺序。
    pub fn resolve_schedule_ids(&self, item: &DispatchItem) -> BTreeSet<i64> {
        let mut ids = BTreeSet::new();
        if let Some(primary) = item.primary_schedule_id {
            ids.insert(primary);
        }
        for id in item.reassigned_ref.ids() {
            ids.insert(id);
        }
        ids
    }

    /// 判断单据是否出现在指定调度下
    pub fn belongs_to_schedule(&self, item: &DispatchItem, schedule_id: i64) -> bool {
        self.resolve_schedule_ids(item).contains(&schedule_id)
    }

    /// 判断单据是否被动过 (覆盖字段存在, 不论解析出多少调度号)
    ///
    /// 驱动看板上的"已调整"标记
    pub fn is_modified(&self, item: &DispatchItem) -> bool {
        item.reassigned_ref.is_set()
    }

    /// 判断单据是否为"调入"当前调度
    ///
    /// 即: 被动过, 且原始归属存在且不等于当前调度。
    /// 注意: 原始归属为 null 时恒为 false —— 从未分配状态被排入调度的
    /// 单据不视为"调入" (现行口径, 未经产品确认不得更改)。
    pub fn is_transferred_into(&self, item: &DispatchItem, current_schedule_id: i64) -> bool {
        if !self.is_modified(item) {
            return false;
        }
        match item.primary_schedule_id {
            Some(primary) => primary != current_schedule_id,
            None => false,
        }
    }

    /// 判断某客户在当前调度下的全部单据是否都是调入的
    ///
    /// # 参数
    /// - customer_name / city: 客户标识 (名称+城市二元组)
    /// - orders / returns: 当前快照中的订单与退货集合
    /// - current_schedule_id: 当前调度
    ///
    /// # 返回
    /// - 该客户在当前调度下无单据: false
    /// - 否则: 所有归属当前调度的单据均为调入时 true
    ///
    /// 看板据此决定客户行整体划线 (全部业务已移走) 还是部分划线
    pub fn all_items_transferred_for_customer(
        &self,
        customer_name: &str,
        city: &str,
        orders: &[DispatchItem],
        returns: &[DispatchItem],
        current_schedule_id: i64,
    ) -> bool {
        let mut member_count = 0usize;
        for item in orders.iter().chain(returns.iter()) {
            if item.customer_name != customer_name || item.city != city {
                continue;
            }
            if !self.belongs_to_schedule(item, current_schedule_id) {
                continue;
            }
            member_count += 1;
            if !self.is_transferred_into(item, current_schedule_id) {
                return false;
            }
        }
        member_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ItemKind, ScheduleOverlay};

    fn item(primary: Option<i64>, overlay: ScheduleOverlay) -> DispatchItem {
        let mut it = DispatchItem::new(ItemKind::Order, 1, "Cohen", "Haifa", "HaNamal 3");
        it.primary_schedule_id = primary;
        it.reassigned_raw = overlay.is_set().then(|| String::from("<set>"));
        it.reassigned_ref = overlay;
        it
    }

    #[test]
    fn test_resolve_empty() {
        let resolver = MembershipResolver::new();
        let it = item(None, ScheduleOverlay::Unset);
        assert!(resolver.resolve_schedule_ids(&it).is_empty());
    }

    #[test]
    fn test_resolve_primary_only() {
        let resolver = MembershipResolver::new();
        let it = item(Some(5), ScheduleOverlay::Unset);
        let ids = resolver.resolve_schedule_ids(&it);
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_resolve_union_dedup() {
        let resolver = MembershipResolver::new();
        let it = item(Some(5), ScheduleOverlay::Many(vec![92, 5, 92]));
        let ids = resolver.resolve_schedule_ids(&it);
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![5, 92]);
    }

    #[test]
    fn test_belongs_matches_resolved_set() {
        let resolver = MembershipResolver::new();
        let it = item(Some(3), ScheduleOverlay::Single(10));
        // 定义性等价: belongs ⇔ 集合包含
        for x in [3, 10, 99] {
            assert_eq!(
                resolver.belongs_to_schedule(&it, x),
                resolver.resolve_schedule_ids(&it).contains(&x)
            );
        }
        assert!(resolver.belongs_to_schedule(&it, 10));
        assert!(!resolver.belongs_to_schedule(&it, 99));
    }

    #[test]
    fn test_is_modified_regardless_of_parse() {
        let resolver = MembershipResolver::new();
        assert!(!resolver.is_modified(&item(Some(5), ScheduleOverlay::Unset)));
        assert!(resolver.is_modified(&item(Some(5), ScheduleOverlay::Single(9))));
        // 覆盖字段存在但一个调度号都没解析出来, 仍算被动过
        assert!(resolver.is_modified(&item(Some(5), ScheduleOverlay::Many(vec![]))));
    }

    #[test]
    fn test_transferred_requires_primary() {
        let resolver = MembershipResolver::new();
        // 原始归属为 null: 不论覆盖指向哪里都不算调入
        let it = item(None, ScheduleOverlay::Single(10));
        assert!(!resolver.is_transferred_into(&it, 10));

        let native = item(Some(10), ScheduleOverlay::Single(10));
        assert!(!resolver.is_transferred_into(&native, 10));

        let moved = item(Some(3), ScheduleOverlay::Single(10));
        assert!(resolver.is_transferred_into(&moved, 10));
    }
}

// ==========================================
// 物流配送调度看板 - 城市→区域查询缓存
// ==========================================
// 职责: 会话内避免重复的城市区域归属查询
// 红线: 纯优化, 不承担正确性 —— 显式注入、手工失效,
//       模块级可变状态禁止 (测试需要可确定地重置)
// ==========================================

use std::collections::HashMap;

// ==========================================
// CityAreaCache - 城市→区域备忘缓存
// ==========================================
// 值为 Option<i64>: 城市存在但未划区 (None) 也是有效的缓存结果
#[derive(Debug, Default)]
pub struct CityAreaCache {
    entries: HashMap<String, Option<i64>>,
    hits: u64,
    misses: u64,
}

impl CityAreaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取缓存值, 未命中时调用 lookup 计算并写入
    ///
    /// lookup 返回 Err 时不缓存, 错误原样向上传递
    pub fn get_or_compute<E>(
        &mut self,
        city: &str,
        lookup: impl FnOnce(&str) -> Result<Option<i64>, E>,
    ) -> Result<Option<i64>, E> {
        if let Some(cached) = self.entries.get(city) {
            self.hits += 1;
            return Ok(*cached);
        }
        self.misses += 1;
        let value = lookup(city)?;
        self.entries.insert(city.to_string(), value);
        Ok(value)
    }

    /// 失效单个城市 (城市划区变更后调用)
    pub fn invalidate(&mut self, city: &str) {
        self.entries.remove(city);
    }

    /// 清空全部缓存 (区域结构整体变更后调用)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 命中/未命中计数 (诊断用)
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[test]
    fn test_memoizes_lookup() {
        let mut cache = CityAreaCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            let v: Result<_, Infallible> = cache.get_or_compute("Haifa", |_| {
                calls += 1;
                Ok(Some(4))
            });
            assert_eq!(v.unwrap(), Some(4));
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.stats(), (2, 1));
    }

    #[test]
    fn test_caches_unzoned_city() {
        let mut cache = CityAreaCache::new();
        let mut calls = 0;

        for _ in 0..2 {
            let v: Result<_, Infallible> = cache.get_or_compute("Eilat", |_| {
                calls += 1;
                Ok(None)
            });
            assert_eq!(v.unwrap(), None);
        }
        // None 也是有效结果, 不应反复回源
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let mut cache = CityAreaCache::new();
        let _: Result<_, Infallible> = cache.get_or_compute("Haifa", |_| Ok(Some(4)));
        cache.invalidate("Haifa");
        let v: Result<_, Infallible> = cache.get_or_compute("Haifa", |_| Ok(Some(9)));
        assert_eq!(v.unwrap(), Some(9));
    }

    #[test]
    fn test_error_is_not_cached() {
        let mut cache = CityAreaCache::new();
        let first: Result<Option<i64>, &str> = cache.get_or_compute("Haifa", |_| Err("db busy"));
        assert!(first.is_err());

        let second: Result<Option<i64>, &str> = cache.get_or_compute("Haifa", |_| Ok(Some(4)));
        assert_eq!(second.unwrap(), Some(4));
    }
}

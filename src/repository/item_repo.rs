// ==========================================
// 物流配送调度看板 - 订单/退货仓储
// ==========================================
// 职责: 管理 mainorder / mainreturns 两张结构等同的表
// 说明: 调线覆盖列 (reassigned_ref) 以原始 JSON 文本存储,
//       读取时经 engine::overlay 归一化; 单行畸形不失败整批
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::item::DispatchItem;
use crate::domain::types::ItemKind;
use crate::engine::overlay::parse_overlay;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// 单据类型对应的表名
fn table_name(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Order => "mainorder",
        ItemKind::Return => "mainreturns",
    }
}

pub struct ItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ItemRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_tables()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_tables()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_tables(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        for table in ["mainorder", "mainreturns"] {
            conn.execute_batch(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                  id INTEGER PRIMARY KEY,
                  customer_name TEXT NOT NULL,
                  city TEXT NOT NULL,
                  address TEXT NOT NULL DEFAULT '',
                  customer_number TEXT,
                  agent_number TEXT,
                  primary_schedule_id INTEGER,
                  reassigned_ref TEXT,
                  updated_at TEXT NOT NULL DEFAULT (datetime('now'))
                );

                CREATE INDEX IF NOT EXISTS idx_{table}_primary_schedule
                  ON {table}(primary_schedule_id);
                CREATE INDEX IF NOT EXISTS idx_{table}_customer
                  ON {table}(customer_name, city);
                "#
            ))?;
        }
        Ok(())
    }

    /// 行解码: 覆盖列原文经归一化进入领域实体
    fn decode_row(kind: ItemKind, row: &Row<'_>) -> SqliteResult<DispatchItem> {
        let raw: Option<String> = row.get(7)?;
        let parsed = parse_overlay(raw.as_deref());
        Ok(DispatchItem {
            kind,
            id: row.get(0)?,
            customer_name: row.get(1)?,
            city: row.get(2)?,
            address: row.get(3)?,
            customer_number: row.get(4)?,
            agent_number: row.get(5)?,
            primary_schedule_id: row.get(6)?,
            reassigned_ref: parsed.overlay,
            reassigned_raw: raw,
        })
    }

    const SELECT_COLS: &'static str = "id, customer_name, city, address, customer_number, agent_number, primary_schedule_id, reassigned_ref";

    /// 创建或更新单据（Upsert 操作）
    pub fn upsert(&self, item: &DispatchItem) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            &format!(
                r#"
                INSERT INTO {} (
                    id, customer_name, city, address,
                    customer_number, agent_number,
                    primary_schedule_id, reassigned_ref, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, datetime('now'))
                ON CONFLICT(id) DO UPDATE SET
                    customer_name = excluded.customer_name,
                    city = excluded.city,
                    address = excluded.address,
                    customer_number = excluded.customer_number,
                    agent_number = excluded.agent_number,
                    primary_schedule_id = excluded.primary_schedule_id,
                    reassigned_ref = excluded.reassigned_ref,
                    updated_at = excluded.updated_at
                "#,
                table_name(item.kind)
            ),
            params![
                item.id,
                item.customer_name,
                item.city,
                item.address,
                item.customer_number,
                item.agent_number,
                item.primary_schedule_id,
                item.reassigned_raw,
            ],
        )?;
        Ok(())
    }

    /// 按单据号查找
    pub fn find_by_id(&self, kind: ItemKind, id: i64) -> RepositoryResult<Option<DispatchItem>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} WHERE id = ?1",
            Self::SELECT_COLS,
            table_name(kind)
        ))?;

        let result = stmt.query_row(params![id], |row| Self::decode_row(kind, row));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 列出某类单据全部快照（按单据号排序）
    pub fn list(&self, kind: ItemKind) -> RepositoryResult<Vec<DispatchItem>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY id ASC",
            Self::SELECT_COLS,
            table_name(kind)
        ))?;

        let rows = stmt
            .query_map([], |row| Self::decode_row(kind, row))?
            .collect::<SqliteResult<Vec<_>>>()?;

        // 畸形覆盖行不阻断整批, 但留诊断痕迹
        for item in &rows {
            if item.reassigned_raw.is_some() {
                let parsed = parse_overlay(item.reassigned_raw.as_deref());
                if parsed.skipped > 0 {
                    debug!(
                        kind = %kind,
                        id = item.id,
                        skipped = parsed.skipped,
                        "malformed overlay entries skipped during decode"
                    );
                }
            }
        }
        Ok(rows)
    }

    /// 列出未分配池（无原始归属且无覆盖）
    pub fn list_unassigned(&self, kind: ItemKind) -> RepositoryResult<Vec<DispatchItem>> {
        let items = self.list(kind)?;
        Ok(items.into_iter().filter(|i| i.is_unassigned()).collect())
    }

    /// 写入调线覆盖列 (原始 JSON 文本; None 表示清除覆盖)
    pub fn set_overlay(
        &self,
        kind: ItemKind,
        id: i64,
        overlay_json: Option<&str>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            &format!(
                "UPDATE {} SET reassigned_ref = ?1, updated_at = datetime('now') WHERE id = ?2",
                table_name(kind)
            ),
            params![overlay_json, id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: table_name(kind).to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 按单据号删除
    pub fn delete(&self, kind: ItemKind, id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", table_name(kind)),
            params![id],
        )?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ScheduleOverlay;

    fn setup_test_repo() -> ItemRepository {
        ItemRepository::new(":memory:").expect("Failed to create test repository")
    }

    fn sample(kind: ItemKind, id: i64) -> DispatchItem {
        let mut it = DispatchItem::new(kind, id, "Cohen", "Haifa", "HaNamal 3");
        it.customer_number = Some("C-100".to_string());
        it
    }

    #[test]
    fn test_upsert_and_find() {
        let repo = setup_test_repo();
        let mut item = sample(ItemKind::Order, 12);
        item.primary_schedule_id = Some(5);
        repo.upsert(&item).expect("Failed to upsert");

        let found = repo
            .find_by_id(ItemKind::Order, 12)
            .expect("Failed to find")
            .expect("Item not found");
        assert_eq!(found.customer_name, "Cohen");
        assert_eq!(found.primary_schedule_id, Some(5));
        assert_eq!(found.reassigned_ref, ScheduleOverlay::Unset);

        // 两类单据编号空间独立
        assert!(repo
            .find_by_id(ItemKind::Return, 12)
            .expect("Failed to find")
            .is_none());
    }

    #[test]
    fn test_overlay_roundtrip_normalization() {
        let repo = setup_test_repo();
        repo.upsert(&sample(ItemKind::Order, 1)).expect("upsert");

        repo.set_overlay(ItemKind::Order, 1, Some(r#"[92, {"scheduleId": 7}]"#))
            .expect("Failed to set overlay");

        let found = repo
            .find_by_id(ItemKind::Order, 1)
            .expect("find")
            .expect("missing");
        assert_eq!(found.reassigned_ref, ScheduleOverlay::Many(vec![92, 7]));

        // 清除覆盖
        repo.set_overlay(ItemKind::Order, 1, None).expect("clear");
        let cleared = repo
            .find_by_id(ItemKind::Order, 1)
            .expect("find")
            .expect("missing");
        assert_eq!(cleared.reassigned_ref, ScheduleOverlay::Unset);
    }

    #[test]
    fn test_malformed_overlay_row_does_not_fail_batch() {
        let repo = setup_test_repo();
        repo.upsert(&sample(ItemKind::Order, 1)).expect("upsert");
        repo.upsert(&sample(ItemKind::Order, 2)).expect("upsert");
        repo.set_overlay(ItemKind::Order, 1, Some("garbage text"))
            .expect("set");

        let items = repo.list(ItemKind::Order).expect("list must not fail");
        assert_eq!(items.len(), 2);
        // 畸形行: 覆盖"存在"但贡献为空
        assert!(items[0].reassigned_ref.is_set());
        assert!(items[0].reassigned_ref.ids().is_empty());
    }

    #[test]
    fn test_list_unassigned() {
        let repo = setup_test_repo();
        let mut assigned = sample(ItemKind::Return, 1);
        assigned.primary_schedule_id = Some(3);
        repo.upsert(&assigned).expect("upsert");
        repo.upsert(&sample(ItemKind::Return, 2)).expect("upsert");

        let pool = repo.list_unassigned(ItemKind::Return).expect("list");
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].id, 2);
    }

    #[test]
    fn test_set_overlay_missing_item() {
        let repo = setup_test_repo();
        let err = repo.set_overlay(ItemKind::Order, 404, Some("5")).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }
}

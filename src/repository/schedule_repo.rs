// ==========================================
// 物流配送调度看板 - 配送调度仓储
// ==========================================
// 职责: 管理 distribution_schedule / distribution_groups / cities 三张表
// 说明: 城市→区域查询供 CityAreaCache 回源使用
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::schedule::{City, DistributionGroup, DistributionSchedule};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

pub struct ScheduleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleRepository {
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
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS distribution_groups (
              group_id INTEGER PRIMARY KEY,
              group_name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS distribution_schedule (
              schedule_id INTEGER PRIMARY KEY,
              driver_name TEXT NOT NULL,
              group_id INTEGER,
              schedule_date TEXT NOT NULL,
              FOREIGN KEY (group_id) REFERENCES distribution_groups(group_id)
            );

            CREATE TABLE IF NOT EXISTS cities (
              city_name TEXT PRIMARY KEY,
              group_id INTEGER,
              FOREIGN KEY (group_id) REFERENCES distribution_groups(group_id)
            );

            CREATE INDEX IF NOT EXISTS idx_schedule_date
              ON distribution_schedule(schedule_date);
            CREATE INDEX IF NOT EXISTS idx_schedule_group
              ON distribution_schedule(group_id);
            "#,
        )?;
        Ok(())
    }

    // ==========================================
    // distribution_schedule
    // ==========================================

    /// 创建或更新调度（Upsert 操作）
    pub fn upsert_schedule(&self, schedule: &DistributionSchedule) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO distribution_schedule (schedule_id, driver_name, group_id, schedule_date)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(schedule_id) DO UPDATE SET
                driver_name = excluded.driver_name,
                group_id = excluded.group_id,
                schedule_date = excluded.schedule_date
            "#,
            params![
                schedule.schedule_id,
                schedule.driver_name,
                schedule.group_id,
                schedule.schedule_date,
            ],
        )?;
        Ok(())
    }

    /// 按调度号查找
    pub fn find_schedule(&self, schedule_id: i64) -> RepositoryResult<Option<DistributionSchedule>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            "SELECT schedule_id, driver_name, group_id, schedule_date
             FROM distribution_schedule WHERE schedule_id = ?1",
            params![schedule_id],
            |row| {
                Ok(DistributionSchedule {
                    schedule_id: row.get(0)?,
                    driver_name: row.get(1)?,
                    group_id: row.get(2)?,
                    schedule_date: row.get(3)?,
                })
            },
        );
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 列出某日期的全部调度（按调度号排序）
    pub fn list_schedules_by_date(
        &self,
        date: chrono::NaiveDate,
    ) -> RepositoryResult<Vec<DistributionSchedule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT schedule_id, driver_name, group_id, schedule_date
             FROM distribution_schedule WHERE schedule_date = ?1
             ORDER BY schedule_id ASC",
        )?;
        let rows = stmt
            .query_map(params![date], |row| {
                Ok(DistributionSchedule {
                    schedule_id: row.get(0)?,
                    driver_name: row.get(1)?,
                    group_id: row.get(2)?,
                    schedule_date: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 按调度号删除
    pub fn delete_schedule(&self, schedule_id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM distribution_schedule WHERE schedule_id = ?1",
            params![schedule_id],
        )?;
        Ok(affected)
    }

    // ==========================================
    // distribution_groups / cities
    // ==========================================

    /// 创建或更新配送区域
    pub fn upsert_group(&self, group: &DistributionGroup) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO distribution_groups (group_id, group_name)
            VALUES (?1, ?2)
            ON CONFLICT(group_id) DO UPDATE SET group_name = excluded.group_name
            "#,
            params![group.group_id, group.group_name],
        )?;
        Ok(())
    }

    /// 列出全部配送区域（按名称排序）
    pub fn list_groups(&self) -> RepositoryResult<Vec<DistributionGroup>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT group_id, group_name FROM distribution_groups ORDER BY group_name ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(DistributionGroup {
                    group_id: row.get(0)?,
                    group_name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 创建或更新城市划区
    pub fn upsert_city(&self, city: &City) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO cities (city_name, group_id)
            VALUES (?1, ?2)
            ON CONFLICT(city_name) DO UPDATE SET group_id = excluded.group_id
            "#,
            params![city.city_name, city.group_id],
        )?;
        Ok(())
    }

    /// 查询城市所属区域
    ///
    /// # 返回
    /// - Ok(Some(group_id)): 已划区
    /// - Ok(None): 城市未录入或未划区
    pub fn find_city_group(&self, city_name: &str) -> RepositoryResult<Option<i64>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            "SELECT group_id FROM cities WHERE city_name = ?1",
            params![city_name],
            |row| row.get::<_, Option<i64>>(0),
        );
        match result {
            Ok(v) => Ok(v),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

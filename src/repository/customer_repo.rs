// ==========================================
// 物流配送调度看板 - 客户档案仓储
// ==========================================
// 职责: 管理 customerlist 表
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::customer::Customer;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

pub struct CustomerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CustomerRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS customerlist (
              customer_number TEXT PRIMARY KEY,
              customer_name TEXT NOT NULL,
              city TEXT NOT NULL,
              address TEXT NOT NULL DEFAULT '',
              phone TEXT,
              agent_number TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_customerlist_name_city
              ON customerlist(customer_name, city);
            "#,
        )?;
        Ok(())
    }

    fn decode_row(row: &Row<'_>) -> SqliteResult<Customer> {
        Ok(Customer {
            customer_number: row.get(0)?,
            customer_name: row.get(1)?,
            city: row.get(2)?,
            address: row.get(3)?,
            phone: row.get(4)?,
            agent_number: row.get(5)?,
        })
    }

    const SELECT_COLS: &'static str =
        "customer_number, customer_name, city, address, phone, agent_number";

    /// 创建或更新客户（Upsert 操作）
    pub fn upsert(&self, customer: &Customer) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO customerlist (
                customer_number, customer_name, city, address, phone, agent_number
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(customer_number) DO UPDATE SET
                customer_name = excluded.customer_name,
                city = excluded.city,
                address = excluded.address,
                phone = excluded.phone,
                agent_number = excluded.agent_number
            "#,
            params![
                customer.customer_number,
                customer.customer_name,
                customer.city,
                customer.address,
                customer.phone,
                customer.agent_number,
            ],
        )?;
        Ok(())
    }

    /// 按客户编号查找
    pub fn find_by_number(&self, customer_number: &str) -> RepositoryResult<Option<Customer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM customerlist WHERE customer_number = ?1",
            Self::SELECT_COLS
        ))?;
        let result = stmt.query_row(params![customer_number], Self::decode_row);
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 按名称+城市查找（同名客户以城市区分）
    pub fn find_by_name_city(
        &self,
        customer_name: &str,
        city: &str,
    ) -> RepositoryResult<Option<Customer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM customerlist WHERE customer_name = ?1 AND city = ?2",
            Self::SELECT_COLS
        ))?;
        let result = stmt.query_row(params![customer_name, city], Self::decode_row);
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 列出全部客户（按名称排序）
    pub fn list(&self) -> RepositoryResult<Vec<Customer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM customerlist ORDER BY customer_name ASC",
            Self::SELECT_COLS
        ))?;
        let rows = stmt
            .query_map([], Self::decode_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }
}

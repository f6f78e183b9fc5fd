// ==========================================
// 物流配送调度看板 - 运营消息仓储
// ==========================================
// 职责: 管理 messages 表 (仓库/司机/代理间留言)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::message::OperationalMessage;
use crate::domain::types::ItemKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

pub struct MessageRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MessageRepository {
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
            CREATE TABLE IF NOT EXISTS messages (
              message_id TEXT PRIMARY KEY,
              sender_role TEXT NOT NULL,
              subject TEXT NOT NULL,
              body TEXT NOT NULL DEFAULT '',
              related_kind TEXT,
              related_id INTEGER,
              created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_messages_subject
              ON messages(subject);
            CREATE INDEX IF NOT EXISTS idx_messages_created_at
              ON messages(created_at DESC);
            "#,
        )?;
        Ok(())
    }

    fn decode_row(row: &Row<'_>) -> SqliteResult<OperationalMessage> {
        let kind_raw: Option<String> = row.get(4)?;
        let related_kind = kind_raw.and_then(|s| match s.as_str() {
            "order" => Some(ItemKind::Order),
            "return" => Some(ItemKind::Return),
            _ => None,
        });
        Ok(OperationalMessage {
            message_id: row.get(0)?,
            sender_role: row.get(1)?,
            subject: row.get(2)?,
            body: row.get(3)?,
            related_kind,
            related_id: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    const SELECT_COLS: &'static str =
        "message_id, sender_role, subject, body, related_kind, related_id, created_at";

    /// 插入消息
    pub fn insert(&self, message: &OperationalMessage) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO messages (
                message_id, sender_role, subject, body,
                related_kind, related_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                message.message_id,
                message.sender_role,
                message.subject,
                message.body,
                message.related_kind.map(|k| k.to_string()),
                message.related_id,
                message.created_at,
            ],
        )?;
        Ok(())
    }

    /// 按主题列出消息（按创建时间倒序）
    pub fn list_by_subject(&self, subject: &str) -> RepositoryResult<Vec<OperationalMessage>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM messages WHERE subject = ?1 ORDER BY created_at DESC",
            Self::SELECT_COLS
        ))?;
        let rows = stmt
            .query_map(params![subject], Self::decode_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 列出最近消息（按创建时间倒序，可限制条数）
    pub fn list_recent(&self, limit: Option<usize>) -> RepositoryResult<Vec<OperationalMessage>> {
        let conn = self.get_conn()?;
        let sql = match limit {
            Some(n) => format!(
                "SELECT {} FROM messages ORDER BY created_at DESC LIMIT {}",
                Self::SELECT_COLS,
                n
            ),
            None => format!(
                "SELECT {} FROM messages ORDER BY created_at DESC",
                Self::SELECT_COLS
            ),
        };
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], Self::decode_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 按消息ID删除
    pub fn delete(&self, message_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM messages WHERE message_id = ?1",
            params![message_id],
        )?;
        Ok(affected)
    }
}

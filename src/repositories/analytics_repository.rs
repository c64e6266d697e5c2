// src/repositories/analytics_repository.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::AnalyticsEvent;
use crate::error::{AppError, AppResult};

pub trait AnalyticsRepository: Send + Sync {
    fn record(&self, event: &AnalyticsEvent) -> AppResult<()>;
    fn list_by_name(&self, name: &str) -> AppResult<Vec<AnalyticsEvent>>;
    fn count_by_name(&self, name: &str) -> AppResult<u64>;
    fn delete_all(&self) -> AppResult<()>;
}

pub struct SqliteAnalyticsRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteAnalyticsRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_event(row: &Row) -> Result<AnalyticsEvent, rusqlite::Error> {
        let id_str: String = row.get("id")?;
        let id = Uuid::parse_str(&id_str)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let occurred_at = DateTime::parse_from_rfc3339(&row.get::<_, String>("occurred_at")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        let amount = row
            .get::<_, Option<i64>>("amount")?
            .map(u64::try_from)
            .transpose()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(AnalyticsEvent {
            id,
            name: row.get("name")?,
            authority_hash: row.get("authority_hash")?,
            order_id: row.get("order_id")?,
            amount,
            detail: row.get("detail")?,
            occurred_at,
        })
    }
}

impl AnalyticsRepository for SqliteAnalyticsRepository {
    fn record(&self, event: &AnalyticsEvent) -> AppResult<()> {
        let conn = self.pool.get()?;
        let amount = event
            .amount
            .map(i64::try_from)
            .transpose()
            .map_err(|e| AppError::Validation(format!("Amount out of range: {}", e)))?;

        conn.execute(
            "INSERT INTO analytics_events (id, name, authority_hash, order_id, amount, detail, occurred_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                event.id.to_string(),
                event.name,
                event.authority_hash,
                event.order_id,
                amount,
                event.detail,
                event.occurred_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    fn list_by_name(&self, name: &str) -> AppResult<Vec<AnalyticsEvent>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT * FROM analytics_events WHERE name = ?1 ORDER BY occurred_at")?;
        let events = stmt
            .query_map(params![name], Self::row_to_event)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    fn count_by_name(&self, name: &str) -> AppResult<u64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM analytics_events WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    fn delete_all(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM analytics_events", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[test]
    fn test_record_and_list() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteAnalyticsRepository::new(pool);

        let event = AnalyticsEvent::new("payment_verified", crate::domain::current_time())
            .with_authority("A1")
            .with_order("order-1", 10_000);
        repo.record(&event).unwrap();
        repo.record(&AnalyticsEvent::new("payment_initiated", crate::domain::current_time()))
            .unwrap();

        let loaded = repo.list_by_name("payment_verified").unwrap();
        assert_eq!(loaded, vec![event]);
        assert_eq!(repo.count_by_name("payment_initiated").unwrap(), 1);
        assert_eq!(repo.count_by_name("unknown").unwrap(), 0);
    }

    #[test]
    fn test_delete_all() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteAnalyticsRepository::new(pool);
        repo.record(&AnalyticsEvent::new("x", crate::domain::current_time()))
            .unwrap();
        repo.delete_all().unwrap();
        assert_eq!(repo.count_by_name("x").unwrap(), 0);
    }
}

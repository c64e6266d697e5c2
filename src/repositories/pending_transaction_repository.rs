// src/repositories/pending_transaction_repository.rs

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, OptionalExtension, Row};

use crate::db::ConnectionPool;
use crate::domain::payment::{PendingTransaction, TransactionState};
use crate::error::{AppError, AppResult};

pub trait PendingTransactionRepository: Send + Sync {
    /// Insert a new transaction. Fails if the authority already exists.
    fn save(&self, tx: &PendingTransaction) -> AppResult<()>;

    fn get_by_authority(&self, authority: &str) -> AppResult<Option<PendingTransaction>>;

    fn list_by_order(&self, order_id: &str) -> AppResult<Vec<PendingTransaction>>;

    /// Compare-and-swap `created -> verified`.
    /// Returns false when the row was not in `created` (or does not exist).
    fn mark_verified(
        &self,
        authority: &str,
        ref_id: &str,
        card_pan: Option<&str>,
        verified_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Compare-and-swap `created -> expired`.
    fn mark_expired(&self, authority: &str) -> AppResult<bool>;

    /// Delete unverified rows created before `cutoff`. Returns rows removed.
    fn delete_stale(&self, cutoff: DateTime<Utc>) -> AppResult<usize>;
}

pub struct SqlitePendingTransactionRepository {
    pool: Arc<ConnectionPool>,
}

impl SqlitePendingTransactionRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn conversion_error(column: usize, message: String) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
        )
    }

    fn millis_to_datetime(column: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| Self::conversion_error(column, format!("Invalid timestamp {}", millis)))
    }

    fn row_to_transaction(row: &Row) -> rusqlite::Result<PendingTransaction> {
        let amount_raw: i64 = row.get("amount")?;
        let amount = u64::try_from(amount_raw)
            .map_err(|_| Self::conversion_error(2, format!("Negative amount {}", amount_raw)))?;

        let state_str: String = row.get("state")?;
        let state = state_str
            .parse::<TransactionState>()
            .map_err(|e| Self::conversion_error(4, e))?;

        let created_at = Self::millis_to_datetime(5, row.get("created_at")?)?;
        let verified_at = row
            .get::<_, Option<i64>>("verified_at")?
            .map(|millis| Self::millis_to_datetime(6, millis))
            .transpose()?;

        Ok(PendingTransaction {
            authority: row.get("authority")?,
            order_id: row.get("order_id")?,
            amount,
            description: row.get("description")?,
            state,
            created_at,
            verified_at,
            ref_id: row.get("ref_id")?,
            card_pan: row.get("card_pan")?,
        })
    }
}

fn amount_to_sql(amount: u64) -> AppResult<i64> {
    i64::try_from(amount)
        .map_err(|_| AppError::Validation(format!("Amount {} is out of range", amount)))
}

impl PendingTransactionRepository for SqlitePendingTransactionRepository {
    fn save(&self, tx: &PendingTransaction) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO pending_transactions
             (authority, order_id, amount, description, state, created_at, verified_at, ref_id, card_pan)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                tx.authority,
                tx.order_id,
                amount_to_sql(tx.amount)?,
                tx.description,
                tx.state.as_str(),
                tx.created_at.timestamp_millis(),
                tx.verified_at.map(|dt| dt.timestamp_millis()),
                tx.ref_id,
                tx.card_pan,
            ],
        )?;
        Ok(())
    }

    fn get_by_authority(&self, authority: &str) -> AppResult<Option<PendingTransaction>> {
        let conn = self.pool.get()?;
        let tx = conn
            .query_row(
                "SELECT * FROM pending_transactions WHERE authority = ?1",
                params![authority],
                Self::row_to_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    fn list_by_order(&self, order_id: &str) -> AppResult<Vec<PendingTransaction>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT * FROM pending_transactions WHERE order_id = ?1 ORDER BY created_at DESC",
        )?;
        let txs = stmt
            .query_map(params![order_id], Self::row_to_transaction)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(txs)
    }

    fn mark_verified(
        &self,
        authority: &str,
        ref_id: &str,
        card_pan: Option<&str>,
        verified_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let updated = conn.execute(
            "UPDATE pending_transactions
             SET state = 'verified', ref_id = ?2, card_pan = ?3, verified_at = ?4
             WHERE authority = ?1 AND state = 'created'",
            params![authority, ref_id, card_pan, verified_at.timestamp_millis()],
        )?;
        Ok(updated == 1)
    }

    fn mark_expired(&self, authority: &str) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let updated = conn.execute(
            "UPDATE pending_transactions SET state = 'expired'
             WHERE authority = ?1 AND state = 'created'",
            params![authority],
        )?;
        Ok(updated == 1)
    }

    fn delete_stale(&self, cutoff: DateTime<Utc>) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let deleted = conn.execute(
            "DELETE FROM pending_transactions
             WHERE state IN ('created', 'expired') AND created_at < ?1",
            params![cutoff.timestamp_millis()],
        )?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use chrono::Duration;

    fn sample(authority: &str, order_id: &str) -> PendingTransaction {
        PendingTransaction::new(
            authority.to_string(),
            order_id.to_string(),
            25_000,
            "Silver bracelet".to_string(),
        )
    }

    #[test]
    fn test_save_and_get() {
        let (_dir, pool) = create_test_pool();
        let repo = SqlitePendingTransactionRepository::new(pool);

        let tx = sample("A1", "order-1");
        repo.save(&tx).unwrap();

        let loaded = repo.get_by_authority("A1").unwrap().unwrap();
        assert_eq!(loaded, tx);
        assert!(repo.get_by_authority("missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_authority_is_rejected() {
        let (_dir, pool) = create_test_pool();
        let repo = SqlitePendingTransactionRepository::new(pool);

        repo.save(&sample("A1", "order-1")).unwrap();
        let err = repo.save(&sample("A1", "order-2")).unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_mark_verified_is_compare_and_swap() {
        let (_dir, pool) = create_test_pool();
        let repo = SqlitePendingTransactionRepository::new(pool);
        repo.save(&sample("A1", "order-1")).unwrap();

        let now = crate::domain::current_time();
        assert!(repo.mark_verified("A1", "R1", Some("6037****1234"), now).unwrap());
        assert!(!repo.mark_verified("A1", "R2", None, now).unwrap());

        let loaded = repo.get_by_authority("A1").unwrap().unwrap();
        assert_eq!(loaded.state, TransactionState::Verified);
        assert_eq!(loaded.ref_id.as_deref(), Some("R1"));
        assert_eq!(loaded.card_pan.as_deref(), Some("6037****1234"));
        assert_eq!(loaded.verified_at, Some(now));
    }

    #[test]
    fn test_mark_verified_unknown_authority() {
        let (_dir, pool) = create_test_pool();
        let repo = SqlitePendingTransactionRepository::new(pool);
        assert!(!repo
            .mark_verified("nope", "R1", None, crate::domain::current_time())
            .unwrap());
    }

    #[test]
    fn test_expired_cannot_be_verified() {
        let (_dir, pool) = create_test_pool();
        let repo = SqlitePendingTransactionRepository::new(pool);
        repo.save(&sample("A1", "order-1")).unwrap();

        assert!(repo.mark_expired("A1").unwrap());
        assert!(!repo.mark_expired("A1").unwrap());
        assert!(!repo
            .mark_verified("A1", "R1", None, crate::domain::current_time())
            .unwrap());
    }

    #[test]
    fn test_list_by_order() {
        let (_dir, pool) = create_test_pool();
        let repo = SqlitePendingTransactionRepository::new(pool);
        repo.save(&sample("A1", "order-1")).unwrap();
        repo.save(&sample("A2", "order-1")).unwrap();
        repo.save(&sample("A3", "order-2")).unwrap();

        assert_eq!(repo.list_by_order("order-1").unwrap().len(), 2);
        assert_eq!(repo.list_by_order("order-3").unwrap().len(), 0);
    }

    #[test]
    fn test_delete_stale_keeps_verified_and_recent() {
        let (_dir, pool) = create_test_pool();
        let repo = SqlitePendingTransactionRepository::new(pool);
        let old = crate::domain::current_time() - Duration::days(10);

        let mut stale_created = sample("OLD-CREATED", "o1");
        stale_created.created_at = old;
        repo.save(&stale_created).unwrap();

        let mut stale_verified = sample("OLD-VERIFIED", "o2");
        stale_verified.created_at = old;
        repo.save(&stale_verified).unwrap();
        repo.mark_verified("OLD-VERIFIED", "R9", None, old + Duration::minutes(1))
            .unwrap();

        repo.save(&sample("FRESH", "o3")).unwrap();

        let cutoff = crate::domain::current_time() - Duration::days(7);
        assert_eq!(repo.delete_stale(cutoff).unwrap(), 1);
        assert!(repo.get_by_authority("OLD-CREATED").unwrap().is_none());
        assert!(repo.get_by_authority("OLD-VERIFIED").unwrap().is_some());
        assert!(repo.get_by_authority("FRESH").unwrap().is_some());
    }
}

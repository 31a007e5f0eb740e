//! SQLite implementation of the coupon store.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::coupon::CouponRecord;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::registration::Course;
use crate::ports::CouponStore;

/// SQLite implementation of [`CouponStore`].
#[derive(Clone)]
pub struct SqliteCouponStore {
    pool: SqlitePool,
}

impl SqliteCouponStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CouponRow {
    code: String,
    discount_percent: i64,
    usage_count: i64,
    usage_limit: i64,
    course_key: Option<String>,
}

impl TryFrom<CouponRow> for CouponRecord {
    type Error = DomainError;

    fn try_from(row: CouponRow) -> Result<Self, Self::Error> {
        let corrupt = |field: &str| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Corrupt coupon row {}: bad {}", row.code, field),
            )
        };
        let course = match &row.course_key {
            Some(key) => Some(Course::from_str(key).map_err(|_| corrupt("course_key"))?),
            None => None,
        };
        Ok(CouponRecord {
            discount_percent: u8::try_from(row.discount_percent)
                .map_err(|_| corrupt("discount_percent"))?,
            usage_count: u32::try_from(row.usage_count).map_err(|_| corrupt("usage_count"))?,
            usage_limit: u32::try_from(row.usage_limit).map_err(|_| corrupt("usage_limit"))?,
            code: row.code,
            course,
        })
    }
}

#[async_trait]
impl CouponStore for SqliteCouponStore {
    async fn upsert(&self, coupon: &CouponRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO coupons
                (code, discount_percent, usage_count, usage_limit, course_key)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&coupon.code)
        .bind(i64::from(coupon.discount_percent))
        .bind(i64::from(coupon.usage_count))
        .bind(i64::from(coupon.usage_limit))
        .bind(coupon.course.map(|c| c.as_key()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to store coupon: {}", e),
            )
        })?;
        Ok(())
    }

    async fn find(&self, code: &str) -> Result<Option<CouponRecord>, DomainError> {
        let row = sqlx::query_as::<_, CouponRow>(
            "SELECT code, discount_percent, usage_count, usage_limit, course_key \
             FROM coupons WHERE code = ?1",
        )
        .bind(CouponRecord::normalize_code(code))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch coupon: {}", e),
            )
        })?;

        row.map(CouponRecord::try_from).transpose()
    }

    async fn redeem(&self, code: &str) -> Result<(), DomainError> {
        sqlx::query("UPDATE coupons SET usage_count = usage_count + 1 WHERE code = ?1")
            .bind(CouponRecord::normalize_code(code))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to redeem coupon: {}", e),
                )
            })?;
        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM coupons WHERE code = ?1")
            .bind(CouponRecord::normalize_code(code))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete coupon: {}", e),
                )
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<CouponRecord>, DomainError> {
        let rows = sqlx::query_as::<_, CouponRow>(
            "SELECT code, discount_percent, usage_count, usage_limit, course_key \
             FROM coupons ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list coupons: {}", e),
            )
        })?;

        rows.into_iter().map(CouponRecord::try_from).collect()
    }
}

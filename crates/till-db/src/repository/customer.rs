//! # Customer Repository
//!
//! Customer records and their purchase history.
//!
//! Balances (`total_purchases_cents`, `current_credit_cents`) only move when
//! a sale is posted. The walk-in customer (id 1) is never written to; the
//! schema's guard triggers back that up.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::sale::SALE_COLUMNS;
use till_core::validation::validate_new_customer;
use till_core::{Customer, NewCustomer, Sale, WALK_IN_CUSTOMER_ID};

pub(crate) const CUSTOMER_COLUMNS: &str = r#"
    id, name, phone, email, address, total_purchases_cents,
    credit_limit_cents, current_credit_cents, is_credit_customer,
    is_active, created_at
"#;

#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    pub async fn insert(&self, customer: &NewCustomer) -> DbResult<Customer> {
        validate_new_customer(customer)?;

        let result = sqlx::query(
            r#"
            INSERT INTO customers (
                name, phone, email, address, credit_limit_cents,
                is_credit_customer, is_active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)
            "#,
        )
        .bind(customer.name.trim())
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(customer.credit_limit.cents())
        .bind(customer.is_credit_customer)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, name = %customer.name, "Customer created");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {} FROM customers WHERE id = ?1", CUSTOMER_COLUMNS);
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Active customers by name, walk-in first.
    pub async fn list_active(&self) -> DbResult<Vec<Customer>> {
        let sql = format!(
            "SELECT {} FROM customers WHERE is_active = 1 ORDER BY id != ?1, name",
            CUSTOMER_COLUMNS
        );
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .bind(WALK_IN_CUSTOMER_ID)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Customers carrying an unpaid credit balance, largest first.
    pub async fn list_with_credit_balance(&self) -> DbResult<Vec<Customer>> {
        let sql = format!(
            r#"
            SELECT {} FROM customers
            WHERE current_credit_cents > 0
            ORDER BY current_credit_cents DESC
            "#,
            CUSTOMER_COLUMNS
        );
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Hides a customer from pickers. History and balances are kept.
    ///
    /// ## Errors
    /// - `DbError::Immutable` for the walk-in customer
    /// - `DbError::NotFound` if no such customer exists
    pub async fn deactivate(&self, id: i64) -> DbResult<()> {
        if id == WALK_IN_CUSTOMER_ID {
            return Err(DbError::Immutable {
                entity: "Customer".to_string(),
                id: id.to_string(),
            });
        }

        let result = sqlx::query("UPDATE customers SET is_active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        info!(id, "Customer deactivated");
        Ok(())
    }

    /// Sales posted against a customer, newest first.
    pub async fn sales_history(&self, customer_id: i64) -> DbResult<Vec<Sale>> {
        let sql = format!(
            r#"
            SELECT {} FROM sales
            WHERE customer_id = ?1
            ORDER BY sale_date DESC, id DESC
            "#,
            SALE_COLUMNS
        );
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use till_core::Money;

    #[tokio::test]
    async fn test_insert_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let created = db
            .customers()
            .insert(&NewCustomer {
                name: "Ayesha Khan".to_string(),
                phone: Some("0300-1234567".to_string()),
                credit_limit: Money::from_cents(50_000),
                is_credit_customer: true,
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!created.is_walk_in());
        assert_eq!(created.credit_limit(), Money::from_cents(50_000));
        assert_eq!(created.current_credit_cents, 0);
        assert_eq!(created.available_credit(), Money::from_cents(50_000));
    }

    #[tokio::test]
    async fn test_walk_in_cannot_be_deactivated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.customers().deactivate(WALK_IN_CUSTOMER_ID).await.unwrap_err();
        assert!(matches!(err, DbError::Immutable { .. }));
    }

    #[tokio::test]
    async fn test_walk_in_guard_trigger() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = sqlx::query("UPDATE customers SET total_purchases_cents = 10 WHERE id = 1")
            .execute(db.pool())
            .await
            .map_err(DbError::from)
            .unwrap_err();

        assert!(matches!(err, DbError::ConstraintViolation { .. }));
    }

    #[tokio::test]
    async fn test_deactivate_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let bilal = repo
            .insert(&NewCustomer {
                name: "Bilal".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(repo.list_active().await.unwrap().len(), 2);
        repo.deactivate(bilal.id).await.unwrap();

        let active = repo.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert!(active[0].is_walk_in());

        assert!(matches!(
            repo.deactivate(999).await,
            Err(DbError::NotFound { .. })
        ));
    }
}

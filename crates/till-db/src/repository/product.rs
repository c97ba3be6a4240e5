//! # Product Repository
//!
//! Catalog rows and their stock levels.
//!
//! `stock_qty` is written here only when a product is created. After that
//! the inventory ledger inside a posting scope is the sole writer.
//!
//! ## Low Stock
//! ```text
//! stock_qty <= min_stock_level   →   listed by list_low_stock()
//!
//!   COKE-330   stock 4   min 5   ← low
//!   RICE-5KG   stock 0   min 0   ← low (zero counts)
//!   SOAP-01    stock 12  min 5
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use till_core::validation::validate_new_product;
use till_core::{NewProduct, Product};

const PRODUCT_COLUMNS: &str = r#"
    id, code, name, category, cost_price_cents, sell_price_cents,
    stock_qty, min_stock_level, barcode, supplier_id, is_active,
    created_at, updated_at
"#;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product with its opening stock.
    ///
    /// ## Errors
    /// - `DbError::Validation` for a bad code, name, price or minimum level
    /// - `DbError::UniqueViolation` if the code is taken
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        validate_new_product(product)?;

        let now = Utc::now();

        debug!(code = %product.code, stock = product.stock_qty, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                code, name, category, cost_price_cents, sell_price_cents,
                stock_qty, min_stock_level, barcode, supplier_id, is_active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10, ?10)
            "#,
        )
        .bind(product.code.trim())
        .bind(product.name.trim())
        .bind(&product.category)
        .bind(product.cost_price.cents())
        .bind(product.sell_price.cents())
        .bind(product.stock_qty)
        .bind(product.min_stock_level)
        .bind(&product.barcode)
        .bind(product.supplier_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).label_duplicate("product code", product.code.trim()))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE code = ?1", PRODUCT_COLUMNS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(code.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Looks up an active product by scanned barcode.
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE barcode = ?1 AND is_active = 1",
            PRODUCT_COLUMNS
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(barcode.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists active products by name.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE is_active = 1 ORDER BY name LIMIT ?1",
            PRODUCT_COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Active products at or below their minimum level, lowest stock first.
    pub async fn list_low_stock(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {} FROM products
            WHERE is_active = 1 AND stock_qty <= min_stock_level
            ORDER BY stock_qty ASC, code ASC
            "#,
            PRODUCT_COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Low stock products");
        Ok(products)
    }

    /// Current stock of a product.
    pub async fn stock_qty(&self, id: i64) -> DbResult<i64> {
        sqlx::query_scalar("SELECT stock_qty FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

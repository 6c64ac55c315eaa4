//! Postgres-backed store implementation.
//!
//! Each trait method is a single round-trip (or one query per logical table
//! for joins); there is no cross-call transaction, matching the remote-store
//! interface the rest of the system is written against. The stock decrement
//! is the one hardened spot: a conditional UPDATE that can never drive stock
//! negative, with the rows-affected count distinguishing insufficient stock
//! from a missing product.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use stockflow_catalog::{NewProduct, Product, ProductPatch};
use stockflow_core::{OrderId, ProductId};
use stockflow_orders::{
    Order, OrderDraft, OrderItem, OrderItemDetail, OrderStatus, OrderWithItems,
};

use crate::backend::{Backend, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    price_cents BIGINT NOT NULL,
    stock BIGINT NOT NULL DEFAULT 0 CHECK (stock >= 0),
    image_url TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS orders (
    id UUID PRIMARY KEY,
    customer_name TEXT NOT NULL,
    customer_email TEXT NOT NULL,
    status TEXT NOT NULL,
    total_cents BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS order_items (
    order_id UUID NOT NULL REFERENCES orders(id),
    product_id UUID NOT NULL,
    quantity BIGINT NOT NULL,
    unit_price_cents BIGINT NOT NULL
);

CREATE INDEX IF NOT EXISTS order_items_order_id_idx ON order_items (order_id);
CREATE INDEX IF NOT EXISTS orders_customer_email_idx ON orders (customer_email);
"#;

/// Postgres store over the `products`, `orders` and `order_items` tables.
pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(store_err)?;
        Ok(Self::new(pool))
    }

    /// Create the tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn items_for_orders(
        &self,
        filter: Option<OrderId>,
    ) -> Result<HashMap<Uuid, Vec<OrderItemDetail>>, StoreError> {
        let base = r#"
            SELECT oi.order_id, oi.product_id, COALESCE(p.name, '') AS product_name,
                   oi.quantity, oi.unit_price_cents
            FROM order_items oi
            LEFT JOIN products p ON p.id = oi.product_id
        "#;

        let rows = match filter {
            Some(order_id) => {
                sqlx::query(&format!("{base} WHERE oi.order_id = $1"))
                    .bind(order_id.as_uuid())
                    .fetch_all(&self.pool)
                    .await
            }
            None => sqlx::query(base).fetch_all(&self.pool).await,
        }
        .map_err(store_err)?;

        let mut grouped: HashMap<Uuid, Vec<OrderItemDetail>> = HashMap::new();
        for row in rows {
            let order_id: Uuid = row.try_get("order_id").map_err(store_err)?;
            grouped.entry(order_id).or_default().push(item_from_row(&row)?);
        }
        Ok(grouped)
    }
}

fn store_err(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        other => StoreError::Backend(other.to_string()),
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    Ok(Product {
        id: ProductId::from_uuid(row.try_get("id").map_err(store_err)?),
        name: row.try_get("name").map_err(store_err)?,
        description: row.try_get("description").map_err(store_err)?,
        price_cents: row.try_get::<i64, _>("price_cents").map_err(store_err)? as u64,
        stock: row.try_get("stock").map_err(store_err)?,
        image_url: row.try_get("image_url").map_err(store_err)?,
        created_at: row.try_get("created_at").map_err(store_err)?,
    })
}

fn order_from_row(row: &PgRow) -> Result<Order, StoreError> {
    let status: String = row.try_get("status").map_err(store_err)?;
    let status: OrderStatus = status
        .parse()
        .map_err(|e: stockflow_core::DomainError| StoreError::Backend(e.to_string()))?;

    Ok(Order {
        id: OrderId::from_uuid(row.try_get("id").map_err(store_err)?),
        customer_name: row.try_get("customer_name").map_err(store_err)?,
        customer_email: row.try_get("customer_email").map_err(store_err)?,
        status,
        total_cents: row.try_get::<i64, _>("total_cents").map_err(store_err)? as u64,
        created_at: row.try_get("created_at").map_err(store_err)?,
    })
}

fn item_from_row(row: &PgRow) -> Result<OrderItemDetail, StoreError> {
    Ok(OrderItemDetail {
        product_id: ProductId::from_uuid(row.try_get("product_id").map_err(store_err)?),
        product_name: row.try_get("product_name").map_err(store_err)?,
        quantity: row.try_get("quantity").map_err(store_err)?,
        unit_price_cents: row.try_get::<i64, _>("unit_price_cents").map_err(store_err)? as u64,
    })
}

#[async_trait]
impl Backend for PostgresBackend {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query("SELECT * FROM products ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;
        rows.iter().map(product_from_row).collect()
    }

    async fn list_in_stock_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM products WHERE stock > 0 ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;
        rows.iter().map(product_from_row).collect()
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, StoreError> {
        let row = sqlx::query("SELECT * FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?
            .ok_or(StoreError::NotFound)?;
        product_from_row(&row)
    }

    async fn create_product(&self, draft: NewProduct) -> Result<Product, StoreError> {
        let product = Product {
            id: ProductId::new(),
            name: draft.name,
            description: draft.description,
            price_cents: draft.price_cents,
            stock: draft.stock,
            image_url: draft.image_url,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price_cents, stock, image_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents as i64)
        .bind(product.stock)
        .bind(&product.image_url)
        .bind(product.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, StoreError> {
        // Read-modify-write of the full row; admin edits are last-write-wins.
        let mut product = self.get_product(id).await?;
        patch.apply_to(&mut product);

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price_cents = $4, stock = $5, image_url = $6
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents as i64)
        .bind(product.stock)
        .bind(&product.image_url)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(product)
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn decrement_stock(&self, id: ProductId, quantity: i64) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE products SET stock = stock - $2 WHERE id = $1 AND stock >= $2",
        )
        .bind(id.as_uuid())
        .bind(quantity)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Zero rows affected: missing product or not enough units.
        let available = self.get_product(id).await?.stock;
        Err(StoreError::InsufficientStock {
            product_id: id,
            requested: quantity,
            available,
        })
    }

    async fn insert_order(&self, draft: OrderDraft) -> Result<Order, StoreError> {
        let order = Order {
            id: OrderId::new(),
            customer_name: draft.customer_name,
            customer_email: draft.customer_email,
            status: OrderStatus::Pending,
            total_cents: draft.total_cents,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_name, customer_email, status, total_cents, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(&order.customer_name)
        .bind(&order.customer_email)
        .bind(order.status.as_str())
        .bind(order.total_cents as i64)
        .bind(order.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(order)
    }

    async fn insert_order_items(&self, items: &[OrderItem]) -> Result<(), StoreError> {
        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity, unit_price_cents)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(item.order_id.as_uuid())
            .bind(item.product_id.as_uuid())
            .bind(item.quantity)
            .bind(item.unit_price_cents as i64)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        }
        Ok(())
    }

    async fn order_by_id(&self, id: OrderId) -> Result<OrderWithItems, StoreError> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?
            .ok_or(StoreError::NotFound)?;
        let order = order_from_row(&row)?;

        let mut grouped = self.items_for_orders(Some(id)).await?;
        let items = grouped.remove(order.id.as_uuid()).unwrap_or_default();
        Ok(OrderWithItems { order, items })
    }

    async fn latest_order_by_email(&self, email: &str) -> Result<OrderWithItems, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT * FROM orders
            WHERE customer_email = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?
        .ok_or(StoreError::NotFound)?;
        let order = order_from_row(&row)?;

        let mut grouped = self.items_for_orders(Some(order.id)).await?;
        let items = grouped.remove(order.id.as_uuid()).unwrap_or_default();
        Ok(OrderWithItems { order, items })
    }

    async fn list_orders(&self) -> Result<Vec<OrderWithItems>, StoreError> {
        let rows = sqlx::query("SELECT * FROM orders ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;

        let mut grouped = self.items_for_orders(None).await?;
        rows.iter()
            .map(|row| {
                let order = order_from_row(row)?;
                let items = grouped.remove(order.id.as_uuid()).unwrap_or_default();
                Ok(OrderWithItems { order, items })
            })
            .collect()
    }

    async fn set_order_status(&self, id: OrderId, status: OrderStatus) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, QueryBuilder, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::products::{
    data::{NewProduct, ProductUpdate},
    models::{Product, ProductUuid},
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

const PRODUCT_COLUMNS: &str = "uuid, name, sku, category, price, stock, min_stock, reserved, \
                               available, location, image, status, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.name)
            .bind(product.sku)
            .bind(product.category)
            .bind(price_to_db(product.price)?)
            .bind(product.stock)
            .bind(product.min_stock)
            .bind(product.reserved)
            .bind(product.available)
            .bind(product.location)
            .bind(product.image)
            .bind(product.status)
            .fetch_one(&mut **tx)
            .await
    }

    /// Write the supplied columns of `update`. `update` must name at least one column.
    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE products SET ");
        let mut columns = builder.separated(", ");

        if let Some(name) = update.name {
            columns.push("name = ").push_bind_unseparated(name);
        }

        if let Some(sku) = update.sku {
            columns.push("sku = ").push_bind_unseparated(sku);
        }

        if let Some(category) = update.category {
            columns.push("category = ").push_bind_unseparated(category);
        }

        if let Some(price) = update.price {
            columns
                .push("price = ")
                .push_bind_unseparated(price_to_db(price)?);
        }

        for (column, value) in [
            ("stock", update.stock),
            ("min_stock", update.min_stock),
            ("reserved", update.reserved),
            ("available", update.available),
        ] {
            if let Some(value) = value {
                columns
                    .push(format!("{column} = "))
                    .push_bind_unseparated(value);
            }
        }

        if let Some(location) = update.location {
            columns.push("location = ").push_bind_unseparated(location);
        }

        if let Some(image) = update.image {
            columns.push("image = ").push_bind_unseparated(image);
        }

        if let Some(status) = update.status {
            columns.push("status = ").push_bind_unseparated(status);
        }

        columns.push("updated_at = now()");

        builder
            .push(" WHERE uuid = ")
            .push_bind(product.into_uuid())
            .push(" RETURNING ")
            .push(PRODUCT_COLUMNS);

        builder
            .build_query_as::<Product>()
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn price_to_db(price: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(price).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let price_i64: i64 = row.try_get("price")?;

        let price = u64::try_from(price_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "price".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            sku: row.try_get("sku")?,
            category: row.try_get("category")?,
            price,
            stock: row.try_get("stock")?,
            min_stock: row.try_get("min_stock")?,
            reserved: row.try_get("reserved")?,
            available: row.try_get("available")?,
            location: row.try_get("location")?,
            image: row.try_get("image")?,
            status: row.try_get("status")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

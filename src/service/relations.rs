//! Relation reads and writes that sit outside the generic five operations:
//! shop item <-> category links and the items of an order.

use super::crud::{execute, fetch_all, insert_returning};
use crate::model::{Category, OrderItem, OrderItemInput, CATEGORIES, ORDER_ITEMS, SHOP_ITEM_CATEGORIES};
use crate::sql::{self, BindValue};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;

#[derive(sqlx::FromRow)]
struct LinkedCategory {
    shop_item_id: i64,
    #[sqlx(flatten)]
    category: Category,
}

/// Ids bound per category query; stays well below SQLite's host parameter limit.
pub const ITEM_ID_BATCH: usize = 500;

/// Categories of every given shop item, loaded in batches of `ITEM_ID_BATCH` ids.
/// Items without links are absent from the map.
pub async fn categories_for_items(pool: &SqlitePool, item_ids: &[i64]) -> Result<HashMap<i64, Vec<Category>>, sqlx::Error> {
    let mut out: HashMap<i64, Vec<Category>> = HashMap::new();
    for batch in item_ids.chunks(ITEM_ID_BATCH) {
        let q = sql::select_categories_for_items(&SHOP_ITEM_CATEGORIES, &CATEGORIES, batch.len());
        let params = batch.iter().map(|id| BindValue::I64(*id)).collect();
        let rows = fetch_all::<LinkedCategory>(pool, &q, params).await?;
        for row in rows {
            out.entry(row.shop_item_id).or_default().push(row.category);
        }
    }
    Ok(out)
}

/// Idempotent: linking an already linked pair is a no-op.
pub async fn link_category(pool: &SqlitePool, shop_item_id: i64, category_id: i64) -> Result<(), sqlx::Error> {
    let q = sql::insert_link(&SHOP_ITEM_CATEGORIES);
    execute(pool, &q, vec![shop_item_id.into(), category_id.into()]).await?;
    Ok(())
}

pub async fn unlink_category(pool: &SqlitePool, shop_item_id: i64, category_id: i64) -> Result<u64, sqlx::Error> {
    let q = sql::delete_where(&SHOP_ITEM_CATEGORIES, &["shop_item_id", "category_id"]);
    execute(pool, &q, vec![shop_item_id.into(), category_id.into()]).await
}

pub async fn items_of_order(pool: &SqlitePool, order_id: i64) -> Result<Vec<OrderItem>, sqlx::Error> {
    let q = sql::select_by_column(&ORDER_ITEMS, "order_id");
    fetch_all::<OrderItem>(pool, &q, vec![order_id.into()]).await
}

#[derive(Serialize)]
struct NewOrderItem {
    order_id: i64,
    shop_item_id: i64,
    quantity: i64,
}

/// Insert an item into an order. An unknown shop item is rejected by the foreign key.
pub async fn add_order_item(pool: &SqlitePool, order_id: i64, input: &OrderItemInput) -> Result<OrderItem, sqlx::Error> {
    let row = NewOrderItem {
        order_id,
        shop_item_id: input.shop_item_id,
        quantity: input.quantity,
    };
    insert_returning::<OrderItem, _>(pool, &ORDER_ITEMS, &row).await
}

/// Removes the item only when it belongs to the given order.
pub async fn remove_order_item(pool: &SqlitePool, order_id: i64, item_id: i64) -> Result<u64, sqlx::Error> {
    let q = sql::delete_where(&ORDER_ITEMS, &["id", "order_id"]);
    execute(pool, &q, vec![item_id.into(), order_id.into()]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::migration::apply_migrations;
    use crate::model::{CategoryInput, Customer, CustomerInput, Order, OrderInput, ShopItem, ShopItemInput};
    use crate::service::CrudService;

    async fn pool() -> SqlitePool {
        let pool = db::connect_in_memory().await.unwrap();
        apply_migrations(&pool).await.unwrap();
        pool
    }

    async fn item(pool: &SqlitePool, title: &str) -> ShopItem {
        CrudService::create::<ShopItem>(
            pool,
            &ShopItemInput {
                title: title.into(),
                description: None,
                price: 1.5,
            },
        )
        .await
        .unwrap()
    }

    async fn category(pool: &SqlitePool, title: &str) -> Category {
        CrudService::create::<Category>(
            pool,
            &CategoryInput {
                title: title.into(),
                description: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn categories_are_grouped_per_item() {
        let pool = pool().await;
        let a = item(&pool, "A").await;
        let b = item(&pool, "B").await;
        let books = category(&pool, "Books").await;
        let music = category(&pool, "Music").await;
        link_category(&pool, a.id, books.id).await.unwrap();
        link_category(&pool, a.id, music.id).await.unwrap();
        link_category(&pool, a.id, music.id).await.unwrap();

        let map = categories_for_items(&pool, &[a.id, b.id]).await.unwrap();
        assert_eq!(map[&a.id], vec![books.clone(), music]);
        assert!(!map.contains_key(&b.id));

        let read = CrudService::read::<ShopItem>(&pool, a.id).await.unwrap().unwrap();
        assert_eq!(read.categories.len(), 2);
        assert_eq!(unlink_category(&pool, a.id, books.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn listing_more_items_than_one_batch_keeps_their_categories() {
        let pool = pool().await;
        let total = ITEM_ID_BATCH * 2 + 7;
        sqlx::query(
            "WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < ?) \
             INSERT INTO \"shop_items\" (\"title\", \"price\") SELECT 'Bulk ' || i, 1.0 FROM n",
        )
        .bind(total as i64)
        .execute(&pool)
        .await
        .unwrap();
        let books = category(&pool, "Books").await;
        let last = total as i64;
        link_category(&pool, 1, books.id).await.unwrap();
        link_category(&pool, last, books.id).await.unwrap();

        let items = CrudService::list::<ShopItem>(&pool).await.unwrap();
        assert_eq!(items.len(), total);
        assert_eq!(items[0].categories, vec![books.clone()]);
        assert_eq!(items[total - 1].id, last);
        assert_eq!(items[total - 1].categories, vec![books]);
        assert!(items[1].categories.is_empty());
    }

    #[tokio::test]
    async fn deleting_a_category_removes_its_links() {
        let pool = pool().await;
        let a = item(&pool, "A").await;
        let books = category(&pool, "Books").await;
        link_category(&pool, a.id, books.id).await.unwrap();

        CrudService::delete::<Category>(&pool, books.id).await.unwrap();
        let read = CrudService::read::<ShopItem>(&pool, a.id).await.unwrap().unwrap();
        assert!(read.categories.is_empty());
    }

    #[tokio::test]
    async fn deleting_an_order_removes_its_items() {
        let pool = pool().await;
        let customer = CrudService::create::<Customer>(
            &pool,
            &CustomerInput {
                name: "Jane".into(),
                surname: "Smith".into(),
                email: "jane@x.com".into(),
            },
        )
        .await
        .unwrap();
        let order = CrudService::create::<Order>(&pool, &OrderInput { customer_id: customer.id })
            .await
            .unwrap();
        let widget = item(&pool, "Widget").await;
        let added = add_order_item(
            &pool,
            order.id,
            &OrderItemInput {
                shop_item_id: widget.id,
                quantity: 3,
            },
        )
        .await
        .unwrap();
        assert_eq!(added.order_id, order.id);
        assert_eq!(items_of_order(&pool, order.id).await.unwrap(), vec![added]);

        assert_eq!(CrudService::delete::<Order>(&pool, order.id).await.unwrap(), 1);
        assert!(items_of_order(&pool, order.id).await.unwrap().is_empty());
        // The shop item itself is no longer referenced and can go too.
        assert_eq!(CrudService::delete::<ShopItem>(&pool, widget.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn order_item_for_unknown_shop_item_is_rejected() {
        let pool = pool().await;
        let customer = CrudService::create::<Customer>(
            &pool,
            &CustomerInput {
                name: "Jane".into(),
                surname: "Smith".into(),
                email: "jane@x.com".into(),
            },
        )
        .await
        .unwrap();
        let order = CrudService::create::<Order>(&pool, &OrderInput { customer_id: customer.id })
            .await
            .unwrap();
        let res = add_order_item(
            &pool,
            order.id,
            &OrderItemInput {
                shop_item_id: 999,
                quantity: 1,
            },
        )
        .await;
        assert!(res.is_err());
    }
}

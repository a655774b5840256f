use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{FoodItem, FoodPatch, MealPeriod, NewFood};

/// Every call is scoped to the owning user.
#[async_trait]
pub trait FoodRepo: Send + Sync {
    async fn list(&self, user_id: Uuid, period: Option<MealPeriod>) -> anyhow::Result<Vec<FoodItem>>;
    async fn insert(&self, user_id: Uuid, food: NewFood) -> anyhow::Result<FoodItem>;
    async fn update(&self, user_id: Uuid, id: Uuid, patch: FoodPatch) -> anyhow::Result<Option<FoodItem>>;
    async fn toggle_completed(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<FoodItem>>;
    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgFoodRepo {
    db: PgPool,
}

impl PgFoodRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const COLUMNS: &str = "id, user_id, name, grams, unit, period, is_completed, created_at";

#[async_trait]
impl FoodRepo for PgFoodRepo {
    async fn list(&self, user_id: Uuid, period: Option<MealPeriod>) -> anyhow::Result<Vec<FoodItem>> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM food_items
            WHERE user_id = $1 AND ($2::meal_period IS NULL OR period = $2)
            ORDER BY created_at ASC
            "#
        );
        sqlx::query_as::<_, FoodItem>(&sql)
            .bind(user_id)
            .bind(period)
            .fetch_all(&self.db)
            .await
            .context("list food items")
    }

    async fn insert(&self, user_id: Uuid, food: NewFood) -> anyhow::Result<FoodItem> {
        let sql = format!(
            r#"
            INSERT INTO food_items (name, grams, unit, period, is_completed, user_id)
            VALUES ($1, $2, $3, $4, FALSE, $5)
            RETURNING {COLUMNS}
            "#
        );
        sqlx::query_as::<_, FoodItem>(&sql)
            .bind(&food.name)
            .bind(food.quantity.grams())
            .bind(food.quantity.unit())
            .bind(food.period)
            .bind(user_id)
            .fetch_one(&self.db)
            .await
            .context("insert food item")
    }

    async fn update(&self, user_id: Uuid, id: Uuid, patch: FoodPatch) -> anyhow::Result<Option<FoodItem>> {
        let sql = format!(
            r#"
            UPDATE food_items
               SET name  = COALESCE($3, name),
                   grams = CASE WHEN $4 THEN $5 ELSE grams END,
                   unit  = CASE WHEN $4 THEN $6 ELSE unit END
             WHERE id = $1 AND user_id = $2
            RETURNING {COLUMNS}
            "#
        );
        let quantity = patch.quantity.as_ref();
        sqlx::query_as::<_, FoodItem>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(patch.name.as_deref())
            .bind(quantity.is_some())
            .bind(quantity.and_then(|q| q.grams()))
            .bind(quantity.and_then(|q| q.unit()))
            .fetch_optional(&self.db)
            .await
            .context("update food item")
    }

    async fn toggle_completed(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<FoodItem>> {
        let sql = format!(
            r#"
            UPDATE food_items
               SET is_completed = NOT is_completed
             WHERE id = $1 AND user_id = $2
            RETURNING {COLUMNS}
            "#
        );
        sqlx::query_as::<_, FoodItem>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .context("toggle food item")
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM food_items WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete food item")?;
        Ok(res.rows_affected() > 0)
    }
}

#[cfg(test)]
pub mod memory {
    use std::sync::Mutex;

    use super::*;
    use time::OffsetDateTime;

    #[derive(Default)]
    pub struct MemoryFoodRepo {
        rows: Mutex<Vec<FoodItem>>,
    }

    #[async_trait]
    impl FoodRepo for MemoryFoodRepo {
        async fn list(&self, user_id: Uuid, period: Option<MealPeriod>) -> anyhow::Result<Vec<FoodItem>> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|f| f.user_id == user_id && period.map_or(true, |p| f.period == p))
                .cloned()
                .collect())
        }

        async fn insert(&self, user_id: Uuid, food: NewFood) -> anyhow::Result<FoodItem> {
            let item = FoodItem {
                id: Uuid::new_v4(),
                user_id,
                grams: food.quantity.grams(),
                unit: food.quantity.unit().map(str::to_string),
                name: food.name,
                period: food.period,
                is_completed: false,
                created_at: OffsetDateTime::now_utc(),
            };
            self.rows.lock().unwrap().push(item.clone());
            Ok(item)
        }

        async fn update(&self, user_id: Uuid, id: Uuid, patch: FoodPatch) -> anyhow::Result<Option<FoodItem>> {
            let mut rows = self.rows.lock().unwrap();
            let Some(item) = rows.iter_mut().find(|f| f.id == id && f.user_id == user_id) else {
                return Ok(None);
            };
            if let Some(name) = patch.name {
                item.name = name;
            }
            if let Some(q) = patch.quantity {
                item.grams = q.grams();
                item.unit = q.unit().map(str::to_string);
            }
            Ok(Some(item.clone()))
        }

        async fn toggle_completed(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<FoodItem>> {
            let mut rows = self.rows.lock().unwrap();
            Ok(rows
                .iter_mut()
                .find(|f| f.id == id && f.user_id == user_id)
                .map(|item| {
                    item.is_completed = !item.is_completed;
                    item.clone()
                }))
        }

        async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|f| !(f.id == id && f.user_id == user_id));
            Ok(rows.len() < before)
        }
    }
}

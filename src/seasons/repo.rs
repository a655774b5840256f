use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::{Season, SeasonType, StartOutcome};

#[async_trait]
pub trait SeasonRepo: Send + Sync {
    /// Newest first.
    async fn list(&self, user_id: Uuid) -> anyhow::Result<Vec<Season>>;
    async fn latest_open(&self, user_id: Uuid, kind: SeasonType) -> anyhow::Result<Option<Season>>;
    async fn start(&self, user_id: Uuid, kind: SeasonType, started_at: Date) -> anyhow::Result<StartOutcome>;
    async fn end(&self, user_id: Uuid, id: Uuid, ended_at: Date) -> anyhow::Result<Option<Season>>;
}

#[derive(Clone)]
pub struct PgSeasonRepo {
    db: PgPool,
}

impl PgSeasonRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const COLUMNS: &str = "id, user_id, type, started_at, ended_at";
const OPEN_SEASON_INDEX: &str = "seasons_one_open_per_type";

#[async_trait]
impl SeasonRepo for PgSeasonRepo {
    async fn list(&self, user_id: Uuid) -> anyhow::Result<Vec<Season>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM seasons WHERE user_id = $1 ORDER BY started_at DESC"
        );
        sqlx::query_as::<_, Season>(&sql)
            .bind(user_id)
            .fetch_all(&self.db)
            .await
            .context("list seasons")
    }

    async fn latest_open(&self, user_id: Uuid, kind: SeasonType) -> anyhow::Result<Option<Season>> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM seasons
            WHERE user_id = $1 AND type = $2 AND ended_at IS NULL
            ORDER BY started_at DESC
            LIMIT 1
            "#
        );
        sqlx::query_as::<_, Season>(&sql)
            .bind(user_id)
            .bind(kind)
            .fetch_optional(&self.db)
            .await
            .context("find open season")
    }

    async fn start(&self, user_id: Uuid, kind: SeasonType, started_at: Date) -> anyhow::Result<StartOutcome> {
        let sql = format!(
            r#"
            INSERT INTO seasons (user_id, type, started_at)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "#
        );
        let res = sqlx::query_as::<_, Season>(&sql)
            .bind(user_id)
            .bind(kind)
            .bind(started_at)
            .fetch_one(&self.db)
            .await;

        match res {
            Ok(season) => Ok(StartOutcome::Started(season)),
            // A concurrent start won the race on the partial unique index.
            Err(sqlx::Error::Database(e)) if e.constraint() == Some(OPEN_SEASON_INDEX) => {
                Ok(StartOutcome::AlreadyOpen)
            }
            Err(e) => Err(e).context("insert season"),
        }
    }

    async fn end(&self, user_id: Uuid, id: Uuid, ended_at: Date) -> anyhow::Result<Option<Season>> {
        let sql = format!(
            r#"
            UPDATE seasons
               SET ended_at = $3
             WHERE id = $1 AND user_id = $2 AND ended_at IS NULL
            RETURNING {COLUMNS}
            "#
        );
        sqlx::query_as::<_, Season>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(ended_at)
            .fetch_optional(&self.db)
            .await
            .context("end season")
    }
}

#[cfg(test)]
pub mod memory {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemorySeasonRepo {
        rows: Mutex<Vec<Season>>,
    }

    #[async_trait]
    impl SeasonRepo for MemorySeasonRepo {
        async fn list(&self, user_id: Uuid) -> anyhow::Result<Vec<Season>> {
            let mut out: Vec<Season> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.user_id == user_id)
                .cloned()
                .collect();
            out.sort_by(|a, b| b.started_at.cmp(&a.started_at));
            Ok(out)
        }

        async fn latest_open(&self, user_id: Uuid, kind: SeasonType) -> anyhow::Result<Option<Season>> {
            Ok(self
                .list(user_id)
                .await?
                .into_iter()
                .find(|s| s.kind == kind && s.is_open()))
        }

        async fn start(&self, user_id: Uuid, kind: SeasonType, started_at: Date) -> anyhow::Result<StartOutcome> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|s| s.user_id == user_id && s.kind == kind && s.is_open()) {
                return Ok(StartOutcome::AlreadyOpen);
            }
            let season = Season {
                id: Uuid::new_v4(),
                user_id,
                kind,
                started_at,
                ended_at: None,
            };
            rows.push(season.clone());
            Ok(StartOutcome::Started(season))
        }

        async fn end(&self, user_id: Uuid, id: Uuid, ended_at: Date) -> anyhow::Result<Option<Season>> {
            let mut rows = self.rows.lock().unwrap();
            Ok(rows
                .iter_mut()
                .find(|s| s.id == id && s.user_id == user_id && s.is_open())
                .map(|s| {
                    s.ended_at = Some(ended_at);
                    s.clone()
                }))
        }
    }
}

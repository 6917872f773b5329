use sqlx::{query, query_scalar, Pool, Sqlite};
use tracing::info;

const RESULTS_PUBLIC_KEY: &str = "results_public";

/// Owns the switch that decides whether participants can see their results.
pub struct VisibilityRepository {
    pool: Pool<Sqlite>,
}

impl VisibilityRepository {
    pub fn new(pool: Pool<Sqlite>) -> VisibilityRepository {
        VisibilityRepository { pool }
    }

    pub async fn is_public(&self) -> Result<bool, anyhow::Error> {
        let value = query_scalar::<_, String>("SELECT value FROM settings WHERE key = $1")
            .bind(RESULTS_PUBLIC_KEY)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value.as_deref() == Some("true"))
    }

    #[tracing::instrument(skip(self))]
    pub async fn set_public(&self, public: bool) -> Result<(), anyhow::Error> {
        query(
            r#"
                INSERT INTO settings (key, value) VALUES ($1, $2)
                ON CONFLICT (key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(RESULTS_PUBLIC_KEY)
        .bind(if public { "true" } else { "false" })
        .execute(&self.pool)
        .await?;

        info!("Results are now {}", if public { "public" } else { "hidden" });

        Ok(())
    }

    /// Flips the flag in a single statement and returns the new value.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_public(&self) -> Result<bool, anyhow::Error> {
        let value = query_scalar::<_, String>(
            r#"
                INSERT INTO settings (key, value) VALUES ($1, 'true')
                ON CONFLICT (key) DO UPDATE
                    SET value = CASE value WHEN 'true' THEN 'false' ELSE 'true' END
                RETURNING value
            "#,
        )
        .bind(RESULTS_PUBLIC_KEY)
        .fetch_one(&self.pool)
        .await?;

        let public = value == "true";
        info!("Results are now {}", if public { "public" } else { "hidden" });

        Ok(public)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::VisibilityRepository;
    use crate::repository::memory_pool;

    #[test(tokio::test)]
    async fn hidden_by_default() {
        let repository = VisibilityRepository::new(memory_pool().await);

        assert!(!repository.is_public().await.unwrap());
    }

    #[test(tokio::test)]
    async fn set_public_is_idempotent() {
        let repository = VisibilityRepository::new(memory_pool().await);

        repository.set_public(true).await.unwrap();
        repository.set_public(true).await.unwrap();
        assert!(repository.is_public().await.unwrap());

        repository.set_public(false).await.unwrap();
        assert!(!repository.is_public().await.unwrap());
    }

    #[test(tokio::test)]
    async fn missing_row_reads_as_hidden() {
        let pool = memory_pool().await;
        sqlx::query("DELETE FROM settings")
            .execute(&pool)
            .await
            .unwrap();
        let repository = VisibilityRepository::new(pool);

        assert!(!repository.is_public().await.unwrap());

        repository.set_public(true).await.unwrap();
        assert!(repository.is_public().await.unwrap());
    }

    #[test(tokio::test)]
    async fn toggle_flips_and_reports_new_value() {
        let repository = VisibilityRepository::new(memory_pool().await);

        assert!(repository.toggle_public().await.unwrap());
        assert!(repository.is_public().await.unwrap());

        assert!(!repository.toggle_public().await.unwrap());
        assert!(!repository.is_public().await.unwrap());
    }

    #[test(tokio::test)]
    async fn toggle_without_row_makes_results_public() {
        let pool = memory_pool().await;
        sqlx::query("DELETE FROM settings")
            .execute(&pool)
            .await
            .unwrap();
        let repository = VisibilityRepository::new(pool);

        assert!(repository.toggle_public().await.unwrap());
        assert!(repository.is_public().await.unwrap());
    }
}

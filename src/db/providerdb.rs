use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::ServiceProvider;

const PROVIDER_COLUMNS: &str = r#"
    id, user_id, address, documents, is_profile_completed, is_verified_from_admin,
    stripe_account_id, current_rating, rating_count, created_at, updated_at
"#;

#[async_trait]
pub trait ProviderExt {
    /// Created empty at registration time, completed later by the provider.
    async fn create_provider_profile(&self, user_id: Uuid) -> Result<ServiceProvider, sqlx::Error>;

    async fn get_provider_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ServiceProvider>, sqlx::Error>;

    async fn get_provider_by_id(
        &self,
        provider_id: Uuid,
    ) -> Result<Option<ServiceProvider>, sqlx::Error>;

    async fn get_providers(&self, page: u32, limit: usize)
        -> Result<Vec<ServiceProvider>, sqlx::Error>;

    async fn complete_provider_profile(
        &self,
        provider_id: Uuid,
        address: String,
        area_ids: Vec<Uuid>,
        category_ids: Vec<Uuid>,
    ) -> Result<ServiceProvider, sqlx::Error>;

    async fn update_provider_documents(
        &self,
        provider_id: Uuid,
        documents: String,
    ) -> Result<ServiceProvider, sqlx::Error>;

    async fn set_provider_verified(
        &self,
        provider_id: Uuid,
    ) -> Result<ServiceProvider, sqlx::Error>;

    async fn set_provider_stripe_account(
        &self,
        provider_id: Uuid,
        account_id: &str,
    ) -> Result<ServiceProvider, sqlx::Error>;
}

#[async_trait]
impl ProviderExt for DBClient {
    async fn create_provider_profile(&self, user_id: Uuid) -> Result<ServiceProvider, sqlx::Error> {
        sqlx::query_as::<_, ServiceProvider>(&format!(
            "INSERT INTO service_providers (user_id, address)
             VALUES ($1, '')
             RETURNING {PROVIDER_COLUMNS}"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_provider_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ServiceProvider>, sqlx::Error> {
        sqlx::query_as::<_, ServiceProvider>(&format!(
            "SELECT {PROVIDER_COLUMNS} FROM service_providers WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_provider_by_id(
        &self,
        provider_id: Uuid,
    ) -> Result<Option<ServiceProvider>, sqlx::Error> {
        sqlx::query_as::<_, ServiceProvider>(&format!(
            "SELECT {PROVIDER_COLUMNS} FROM service_providers WHERE id = $1"
        ))
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_providers(
        &self,
        page: u32,
        limit: usize,
    ) -> Result<Vec<ServiceProvider>, sqlx::Error> {
        let offset = (page.max(1) - 1) as i64 * limit as i64;

        sqlx::query_as::<_, ServiceProvider>(&format!(
            "SELECT {PROVIDER_COLUMNS} FROM service_providers
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn complete_provider_profile(
        &self,
        provider_id: Uuid,
        address: String,
        area_ids: Vec<Uuid>,
        category_ids: Vec<Uuid>,
    ) -> Result<ServiceProvider, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let provider = sqlx::query_as::<_, ServiceProvider>(&format!(
            "UPDATE service_providers
             SET address = $2, is_profile_completed = true, updated_at = NOW()
             WHERE id = $1
             RETURNING {PROVIDER_COLUMNS}"
        ))
        .bind(provider_id)
        .bind(address)
        .fetch_one(&mut *tx)
        .await?;

        // Replace the join rows wholesale, like a set assignment.
        sqlx::query("DELETE FROM provider_areas WHERE provider_id = $1")
            .bind(provider_id)
            .execute(&mut *tx)
            .await?;
        for area_id in area_ids {
            sqlx::query("INSERT INTO provider_areas (provider_id, area_id) VALUES ($1, $2)")
                .bind(provider_id)
                .bind(area_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM provider_categories WHERE provider_id = $1")
            .bind(provider_id)
            .execute(&mut *tx)
            .await?;
        for category_id in category_ids {
            sqlx::query(
                "INSERT INTO provider_categories (provider_id, category_id) VALUES ($1, $2)",
            )
            .bind(provider_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(provider)
    }

    async fn update_provider_documents(
        &self,
        provider_id: Uuid,
        documents: String,
    ) -> Result<ServiceProvider, sqlx::Error> {
        sqlx::query_as::<_, ServiceProvider>(&format!(
            "UPDATE service_providers SET documents = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {PROVIDER_COLUMNS}"
        ))
        .bind(provider_id)
        .bind(documents)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_provider_verified(
        &self,
        provider_id: Uuid,
    ) -> Result<ServiceProvider, sqlx::Error> {
        sqlx::query_as::<_, ServiceProvider>(&format!(
            "UPDATE service_providers SET is_verified_from_admin = true, updated_at = NOW()
             WHERE id = $1
             RETURNING {PROVIDER_COLUMNS}"
        ))
        .bind(provider_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_provider_stripe_account(
        &self,
        provider_id: Uuid,
        account_id: &str,
    ) -> Result<ServiceProvider, sqlx::Error> {
        sqlx::query_as::<_, ServiceProvider>(&format!(
            "UPDATE service_providers SET stripe_account_id = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {PROVIDER_COLUMNS}"
        ))
        .bind(provider_id)
        .bind(account_id)
        .fetch_one(&self.pool)
        .await
    }
}

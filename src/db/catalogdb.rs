use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::{Area, ServiceCategory, SubService};

#[async_trait]
pub trait CatalogExt {
    async fn create_area(&self, name: &str) -> Result<Area, sqlx::Error>;

    async fn get_area_by_id(&self, area_id: Uuid) -> Result<Option<Area>, sqlx::Error>;

    async fn get_area_by_name(&self, name: &str) -> Result<Option<Area>, sqlx::Error>;

    async fn get_areas(&self) -> Result<Vec<Area>, sqlx::Error>;

    async fn create_service_category(&self, name: &str) -> Result<ServiceCategory, sqlx::Error>;

    async fn get_service_category_by_id(
        &self,
        category_id: Uuid,
    ) -> Result<Option<ServiceCategory>, sqlx::Error>;

    async fn get_service_category_by_name(
        &self,
        name: &str,
    ) -> Result<Option<ServiceCategory>, sqlx::Error>;

    async fn get_service_categories(&self) -> Result<Vec<ServiceCategory>, sqlx::Error>;

    async fn create_sub_service(
        &self,
        category_id: Uuid,
        name: &str,
    ) -> Result<SubService, sqlx::Error>;

    async fn get_sub_service_by_id(
        &self,
        sub_service_id: Uuid,
    ) -> Result<Option<SubService>, sqlx::Error>;

    async fn get_sub_services_for_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<SubService>, sqlx::Error>;
}

#[async_trait]
impl CatalogExt for DBClient {
    async fn create_area(&self, name: &str) -> Result<Area, sqlx::Error> {
        sqlx::query_as::<_, Area>(
            "INSERT INTO areas (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_area_by_id(&self, area_id: Uuid) -> Result<Option<Area>, sqlx::Error> {
        sqlx::query_as::<_, Area>("SELECT id, name, created_at FROM areas WHERE id = $1")
            .bind(area_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_area_by_name(&self, name: &str) -> Result<Option<Area>, sqlx::Error> {
        sqlx::query_as::<_, Area>("SELECT id, name, created_at FROM areas WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_areas(&self) -> Result<Vec<Area>, sqlx::Error> {
        sqlx::query_as::<_, Area>("SELECT id, name, created_at FROM areas ORDER BY name")
            .fetch_all(&self.pool)
            .await
    }

    async fn create_service_category(&self, name: &str) -> Result<ServiceCategory, sqlx::Error> {
        sqlx::query_as::<_, ServiceCategory>(
            "INSERT INTO service_categories (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_service_category_by_id(
        &self,
        category_id: Uuid,
    ) -> Result<Option<ServiceCategory>, sqlx::Error> {
        sqlx::query_as::<_, ServiceCategory>(
            "SELECT id, name, created_at FROM service_categories WHERE id = $1",
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_service_category_by_name(
        &self,
        name: &str,
    ) -> Result<Option<ServiceCategory>, sqlx::Error> {
        sqlx::query_as::<_, ServiceCategory>(
            "SELECT id, name, created_at FROM service_categories WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_service_categories(&self) -> Result<Vec<ServiceCategory>, sqlx::Error> {
        sqlx::query_as::<_, ServiceCategory>(
            "SELECT id, name, created_at FROM service_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn create_sub_service(
        &self,
        category_id: Uuid,
        name: &str,
    ) -> Result<SubService, sqlx::Error> {
        sqlx::query_as::<_, SubService>(
            "INSERT INTO sub_services (category_id, name) VALUES ($1, $2)
             RETURNING id, category_id, name, created_at",
        )
        .bind(category_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_sub_service_by_id(
        &self,
        sub_service_id: Uuid,
    ) -> Result<Option<SubService>, sqlx::Error> {
        sqlx::query_as::<_, SubService>(
            "SELECT id, category_id, name, created_at FROM sub_services WHERE id = $1",
        )
        .bind(sub_service_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_sub_services_for_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<SubService>, sqlx::Error> {
        sqlx::query_as::<_, SubService>(
            "SELECT id, category_id, name, created_at FROM sub_services
             WHERE category_id = $1
             ORDER BY name",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Job DTOs

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateJobDto {
    pub category_id: Uuid,

    pub sub_service_id: Uuid,

    pub area_id: Uuid,

    #[validate(length(min = 10, max = 2000, message = "Description must be between 10 and 2000 characters"))]
    pub description: String,

    #[validate(range(min = 0.0, message = "Budget must be positive"))]
    pub budget: f64,

    pub start_time: DateTime<Utc>,

    pub end_time: DateTime<Utc>,

    pub tools_needed: bool,

    pub images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Serialize, Validate, Default)]
pub struct UpdateJobDto {
    #[validate(length(min = 10, max = 2000, message = "Description must be between 10 and 2000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "Budget must be positive"))]
    pub budget: Option<f64>,

    pub start_time: Option<DateTime<Utc>>,

    pub end_time: Option<DateTime<Utc>>,

    pub tools_needed: Option<bool>,

    pub images: Option<Vec<String>>,
}

// Bid DTOs

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct PlaceBidDto {
    #[validate(range(min = 0.0, message = "Price must be positive"))]
    pub price: f64,

    #[validate(length(max = 2000, message = "Proposal must be at most 2000 characters"))]
    pub proposal: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct AcceptBidDto {
    pub service_provider_id: Uuid,
}

// Provider DTOs

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CompleteProviderProfileDto {
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    #[validate(length(min = 1, message = "At least one service area is required"))]
    pub service_areas: Vec<Uuid>,

    #[validate(length(min = 1, message = "At least one service category is required"))]
    pub service_categories: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct UploadDocumentsDto {
    #[validate(length(min = 1, message = "Document URL is required"))]
    pub documents: String,
}

// Review DTOs

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateReviewDto {
    pub service_provider_id: Uuid,

    pub job_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}

// Dispute DTOs

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateDisputeDto {
    pub bid_id: Uuid,

    #[validate(length(min = 1, max = 2000, message = "Reason must be between 1 and 2000 characters"))]
    pub reason: String,

    pub pictures: Option<Vec<String>>,
}

// Catalog DTOs

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateAreaDto {
    #[validate(length(min = 1, max = 100, message = "Area name must be between 1 and 100 characters"))]
    pub area: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateServiceCategoryDto {
    #[validate(length(min = 1, max = 100, message = "Service name must be between 1 and 100 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateSubServiceDto {
    pub category_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Sub-service name must be between 1 and 100 characters"))]
    pub name: String,
}

// Response wrappers

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn error(message: &str) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            message: message.to_string(),
            data: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, page: u32, limit: u32) -> Self {
        let total_pages = ((total as f64) / (limit as f64)).ceil() as u32;
        Self {
            success: true,
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_rating_bounds_are_enforced() {
        let mut dto = CreateReviewDto {
            service_provider_id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            rating: 5,
            comment: None,
        };
        assert!(dto.validate().is_ok());

        dto.rating = 0;
        assert!(dto.validate().is_err());

        dto.rating = 6;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn paginated_response_computes_total_pages() {
        let resp = PaginatedResponse::new(vec![1, 2, 3], 25, 1, 10);
        assert_eq!(resp.total_pages, 3);
    }
}

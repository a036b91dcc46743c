pub mod error;
pub mod job_service;
pub mod notification_service;
pub mod review_service;
pub mod stripe_service;

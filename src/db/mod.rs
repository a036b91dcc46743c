pub mod catalogdb;
pub mod chatdb;
pub mod db;
pub mod disputedb;
pub mod jobdb;
pub mod notificationdb;
pub mod providerdb;
pub mod reviewdb;
pub mod userdb;

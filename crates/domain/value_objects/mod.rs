pub mod enums;
pub mod statement_notifications;

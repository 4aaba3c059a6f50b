pub mod bidding;
pub mod catalog;
pub mod export_service;
pub mod inventory;
pub mod receipt_service;
pub mod report_service;
pub mod reservation_code;

pub mod bid_queries;
pub mod cart_queries;
pub mod comment_queries;
pub mod order_queries;
pub mod products_queries;
pub mod report_queries;
pub mod reservation_queries;

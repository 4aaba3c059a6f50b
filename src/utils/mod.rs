pub mod extractors;
pub mod filters;
pub mod jwt;
pub mod request;

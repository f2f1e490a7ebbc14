pub mod dtos;
pub mod extractors;
pub mod handlers;
pub mod render;
pub mod router;

pub mod admin;
pub mod asset;
pub mod event;
pub mod registration;
pub mod session;

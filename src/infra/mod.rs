pub mod assets;
pub mod factory;
pub mod repositories;
pub mod session;

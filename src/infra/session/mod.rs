pub mod memory_session_store;

pub mod admin;
pub mod allocator;
pub mod auth;
pub mod lookup;
pub mod manager;

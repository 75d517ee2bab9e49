pub mod access;
pub mod auth;
pub mod crud;
pub mod dashboard;
pub mod planning;
pub mod settings;

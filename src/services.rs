pub mod access_service;
pub mod auth;
pub mod crud_service;
pub mod dashboard_service;
pub mod gantt;
pub mod planning_service;

pub mod memory_table;
pub use memory_table::{CrudRepository, MemoryTable};
pub mod planning_repo;
pub use planning_repo::PlanningRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod seed;

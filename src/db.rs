pub mod batch_repo;
pub use batch_repo::BatchRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;

pub mod batches;
pub mod dashboard;
pub mod reports;
pub mod settings;

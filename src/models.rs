pub mod batch;
pub mod dashboard;
pub mod report;
pub mod settings;

pub mod aggregation;
pub mod batch_service;
pub mod dashboard_service;
pub mod export_service;
pub mod presentation;
pub mod report_service;
pub mod settings_service;

pub mod alert;
pub mod config;
pub mod floods;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod severity;
pub mod stations;
pub mod views;

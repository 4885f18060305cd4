pub mod flood_service;
pub mod geocode;

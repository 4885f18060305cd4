pub mod priority;
pub mod stalenesses;
pub mod target_area;
pub mod thresholds;

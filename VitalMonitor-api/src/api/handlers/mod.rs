pub mod health;
pub mod vitals;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use health::health_check;
pub use vitals::{check_vitals, evaluate_vitals, get_thresholds};

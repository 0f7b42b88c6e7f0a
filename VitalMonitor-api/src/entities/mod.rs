// Public entities for the VitalMonitor API
// This module contains data structures that are shared across the application boundary

// Vital sign request and response payloads
pub mod vitals;

// Common entities for error handling
pub mod common;

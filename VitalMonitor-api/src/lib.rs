// VitalMonitor-api lib.rs
//
// This is the main library file for the VitalMonitor API.
// It re-exports the APIs from the various modules.

// Public modules
pub mod api;
pub mod entities;
pub mod openapi;

//! HR onboarding — employee onboarding wizard service.

pub mod api;
pub mod config;
pub mod error;
pub mod onboarding;

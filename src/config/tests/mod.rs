//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `operation_mode`: Operation mode determination tests
//! - `field_resolution`: Server URL, credentials, and desk settings
//! - `environment_loading`: Loading through the environment and CLI
//! - `validation`: Configuration consistency validation tests

mod helpers;

// Library exports for both binaries and the integration tests
pub mod config;
pub mod constants;
pub mod converter;
pub mod favicon;
pub mod render;
pub mod resizer;

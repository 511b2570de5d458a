pub mod composite_result;
pub mod config;
pub mod error;
pub mod frame;
pub mod state;

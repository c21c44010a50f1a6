pub mod config;
pub mod convert;
pub mod log;
pub mod string;

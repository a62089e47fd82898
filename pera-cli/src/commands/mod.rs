pub mod config;
pub mod manufacturer;
pub mod providers;
pub mod scanner;

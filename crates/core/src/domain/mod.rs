pub mod board;
pub mod competitor;
pub mod config;
pub mod financial;
pub mod media;
pub mod pitch;
pub mod research;
pub mod risk;
pub mod strategy;

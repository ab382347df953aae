pub mod chart;
pub mod clock;
pub mod commands;
pub mod config;
pub mod data;
pub mod harvest;
pub mod menu;
pub mod report;

pub mod cluster;
pub mod commands;
pub mod tutorial;

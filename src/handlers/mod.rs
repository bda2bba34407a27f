pub mod commands;
pub mod orders;

pub mod check_color;
pub mod config;
pub mod simulate;

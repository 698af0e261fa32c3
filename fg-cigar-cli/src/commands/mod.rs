pub mod clip;
pub mod command;
pub mod window;

pub mod config;
pub mod engine;
pub mod menubar;
pub mod player;
pub mod renderer;
pub mod types;

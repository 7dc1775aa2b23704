pub mod config;
pub mod editor;
pub mod languages;
pub mod piston;
pub mod prefs;
pub mod session;

// Installer phases, one module each.

pub mod catalog;
pub mod dependencies;
pub mod font_cache;
pub mod font_installer;
pub mod menu;
pub mod selection;
pub mod utilities;

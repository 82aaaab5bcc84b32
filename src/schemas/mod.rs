// Data shapes shared across the installer: font names and results, user settings,
// and resolution of on-disk locations.

pub mod fonts;
pub mod path_resolver;
pub mod settings;

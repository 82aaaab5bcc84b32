// This is the main module file for the `utilities` directory.
// It declares the low-level helpers the installer phases are built on.

// HTTP agents and the release download source.
pub mod assets;
// Archive extraction backends.
pub mod compression;
// Scratch and target directory handling.
pub mod file_operations;
// Distribution detection and package manager commands.
pub mod platform;

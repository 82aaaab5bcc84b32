// Register application commands.
// The installer has a single interactive workflow; it lives in `install`.

// Orchestrates dependency checks, catalog fetch, selection and installation.
pub mod install;

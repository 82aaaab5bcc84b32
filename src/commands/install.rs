// This file contains the interactive install workflow: the single thing the
// binary does.
//
// Phases, in order: dependencies -> directories -> catalog -> menu -> selection ->
// installer loop -> cache refresh -> summary. Fatal errors (setup, fetch) end the run
// with an error; a selection that ends with end-of-input finishes normally with
// nothing installed.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use colored::Colorize;
use prettytable::{Cell, Row, Table};

use crate::libs::utilities::assets::HttpReleaseSource;
use crate::libs::utilities::compression::extractor_for;
use crate::libs::utilities::file_operations::{create_scratch_dir, ensure_dir};
use crate::libs::utilities::platform::OS_RELEASE_PATH;
use crate::libs::{catalog, dependencies, font_cache, menu, selection};
use crate::libs::font_installer::Installer;
use crate::schemas::fonts::{FontCatalog, InstallOutcome, InstallReport};
use crate::schemas::path_resolver::{InstallPaths, PathResolver};
use crate::schemas::settings::InstallerSettings;
use crate::{log_debug, log_error, log_info};

/// Scratch directory of the current run, for the interrupt handler.
static ACTIVE_SCRATCH_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Options coming from the command line.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub config: Option<String>,
    pub assume_yes: bool,
}

/// State carried between phases of one run.
pub struct RunContext {
    pub settings: InstallerSettings,
    pub paths: InstallPaths,
    pub catalog: FontCatalog,
    pub report: InstallReport,
}

/// Entry point for the interactive installer.
pub fn run(options: InstallOptions) -> Result<()> {
    log_debug!("Entered install::run() with {:?}", options);
    println!("{}", "🚀 Nerd Fonts Installer".green());
    println!("════════════════════════\n");

    // Init -> DependenciesChecked
    dependencies::ensure_dependencies(Path::new(OS_RELEASE_PATH), options.assume_yes)?;

    let resolver = PathResolver::new(options.config)?;
    let settings = resolver.load_settings()?;
    let paths = resolver.install_paths(&settings);
    ensure_dir(&paths.fonts_dir)?;

    // DependenciesChecked -> CatalogFetched
    let catalog = catalog::fetch_catalog(&settings)?;

    let mut ctx = RunContext {
        settings,
        paths,
        catalog,
        report: InstallReport::default(),
    };

    // CatalogFetched -> AwaitingSelection
    menu::display_menu(ctx.catalog.names(), ctx.settings.use_pager)
        .context("failed to display the font menu")?;

    let Some(indices) = read_selection(&ctx)? else {
        // End of input: nothing selected, still a normal finish.
        log_info!("No fonts were selected.");
        return Ok(());
    };

    // AwaitingSelection -> Installing
    let names = selected_names(&ctx.catalog, &indices);
    install_selected(&mut ctx, &names)?;

    // Installing -> Done
    let refresh =
        font_cache::refresh_if_installed(ctx.report.installed_count(), ctx.settings.refresh_cache);
    log_debug!("[Cache] Refresh result: {:?}", refresh);
    print_summary(&ctx.report);
    Ok(())
}

fn read_selection(ctx: &RunContext) -> Result<Option<Vec<usize>>> {
    let input = selection::open_selection_input();
    let indices = selection::prompt_selection(
        input,
        io::stdout(),
        ctx.catalog.len(),
        ctx.settings.max_fonts,
    )
    .context("failed to read the font selection")?;
    Ok(indices)
}

/// Resolves indices to names, dropping repeated picks (first occurrence wins).
pub fn selected_names(catalog: &FontCatalog, indices: &[usize]) -> Vec<String> {
    let unique = selection::dedup_preserving_order(indices);
    if unique.len() != indices.len() {
        log_debug!(
            "[Selection] Ignoring {} repeated selection(s)",
            indices.len() - unique.len()
        );
    }
    unique
        .into_iter()
        .filter_map(|i| catalog.get(i).map(str::to_string))
        .collect()
}

fn install_selected(ctx: &mut RunContext, names: &[String]) -> Result<()> {
    let scratch = create_scratch_dir(&ctx.paths.scratch_root)?;
    register_scratch_dir(Some(scratch.path().to_path_buf()));

    let source = HttpReleaseSource::new(&ctx.settings);
    let extractor = extractor_for(ctx.settings.extractor);
    let installer = Installer {
        source: &source,
        extractor: extractor.as_ref(),
        scratch_dir: scratch.path(),
        fonts_dir: &ctx.paths.fonts_dir,
    };
    ctx.report = installer.install_all(names);

    register_scratch_dir(None);
    if let Err(e) = scratch.close() {
        log_debug!("[Installer] Scratch directory cleanup failed: {}", e);
    }
    Ok(())
}

fn register_scratch_dir(path: Option<PathBuf>) {
    if let Ok(mut slot) = ACTIVE_SCRATCH_DIR.lock() {
        *slot = path;
    }
}

/// Best-effort removal of the active scratch directory. Called from the
/// interrupt handler; never panics.
pub fn cleanup_active_scratch_dir() {
    let path = match ACTIVE_SCRATCH_DIR.try_lock() {
        Ok(mut slot) => slot.take(),
        Err(_) => None,
    };
    if let Some(path) = path {
        let _ = std::fs::remove_dir_all(&path);
    }
}

fn print_summary(report: &InstallReport) {
    if report.is_empty() {
        return;
    }

    summary_table(report).printstd();

    let installed = report.installed_count();
    if installed > 0 {
        println!(
            "{}",
            format!("\n🎉 Successfully installed {installed} fonts!").green()
        );
    } else {
        log_error!("No fonts were installed.");
    }
}

/// One row per processed font with its outcome.
pub fn summary_table(report: &InstallReport) -> Table {
    let mut table = Table::new();
    table.set_titles(Row::new(vec![
        Cell::new("Font").style_spec("b"),
        Cell::new("Result").style_spec("b"),
    ]));
    for (name, outcome) in report.entries() {
        let style = match outcome {
            InstallOutcome::Installed => "Fg",
            InstallOutcome::NotFound => "Fy",
            InstallOutcome::DownloadFailed | InstallOutcome::ExtractFailed => "Fr",
        };
        table.add_row(Row::new(vec![
            Cell::new(name),
            Cell::new(&outcome.to_string()).style_spec(style),
        ]));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FontCatalog {
        FontCatalog::new(vec![
            "Go-Mono".to_string(),
            "FiraCode".to_string(),
            "Hack".to_string(),
        ])
    }

    #[test]
    fn selection_one_and_three_picks_go_mono_and_hack() {
        let indices = selection::parse_selection("1 3", 3, 100).unwrap();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(selected_names(&catalog(), &indices), vec!["Go-Mono", "Hack"]);
    }

    #[test]
    fn repeated_indices_are_installed_once() {
        assert_eq!(
            selected_names(&catalog(), &[2, 2, 0, 2]),
            vec!["Hack", "Go-Mono"]
        );
    }

    #[test]
    fn summary_has_a_row_per_font() {
        let mut report = InstallReport::default();
        report.record("Go-Mono", InstallOutcome::Installed);
        report.record("Hack", InstallOutcome::NotFound);

        let table = summary_table(&report);
        assert_eq!(table.len(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("Go-Mono"));
        assert!(rendered.contains("not found"));
    }

    #[test]
    fn cleanup_without_active_scratch_is_a_no_op() {
        cleanup_active_scratch_dir();
    }

    #[test]
    fn cleanup_removes_registered_scratch_dir() {
        let root = tempfile::tempdir().unwrap();
        let scratch = root.path().join("run-test");
        std::fs::create_dir(&scratch).unwrap();
        std::fs::write(scratch.join("Hack.zip"), b"partial").unwrap();

        register_scratch_dir(Some(scratch.clone()));
        cleanup_active_scratch_dir();

        assert!(!scratch.exists());
    }
}

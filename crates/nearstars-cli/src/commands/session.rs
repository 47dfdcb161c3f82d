//! Session command handler.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use nearstars_cli::script::run_script;
use nearstars_cli::terminal::ColorPalette;
use nearstars_lib::Session;

use super::load_catalog;
use crate::GlobalOptions;

/// Run session commands from `script`, or from stdin when absent.
pub fn handle_session(global: &GlobalOptions, script: Option<&Path>) -> Result<()> {
    let catalog = Arc::new(load_catalog(global)?);
    let mut session = Session::with_max_distance(catalog, global.max_distance);
    let palette = ColorPalette::detect();
    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();

    let stats = match script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open session script {}", path.display()))?;
            run_script(
                &mut session,
                BufReader::new(file),
                &mut out,
                &mut err,
                global.format,
                &palette,
            )?
        }
        None => run_script(
            &mut session,
            io::stdin().lock(),
            &mut out,
            &mut err,
            global.format,
            &palette,
        )?,
    };

    info!(
        executed = stats.executed,
        failed = stats.failed,
        "session finished"
    );
    Ok(())
}

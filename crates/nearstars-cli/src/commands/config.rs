//! Config command handler.

use anyhow::Result;

use nearstars_cli::output::OutputFormat;
use nearstars_lib::{resolve_catalog_path, LaunchOptions};

use crate::GlobalOptions;

/// Build launch options from the command line.
///
/// The catalog path is resolved when possible; an unresolvable path is
/// reported as given rather than failing.
pub fn launch_options(global: &GlobalOptions) -> LaunchOptions {
    let catalog = resolve_catalog_path(global.catalog.as_deref())
        .ok()
        .or_else(|| global.catalog.clone());
    LaunchOptions {
        catalog,
        max_distance: global.max_distance,
        port: global.port,
        fullscreen: global.fullscreen,
        show_solar_system: !global.no_solar_system,
    }
}

/// Print the resolved launch options.
pub fn handle_config(global: &GlobalOptions) -> Result<()> {
    let options = launch_options(global);
    match global.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
        OutputFormat::Text | OutputFormat::Basic => {
            let catalog = options
                .catalog
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<unresolved>".to_string());
            println!("catalog: {catalog}");
            println!("max_distance: {}", options.max_distance);
            println!("port: {}", options.port);
            println!("fullscreen: {}", options.fullscreen);
            println!("show_solar_system: {}", options.show_solar_system);
        }
    }
    Ok(())
}

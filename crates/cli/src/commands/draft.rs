//! Draft inspection and removal.

use std::error::Error;

use pasarela_wizard::{DraftStore, FileDraftStore, WizardConfig};

/// Print the stored draft as pretty JSON.
pub fn show() -> Result<(), Box<dyn Error>> {
    let config = WizardConfig::from_env()?;
    let store = FileDraftStore::new(config.draft_path);

    match store.load()? {
        Some(snapshot) => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        None => println!("No hay ningún borrador guardado."),
    }

    Ok(())
}

/// Remove the stored draft.
pub fn clear() -> Result<(), Box<dyn Error>> {
    let config = WizardConfig::from_env()?;
    let store = FileDraftStore::new(config.draft_path);

    store.clear()?;
    println!("Borrador eliminado.");
    tracing::info!("draft cleared from the command line");

    Ok(())
}

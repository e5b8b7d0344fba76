//! Settings persistence
//!
//! Loads and saves the baud rate / display mode pair in flash.

use defmt::*;

use i2cu_core::{Settings, SettingsError, SettingsStore};
use i2cu_hal_rp2040::flash::Rp2040FlashStorage;

pub type Store = SettingsStore<Rp2040FlashStorage<'static>>;

/// Load settings from flash
///
/// Falls back to the defaults if the stored value cannot be read or
/// decoded. A missing entry is already mapped to the defaults by the store.
pub async fn load_settings(store: &mut Store) -> Settings {
    match store.load().await {
        Ok(settings) => {
            info!(
                "Settings: {} baud, {} mode",
                settings.baud_rate().bps(),
                settings.mode().label()
            );
            settings
        }
        Err(e) => {
            warn!("Failed to load settings: {:?}, using defaults", e);
            Settings::default()
        }
    }
}

/// Save settings to flash
pub async fn save_settings(store: &mut Store, settings: &Settings) -> Result<(), SettingsError> {
    store.save(settings).await?;
    debug!(
        "Saved settings: baud index {}, binary {}",
        settings.baud_index, settings.binary_mode
    );
    Ok(())
}

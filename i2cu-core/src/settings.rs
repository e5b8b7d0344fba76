//! Persisted probe settings
//!
//! Two values survive a power cycle: the serial baud rate (as an index into
//! [`BAUD_RATES`]) and whether serial data is shown as hex. They are stored
//! postcard-encoded in that field order, with no header or version.

use i2cu_hal::flash::{FlashError, FlashStorage, StorageKey};
use serde::{Deserialize, Serialize};

/// Selectable baud rates, in cycle order
pub const BAUD_RATES: [u32; 4] = [115_200, 19_200, 9_600, 2_400];

/// Upper bound on the encoded settings size
pub const MAX_SETTINGS_SIZE: usize = 8;

/// How serial bytes are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialMode {
    /// Printable ASCII, everything else as `.`
    Text,
    /// Two-digit hex groups
    Binary,
}

impl SerialMode {
    /// Short label shown in the mode overlay
    pub fn label(self) -> &'static str {
        match self {
            SerialMode::Text => "txt",
            SerialMode::Binary => "bin",
        }
    }
}

/// One entry of [`BAUD_RATES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudRate(u8);

impl BaudRate {
    /// Baud rate at `index`, or `None` if out of range
    pub fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < BAUD_RATES.len() {
            Some(Self(index))
        } else {
            None
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Rate in bits per second
    pub fn bps(self) -> u32 {
        BAUD_RATES[self.0 as usize]
    }

    /// Next rate in cycle order, wrapping to the first
    pub fn next(self) -> Self {
        Self((self.0 + 1) % BAUD_RATES.len() as u8)
    }
}

impl Default for BaudRate {
    fn default() -> Self {
        Self(0)
    }
}

/// The persisted settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Index into [`BAUD_RATES`]
    pub baud_index: u8,
    /// Render serial data as hex
    pub binary_mode: bool,
}

impl Settings {
    pub fn new(baud: BaudRate, mode: SerialMode) -> Self {
        Self {
            baud_index: baud.index(),
            binary_mode: mode == SerialMode::Binary,
        }
    }

    /// Active baud rate; an out-of-range index falls back to the first rate
    pub fn baud_rate(&self) -> BaudRate {
        BaudRate::from_index(self.baud_index).unwrap_or_default()
    }

    pub fn mode(&self) -> SerialMode {
        if self.binary_mode {
            SerialMode::Binary
        } else {
            SerialMode::Text
        }
    }

    /// Step to the next baud rate and return it
    pub fn advance_baud(&mut self) -> BaudRate {
        let next = self.baud_rate().next();
        self.baud_index = next.index();
        next
    }

    /// Flip the mode once per odd click count and return the result
    pub fn toggle_mode(&mut self, clicks: u8) -> SerialMode {
        self.binary_mode ^= clicks & 1 == 1;
        self.mode()
    }

    pub fn is_valid(&self) -> bool {
        BaudRate::from_index(self.baud_index).is_some()
    }

    /// Serialize into `buf`, returning the used prefix
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a [u8], SettingsError> {
        postcard::to_slice(self, buf)
            .map(|bytes| &*bytes)
            .map_err(|_| SettingsError::Serialize)
    }

    /// Deserialize and validate
    pub fn decode(bytes: &[u8]) -> Result<Self, SettingsError> {
        let settings: Settings =
            postcard::from_bytes(bytes).map_err(|_| SettingsError::Deserialize)?;
        if !settings.is_valid() {
            return Err(SettingsError::InvalidBaudIndex(settings.baud_index));
        }
        Ok(settings)
    }
}

/// Settings persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Flash operation failed
    Flash(FlashError),
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Stored baud index is outside the table
    InvalidBaudIndex(u8),
}

impl From<FlashError> for SettingsError {
    fn from(e: FlashError) -> Self {
        SettingsError::Flash(e)
    }
}

/// Loads and saves [`Settings`] under [`StorageKey::ProbeSettings`]
pub struct SettingsStore<F: FlashStorage> {
    flash: F,
}

impl<F: FlashStorage> SettingsStore<F> {
    pub fn new(flash: F) -> Self {
        Self { flash }
    }

    /// Load stored settings
    ///
    /// A missing entry is not an error: first boot gets the defaults.
    pub async fn load(&mut self) -> Result<Settings, SettingsError> {
        let mut buffer = [0u8; MAX_SETTINGS_SIZE];
        let len = match self
            .flash
            .read(StorageKey::ProbeSettings, &mut buffer)
            .await
        {
            Ok(len) => len,
            Err(FlashError::NotFound) => return Ok(Settings::default()),
            Err(e) => return Err(e.into()),
        };
        Settings::decode(&buffer[..len])
    }

    /// Store `settings`, replacing any previous value
    pub async fn save(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        let mut buffer = [0u8; MAX_SETTINGS_SIZE];
        let bytes = settings.encode(&mut buffer)?;
        self.flash.write(StorageKey::ProbeSettings, bytes).await?;
        Ok(())
    }
}

//! Probe screen interface

use i2cu_hal::panel::PanelTransport;

/// Where the probe text came from; the view colors it accordingly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeSource {
    /// Address list from the bus scanner
    Bus,
    /// Bytes from the monitored serial line
    Serial,
}

/// Screen the probe loop renders into
///
/// Setters only record state. Nothing reaches the panel until
/// [`refresh`](ProbeView::refresh) is called, and a refresh may push only
/// part of the pending changes if the display link is still busy.
pub trait ProbeView {
    /// Error type for refresh operations
    type Error;

    /// Command channel of the panel behind this view
    type Panel: PanelTransport;

    /// Replace the probe text and make it visible
    fn set_probe_text(&mut self, text: &str, source: ProbeSource);

    /// Show a two-line status message over the probe text
    fn show_overlay(&mut self, title: &str, value: &str);

    /// Remove the status message
    fn hide_overlay(&mut self);

    /// Push pending changes to the panel
    fn refresh(&mut self) -> Result<(), Self::Error>;

    /// Panel command channel, for sleep and wake
    fn panel(&mut self) -> &mut Self::Panel;
}

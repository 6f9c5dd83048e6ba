//! Events that drive storage bring-up

/// Outcome of one bring-up step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Block device constructed, configuration starting
    Begin,
    /// Block device accepted its configuration
    DeviceConfigured,
    /// Block device rejected its configuration
    DeviceRejected,
    /// Filesystem accepted its configuration
    FilesystemConfigured,
    /// Filesystem rejected its configuration
    FilesystemRejected,
    /// Control handed to the console
    ConsoleStarted,
}

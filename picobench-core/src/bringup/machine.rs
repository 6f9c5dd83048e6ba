//! Bring-up stages
//!
//! Configuration strictly precedes use: the filesystem is only configured
//! over a device that configured successfully, and the console only runs
//! over a configured filesystem. A fault is final.

use super::events::Event;

/// Where bring-up has got to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    /// Nothing attempted yet
    Unconfigured,
    /// Block device constructed, configuration in progress
    DeviceConfiguring,
    /// Block device configured
    DeviceReady,
    /// Filesystem configured over the device
    FilesystemReady,
    /// Console owns the storage stack
    ConsoleRunning,
    /// A configuration step failed
    Faulted(FaultKind),
}

/// Which step failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    Device,
    Filesystem,
}

impl Stage {
    /// Check if this is the fault stage
    pub fn is_faulted(&self) -> bool {
        matches!(self, Stage::Faulted(_))
    }

    /// Process an event and return the next stage
    ///
    /// Events that do not apply to the current stage leave it unchanged.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use Stage::*;

        match (self, event) {
            // Faulted is absorbing
            (Faulted(kind), _) => Faulted(kind),

            (Unconfigured, Begin) => DeviceConfiguring,

            (DeviceConfiguring, DeviceConfigured) => DeviceReady,
            (DeviceConfiguring, DeviceRejected) => Faulted(FaultKind::Device),

            (DeviceReady, FilesystemConfigured) => FilesystemReady,
            (DeviceReady, FilesystemRejected) => Faulted(FaultKind::Filesystem),

            (FilesystemReady, ConsoleStarted) => ConsoleRunning,

            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_EVENTS: [Event; 6] = [
        Event::Begin,
        Event::DeviceConfigured,
        Event::DeviceRejected,
        Event::FilesystemConfigured,
        Event::FilesystemRejected,
        Event::ConsoleStarted,
    ];

    #[test]
    fn test_happy_path() {
        let stage = Stage::Unconfigured
            .transition(Event::Begin)
            .transition(Event::DeviceConfigured)
            .transition(Event::FilesystemConfigured)
            .transition(Event::ConsoleStarted);
        assert_eq!(stage, Stage::ConsoleRunning);
    }

    #[test]
    fn test_device_rejection_faults() {
        let stage = Stage::DeviceConfiguring.transition(Event::DeviceRejected);
        assert_eq!(stage, Stage::Faulted(FaultKind::Device));
    }

    #[test]
    fn test_faulted_is_absorbing() {
        for kind in [FaultKind::Device, FaultKind::Filesystem] {
            for event in ALL_EVENTS {
                let stage = Stage::Faulted(kind).transition(event);
                assert_eq!(stage, Stage::Faulted(kind));
            }
        }
    }

    #[test]
    fn test_filesystem_needs_ready_device() {
        for stage in [Stage::Unconfigured, Stage::DeviceConfiguring] {
            assert_eq!(stage.transition(Event::FilesystemConfigured), stage);
        }
    }

    #[test]
    fn test_console_needs_filesystem() {
        for stage in [Stage::Unconfigured, Stage::DeviceConfiguring, Stage::DeviceReady] {
            assert_eq!(stage.transition(Event::ConsoleStarted), stage);
        }
    }
}

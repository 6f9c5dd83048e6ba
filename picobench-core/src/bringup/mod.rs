//! Storage bring-up
//!
//! The console program configures its storage stack in a fixed order:
//! block device, then filesystem over it, then the console over both.
//! Any configuration failure parks the program in `Stage::Faulted`,
//! from which the firmware only reports.

pub mod events;
pub mod fault;
pub mod machine;

use core::fmt;

pub use events::Event;
pub use fault::{FaultReporter, REPORT_INTERVAL_MS};
pub use machine::{FaultKind, Stage};

use crate::storage::{Configure, FsConfig};

/// Why bring-up stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault<D, F> {
    /// Block device rejected its configuration
    Device(D),
    /// Filesystem rejected its configuration
    Filesystem(F),
    /// Bring-up was attempted from a stage other than `Unconfigured`
    OutOfOrder(Stage),
}

impl<D, F> Fault<D, F> {
    pub fn kind(&self) -> Option<FaultKind> {
        match self {
            Fault::Device(_) => Some(FaultKind::Device),
            Fault::Filesystem(_) => Some(FaultKind::Filesystem),
            Fault::OutOfOrder(_) => None,
        }
    }
}

impl<D: fmt::Display, F: fmt::Display> fmt::Display for Fault<D, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Device(e) => write!(f, "Config was not valid: {}", e),
            Fault::Filesystem(e) => write!(f, "Filesystem config was not valid: {}", e),
            Fault::OutOfOrder(stage) => write!(f, "bring-up attempted from {:?}", stage),
        }
    }
}

/// Drives the bring-up stages
#[derive(Debug)]
pub struct Sequencer {
    stage: Stage,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    pub fn new() -> Self {
        Self {
            stage: Stage::Unconfigured,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, event: Event) {
        self.stage = self.stage.transition(event);
    }

    /// Configure `device` with its default identification options, then
    /// build and configure a filesystem over it
    ///
    /// `build_fs` is only called once the device has configured
    /// successfully. The filesystem is always configured with the fixed
    /// 512-byte sector size.
    pub fn bring_up<'a, D, F>(
        &mut self,
        device: &'a mut D,
        build_fs: impl FnOnce(&'a D) -> F,
    ) -> Result<(&'a D, F), Fault<D::Error, F::Error>>
    where
        D: Configure,
        F: Configure<Config = FsConfig>,
    {
        if self.stage != Stage::Unconfigured {
            return Err(Fault::OutOfOrder(self.stage));
        }
        self.advance(Event::Begin);

        if let Err(e) = device.configure(&D::Config::default()) {
            self.advance(Event::DeviceRejected);
            return Err(Fault::Device(e));
        }
        self.advance(Event::DeviceConfigured);

        let device: &'a D = device;
        let mut fs = build_fs(device);
        if let Err(e) = fs.configure(&FsConfig::default()) {
            self.advance(Event::FilesystemRejected);
            return Err(Fault::Filesystem(e));
        }
        self.advance(Event::FilesystemConfigured);

        Ok((device, fs))
    }

    /// Record that the console has taken over
    pub fn console_started(&mut self) {
        self.advance(Event::ConsoleStarted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[derive(Debug, Default)]
    struct MockDevice {
        fail_with: Option<&'static str>,
        configured: bool,
    }

    #[derive(Default)]
    struct Ident;

    impl Configure for MockDevice {
        type Config = Ident;
        type Error = &'static str;

        fn configure(&mut self, _config: &Ident) -> Result<(), Self::Error> {
            match self.fail_with {
                Some(e) => Err(e),
                None => {
                    self.configured = true;
                    Ok(())
                }
            }
        }
    }

    #[derive(Debug)]
    struct MockFs {
        device_was_configured: bool,
        sector_size: Option<usize>,
        reject: bool,
    }

    impl Configure for MockFs {
        type Config = FsConfig;
        type Error = &'static str;

        fn configure(&mut self, config: &FsConfig) -> Result<(), Self::Error> {
            self.sector_size = Some(config.sector_size);
            if self.reject {
                Err("sector size mismatch")
            } else {
                Ok(())
            }
        }
    }

    fn mock_fs(device: &MockDevice, reject: bool) -> MockFs {
        MockFs {
            device_was_configured: device.configured,
            sector_size: None,
            reject,
        }
    }

    #[test]
    fn test_successful_bring_up() {
        let mut seq = Sequencer::new();
        let mut device = MockDevice::default();

        let (_, fs) = seq.bring_up(&mut device, |d| mock_fs(d, false)).unwrap();

        assert!(fs.device_was_configured);
        assert_eq!(fs.sector_size, Some(512));
        assert_eq!(seq.stage(), Stage::FilesystemReady);

        seq.console_started();
        assert_eq!(seq.stage(), Stage::ConsoleRunning);
    }

    #[test]
    fn test_device_failure_skips_filesystem() {
        let mut seq = Sequencer::new();
        let mut device = MockDevice {
            fail_with: Some("CRC mismatch"),
            ..Default::default()
        };
        let built = Cell::new(false);

        let err = seq
            .bring_up(&mut device, |d| {
                built.set(true);
                mock_fs(d, false)
            })
            .unwrap_err();

        assert!(!built.get());
        assert_eq!(err, Fault::Device("CRC mismatch"));
        assert_eq!(err.kind(), Some(FaultKind::Device));
        assert_eq!(seq.stage(), Stage::Faulted(FaultKind::Device));
        assert_eq!(err.to_string(), "Config was not valid: CRC mismatch");
    }

    #[test]
    fn test_console_never_starts_after_fault() {
        let mut seq = Sequencer::new();
        let mut device = MockDevice {
            fail_with: Some("no response"),
            ..Default::default()
        };
        let _ = seq.bring_up(&mut device, |d| mock_fs(d, false));

        seq.console_started();
        assert!(seq.stage().is_faulted());
    }

    #[test]
    fn test_filesystem_failure() {
        let mut seq = Sequencer::new();
        let mut device = MockDevice::default();

        let err = seq.bring_up(&mut device, |d| mock_fs(d, true)).unwrap_err();

        assert_eq!(seq.stage(), Stage::Faulted(FaultKind::Filesystem));
        assert_eq!(
            err.to_string(),
            "Filesystem config was not valid: sector size mismatch"
        );
    }

    #[test]
    fn test_second_bring_up_refused() {
        let mut seq = Sequencer::new();
        let mut device = MockDevice::default();
        assert!(seq.bring_up(&mut device, |d| mock_fs(d, false)).is_ok());

        let mut device = MockDevice::default();
        let err = seq
            .bring_up(&mut device, |d| mock_fs(d, false))
            .unwrap_err();
        assert_eq!(err, Fault::OutOfOrder(Stage::FilesystemReady));
        assert!(!device.configured);
    }
}

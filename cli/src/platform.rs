//! Platform detection: operating system and privilege level.
use std::fmt;

use crate::exec;

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux and other Unix-like systems.
    Linux,
    /// Microsoft Windows.
    Windows,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// Platform information for the current process.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Operating system family.
    pub os: Os,
    /// Whether the process runs with administrator/root privileges.
    pub elevated: bool,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        let os = Self::detect_os();
        Self {
            os,
            elevated: os == Os::Linux && Self::detect_root(),
        }
    }

    /// Create a platform with explicit values.
    #[must_use]
    pub const fn new(os: Os, elevated: bool) -> Self {
        Self { os, elevated }
    }

    /// Name of the environment variable holding the home directory.
    #[must_use]
    pub const fn home_var(&self) -> &'static str {
        match self.os {
            Os::Linux => "HOME",
            Os::Windows => "USERPROFILE",
        }
    }

    fn detect_os() -> Os {
        if cfg!(target_os = "windows") {
            Os::Windows
        } else {
            // Default to Linux for other Unix-like systems
            Os::Linux
        }
    }

    /// `id -u` prints `0` for root.  Anything unexpected counts as unprivileged.
    fn detect_root() -> bool {
        exec::run_unchecked("id", &["-u"])
            .is_ok_and(|r| r.success && r.stdout.trim() == "0")
    }
}

//! Platform tag mapping: which CI build matches this machine.

use std::fmt;
use std::str::FromStr;

/// Build flavor produced by CI; appears as the last part of artifact names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformTag {
    MacOs,
    Windows,
    Linux,
}

impl PlatformTag {
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformTag::MacOs => "macOS",
            PlatformTag::Windows => "Windows",
            PlatformTag::Linux => "Linux",
        }
    }

    /// Tag for an (OS, arch) pair as named by `std::env::consts`.
    /// None means no build exists for that platform.
    pub fn for_platform(os: &str, arch: &str) -> Option<Self> {
        match (os, arch) {
            ("macos", "x86_64" | "aarch64") => Some(PlatformTag::MacOs),
            ("windows", "x86_64" | "x86") => Some(PlatformTag::Windows),
            ("linux", "x86_64") => Some(PlatformTag::Linux),
            _ => None,
        }
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "macos" => Ok(PlatformTag::MacOs),
            "windows" => Ok(PlatformTag::Windows),
            "linux" => Ok(PlatformTag::Linux),
            _ => Err(format!("unknown platform tag: {s}")),
        }
    }
}

/// OS/arch pair the resolver maps to a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn tag(&self) -> Option<PlatformTag> {
        PlatformTag::for_platform(&self.os, &self.arch)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

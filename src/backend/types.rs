use std::fmt;

use crate::error::AppError;

// --- Preset Types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    WindowsOptimized,
    WindowsDisguised,
    LinuxOptimized,
    LinuxDisguised,
}

impl Preset {
    pub const ALL: &[Preset] = &[
        Preset::WindowsOptimized,
        Preset::WindowsDisguised,
        Preset::LinuxOptimized,
        Preset::LinuxDisguised,
    ];

    /// Presets are selected by a 1-based ordinal on the command line.
    pub fn from_ordinal(ordinal: &str) -> Result<Self, AppError> {
        let index: usize = ordinal.trim().parse().map_err(|_| {
            AppError::InvalidArgument(format!("preset must be a number, got '{ordinal}'"))
        })?;
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
            .ok_or_else(|| {
                AppError::InvalidArgument(format!(
                    "preset must be between 1 and {}, got {index}",
                    Self::ALL.len()
                ))
            })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Preset::WindowsOptimized => "WindowsOptimized",
            Preset::WindowsDisguised => "WindowsDisguised",
            Preset::LinuxOptimized => "LinuxOptimized",
            Preset::LinuxDisguised => "LinuxDisguised",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// --- CPU Types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuVendor {
    Amd,
    Other,
}

impl CpuVendor {
    pub fn from_str(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("amd") {
            CpuVendor::Amd
        } else {
            CpuVendor::Other
        }
    }

    /// CPUID vendor string advertised through the Hyper-V enlightenments.
    pub fn cpuid_vendor(&self) -> &'static str {
        match self {
            CpuVendor::Amd => "AuthenticAMD",
            CpuVendor::Other => "GenuineIntel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuTopology {
    pub sockets: u32,
    pub dies: u32,
    pub clusters: u32,
    pub cores: u32,
    pub threads: u32,
    pub requires_topoext: bool,
}

// --- CPU Pinning Types ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcpuPin {
    pub vcpu: u32,
    pub cpuset: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuTune {
    pub vcpu_pins: Vec<VcpuPin>,
    pub emulatorpin: Option<String>,
}

impl CpuTune {
    /// Pins guest vCPU `i` to `cpus[i]`, stopping at whichever runs out first.
    pub fn from_affinity(vcpus: u32, cpus: &[String], emulatorpin: &str) -> Self {
        let vcpu_pins = cpus
            .iter()
            .take(vcpus as usize)
            .enumerate()
            .map(|(vcpu, cpuset)| VcpuPin {
                vcpu: vcpu as u32,
                cpuset: cpuset.clone(),
            })
            .collect();
        CpuTune {
            vcpu_pins,
            emulatorpin: Some(emulatorpin.to_string()),
        }
    }
}

// --- Storage Types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StorageBus {
    #[default]
    Nvme,
    Scsi,
}

impl StorageBus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBus::Nvme => "nvme",
            StorageBus::Scsi => "scsi",
        }
    }
}

impl fmt::Display for StorageBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synthesized (vendor, model, serial) for one disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub vendor: String,
    pub model: String,
    pub serial: String,
}

// --- Invocation Types ---

#[derive(Debug, Clone)]
pub struct TuneOptions {
    pub cpus: Vec<String>,
    pub emulator_cpuset: String,
    pub cpu_vendor: CpuVendor,
    pub laptop: bool,
    pub preset: Preset,
    pub storage: StorageBus,
    pub acpi_table: String,
}

impl TuneOptions {
    pub fn parse_cpu_list(list: &str) -> Result<Vec<String>, AppError> {
        let cpus: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if cpus.is_empty() {
            return Err(AppError::InvalidArgument(format!(
                "cpu list '{list}' contains no cpus"
            )));
        }
        Ok(cpus)
    }

    pub fn parse_laptop_flag(flag: &str) -> bool {
        matches!(flag, "y" | "1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_ordinals_are_one_based() {
        assert_eq!(Preset::from_ordinal("1").unwrap(), Preset::WindowsOptimized);
        assert_eq!(Preset::from_ordinal("2").unwrap(), Preset::WindowsDisguised);
        assert_eq!(Preset::from_ordinal("4").unwrap(), Preset::LinuxDisguised);
    }

    #[test]
    fn preset_out_of_range_is_rejected() {
        for bad in ["0", "5", "-1", "two", ""] {
            assert!(
                matches!(Preset::from_ordinal(bad), Err(AppError::InvalidArgument(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn cpu_vendor_is_case_insensitive() {
        assert_eq!(CpuVendor::from_str("AMD"), CpuVendor::Amd);
        assert_eq!(CpuVendor::from_str("amd"), CpuVendor::Amd);
        assert_eq!(CpuVendor::from_str("intel"), CpuVendor::Other);
        assert_eq!(CpuVendor::Amd.cpuid_vendor(), "AuthenticAMD");
        assert_eq!(CpuVendor::Other.cpuid_vendor(), "GenuineIntel");
    }

    #[test]
    fn cpu_list_keeps_order_and_drops_blanks() {
        let cpus = TuneOptions::parse_cpu_list(" 4, 5,,12 ,13,").unwrap();
        assert_eq!(cpus, vec!["4", "5", "12", "13"]);
        assert!(TuneOptions::parse_cpu_list(" , ").is_err());
    }

    #[test]
    fn laptop_flag_accepts_y_and_1_only() {
        assert!(TuneOptions::parse_laptop_flag("y"));
        assert!(TuneOptions::parse_laptop_flag("1"));
        assert!(!TuneOptions::parse_laptop_flag("Y"));
        assert!(!TuneOptions::parse_laptop_flag("n"));
        assert!(!TuneOptions::parse_laptop_flag("yes"));
    }

    #[test]
    fn cpu_tune_stops_at_shorter_of_vcpus_and_cpus() {
        let cpus: Vec<String> = ["2", "3", "4"].iter().map(|s| s.to_string()).collect();
        let tune = CpuTune::from_affinity(8, &cpus, "0-1");
        assert_eq!(tune.vcpu_pins.len(), 3);
        assert_eq!(tune.vcpu_pins[2], VcpuPin { vcpu: 2, cpuset: "4".into() });
        assert_eq!(tune.emulatorpin.as_deref(), Some("0-1"));

        let tune = CpuTune::from_affinity(2, &cpus, "0-1");
        assert_eq!(tune.vcpu_pins.len(), 2);
    }
}

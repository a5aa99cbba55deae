pub const APP_NAME: &str = "grustytune";

pub const QEMU_NS_PREFIX: &str = "qemu";
pub const QEMU_NS_URI: &str = "http://libvirt.org/schemas/domain/qemu/1.0";
pub const DEFAULT_ACPI_TABLE: &str = "/var/lib/libvirt/images/fakebattery.aml";

pub const THREADS_PER_CORE: u32 = 2;

/// Prefix of every synthesized disk serial; the remaining 17 characters are hex.
pub const SERIAL_PREFIX: &str = "S5G";
pub const SERIAL_HEX_LEN: usize = 17;

pub const LOOKING_GLASS_NAME: &str = "looking-glass";
pub const LOOKING_GLASS_MODEL: &str = "ivshmem-plain";
pub const LOOKING_GLASS_SIZE_MIB: u32 = 128;

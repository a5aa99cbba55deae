//! Deterministic hardware identity derived from the domain UUID.
//!
//! Every value here is a pure function of its seed: SHA-256 of the UTF-8
//! seed, read as a big-endian unsigned integer, reduced modulo the bound.

use sha2::{Digest, Sha256};

use crate::backend::catalog::VendorEntry;
use crate::backend::types::DeviceIdentity;
use crate::config;

/// Index in `0..bound` selected by `seed`, or `None` for an empty range.
pub fn pick(seed: &str, bound: usize) -> Option<usize> {
    if bound == 0 {
        return None;
    }
    let digest = Sha256::digest(seed.as_bytes());
    let bound = bound as u128;
    let index = digest
        .iter()
        .fold(0u128, |acc, &byte| (acc * 256 + byte as u128) % bound);
    Some(index as usize)
}

/// Seed for a disk: the bare UUID, or `<uuid>-<ordinal>` for per-disk values.
pub fn disk_seed(uuid: &str, ordinal: Option<usize>) -> String {
    match ordinal {
        Some(n) => format!("{uuid}-{n}"),
        None => uuid.to_string(),
    }
}

/// 20-character serial: fixed prefix plus the leading hex of the seed digest.
pub fn serial_for(seed: &str) -> String {
    let digest = hex::encode(Sha256::digest(seed.as_bytes()));
    format!("{}{}", config::SERIAL_PREFIX, &digest[..config::SERIAL_HEX_LEN])
}

/// Vendor and model are keyed on the UUID alone, so every disk of a VM
/// reports the same product; only the serial varies with the ordinal.
pub fn device_identity(
    uuid: &str,
    ordinal: Option<usize>,
    catalog: &[VendorEntry],
) -> Option<DeviceIdentity> {
    let entry = catalog.get(pick(uuid, catalog.len())?)?;
    let model = entry.models.get(pick(uuid, entry.models.len())?)?;
    Some(DeviceIdentity {
        vendor: entry.vendor.to_string(),
        model: model.to_string(),
        serial: serial_for(&disk_seed(uuid, ordinal)),
    })
}

//! Disk controller layout and synthesized drive identities.

use crate::backend::catalog::SSD_CATALOG;
use crate::backend::document::{Document, Element, Match};
use crate::backend::identity;
use crate::backend::types::TuneOptions;
use crate::error::AppError;

fn primary_disk() -> Match<'static> {
    Match::tag("disk").attr("device", "disk")
}

fn missing_disk() -> AppError {
    AppError::missing(format!("domain/devices/{}", primary_disk().describe()))
}

/// Low-latency driver settings; the image format (`type`) is left as found.
fn tune_driver(disk: &mut Element) {
    let driver = disk.find_or_create("driver");
    driver.set_attr("name", "qemu");
    driver.set_attr("cache", "none");
    driver.set_attr("io", "native");
    driver.set_attr("discard", "unmap");
}

fn set_child_text(parent: &mut Element, tag: &str, text: &str) {
    parent.find_or_create(tag).set_text(text);
}

/// Single virtio-scsi controller; the first primary disk reports a catalog
/// vendor/product and a UUID-keyed serial.
pub fn scsi_identity(doc: &mut Document, _opts: &TuneOptions) -> Result<(), AppError> {
    let uuid = doc.require_text("uuid")?;
    let ident = identity::device_identity(&uuid, None, SSD_CATALOG)
        .ok_or_else(|| AppError::InvalidArgument("SSD catalog is empty".to_string()))?;

    let devices = doc.require("devices")?;
    if devices.matching(&primary_disk()).next().is_none() {
        return Err(missing_disk());
    }

    devices.remove_children(&Match::tag("controller").attr("type", "scsi"));
    devices.append(
        Element::new("controller")
            .with_attr("type", "scsi")
            .with_attr("index", "0")
            .with_attr("model", "virtio-scsi"),
    );

    let primary = primary_disk();
    let Some(disk) = devices.matching_mut(&primary).next() else {
        return Err(missing_disk());
    };

    tune_driver(disk);
    let target = disk.find_or_create("target");
    target.set_attr("dev", "sda");
    target.set_attr("bus", "scsi");
    target.set_attr("rotation_rate", "1");
    disk.remove_children(&Match::tag("address").attr("type", "drive"));

    set_child_text(disk, "serial", &ident.serial);
    set_child_text(disk, "vendor", &ident.vendor);
    set_child_text(disk, "product", &ident.model);

    log::debug!(
        "scsi disk identity: {} {} ({})",
        ident.vendor,
        ident.model,
        ident.serial
    );
    Ok(())
}

/// One NVMe controller per primary disk, indexed by the disk's document order.
pub fn nvme_emulation(doc: &mut Document, _opts: &TuneOptions) -> Result<(), AppError> {
    let uuid = doc.require_text("uuid")?;
    let devices = doc.require("devices")?;

    devices.remove_children(&Match::tag("controller").attr("type", "nvme"));

    let primary = primary_disk();
    let mut count = 0usize;
    for (index, disk) in devices.matching_mut(&primary).enumerate() {
        tune_driver(disk);

        let target = disk.find_or_create("target");
        target.remove_attr("rotation_rate");
        target.set_attr("dev", format!("nvme{index}n1"));
        target.set_attr("bus", "nvme");

        // force libvirt to re-enumerate the disk on the NVMe controller
        disk.remove_children(&Match::tag("address").attr("type", "drive"));
        disk.remove_children(&Match::tag("address").attr("type", "pci"));
        // vendor/product are SCSI-only and libvirt rejects them on nvme
        disk.remove_children(&Match::tag("vendor"));
        disk.remove_children(&Match::tag("product"));

        let serial = identity::serial_for(&identity::disk_seed(&uuid, Some(index)));
        log::debug!("nvme{index}: serial {serial}");
        set_child_text(disk, "serial", &serial);
        count += 1;
    }

    if count == 0 {
        return Err(missing_disk());
    }

    for index in 0..count {
        devices.append(
            Element::new("controller")
                .with_attr("type", "nvme")
                .with_attr("index", index.to_string()),
        );
    }
    Ok(())
}

//! Edits that make the guest look like bare metal, plus the Looking Glass shim.

use crate::backend::document::{Document, Element, Match};
use crate::backend::types::TuneOptions;
use crate::config;
use crate::error::AppError;

pub fn transparency(doc: &mut Document, opts: &TuneOptions) -> Result<(), AppError> {
    // every prerequisite is checked before the first edit
    doc.require("cpu")?;
    doc.require("features")?;
    doc.require("os")?;

    let features = doc.require("features")?;
    features
        .find_or_create("kvm")
        .find_or_create("hidden")
        .set_attr("state", "on");

    let vendor_id = features.find_or_create("hyperv").find_or_create("vendor_id");
    vendor_id.set_attr("state", "on");
    vendor_id.set_attr("value", opts.cpu_vendor.cpuid_vendor());

    doc.require("os")?
        .find_or_create("smbios")
        .set_attr("mode", "host");

    log::debug!(
        "hypervisor hidden, vendor_id {}",
        opts.cpu_vendor.cpuid_vendor()
    );
    Ok(())
}

/// Injects a fake battery ACPI table through QEMU command-line passthrough.
pub fn laptop_acpi(doc: &mut Document, opts: &TuneOptions) -> Result<(), AppError> {
    let prefix = doc.ensure_namespace(config::QEMU_NS_PREFIX, config::QEMU_NS_URI);
    let commandline_tag = format!("{prefix}:commandline");
    let arg_tag = format!("{prefix}:arg");

    let commandline = doc.root.find_or_create(&commandline_tag);
    commandline.remove_children(&Match::tag(&arg_tag));
    commandline.append(Element::new(arg_tag.as_str()).with_attr("value", "-acpitable"));
    commandline.append(
        Element::new(arg_tag.as_str()).with_attr("value", format!("file={}", opts.acpi_table)),
    );
    Ok(())
}

/// SPICE audio plus the IVSHMEM region Looking Glass shares frames through.
pub fn looking_glass(doc: &mut Document, _opts: &TuneOptions) -> Result<(), AppError> {
    doc.require("devices")?;

    doc.root
        .remove_children(&Match::tag("audio").attr("type", "spice"));
    doc.root.append(
        Element::new("audio")
            .with_attr("id", "1")
            .with_attr("type", "spice"),
    );

    let devices = doc.require("devices")?;
    devices.remove_children(&Match::tag("shmem").attr("name", config::LOOKING_GLASS_NAME));
    devices.append(
        Element::new("shmem")
            .with_attr("name", config::LOOKING_GLASS_NAME)
            .with_child(Element::new("model").with_attr("type", config::LOOKING_GLASS_MODEL))
            .with_child(
                Element::new("size")
                    .with_attr("unit", "M")
                    .with_text(config::LOOKING_GLASS_SIZE_MIB.to_string()),
            ),
    );
    Ok(())
}

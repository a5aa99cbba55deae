//! Host resource tuning: huge pages, CPU topology, pinning, interrupt delivery.

use crate::backend::document::{Document, Element, Match};
use crate::backend::topology;
use crate::backend::types::{CpuTune, TuneOptions};
use crate::error::AppError;

/// `<memoryBacking>` ends up holding a single `<hugepages/>`.
pub fn huge_pages(doc: &mut Document, _opts: &TuneOptions) -> Result<(), AppError> {
    let backing = doc.root.find_or_create("memoryBacking");
    backing.clear_elements();
    backing.append(Element::new("hugepages"));
    Ok(())
}

pub fn cpu_topology(doc: &mut Document, opts: &TuneOptions) -> Result<(), AppError> {
    let cpu = doc.require("cpu")?;

    cpu.remove_children(&Match::tag("topology"));
    cpu.remove_children(&Match::tag("feature").attr("name", "topoext"));

    let topo = topology::plan(opts.cpus.len() as u32, opts.cpu_vendor);
    log::debug!(
        "topology: {} cores x {} threads (topoext: {})",
        topo.cores,
        topo.threads,
        topo.requires_topoext
    );

    cpu.append(
        Element::new("topology")
            .with_attr("sockets", topo.sockets.to_string())
            .with_attr("dies", topo.dies.to_string())
            .with_attr("clusters", topo.clusters.to_string())
            .with_attr("cores", topo.cores.to_string())
            .with_attr("threads", topo.threads.to_string()),
    );
    if topo.requires_topoext {
        cpu.append(
            Element::new("feature")
                .with_attr("policy", "require")
                .with_attr("name", "topoext"),
        );
    }
    Ok(())
}

pub fn cpu_pinning(doc: &mut Document, opts: &TuneOptions) -> Result<(), AppError> {
    let declared = doc.require_text("vcpu")?;
    let vcpus: u32 = declared
        .parse()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| {
            AppError::InvalidArgument(format!(
                "<vcpu> must be a positive integer, got '{declared}'"
            ))
        })?;

    let tune = CpuTune::from_affinity(vcpus, &opts.cpus, &opts.emulator_cpuset);
    if tune.vcpu_pins.len() < vcpus as usize {
        log::warn!(
            "{} of {vcpus} vCPUs have no host cpu and stay unpinned",
            vcpus as usize - tune.vcpu_pins.len()
        );
    }

    let cputune = doc.root.find_or_create("cputune");
    cputune.remove_children(&Match::tag("vcpupin"));
    cputune.remove_children(&Match::tag("emulatorpin"));
    for pin in &tune.vcpu_pins {
        cputune.append(
            Element::new("vcpupin")
                .with_attr("vcpu", pin.vcpu.to_string())
                .with_attr("cpuset", pin.cpuset.as_str()),
        );
    }
    if let Some(ref cpuset) = tune.emulatorpin {
        cputune.append(Element::new("emulatorpin").with_attr("cpuset", cpuset.as_str()));
    }
    log::debug!("pinned {} vCPUs", tune.vcpu_pins.len());
    Ok(())
}

/// Hands interrupt controller emulation to KVM instead of QEMU.
pub fn other_perf_optimizations(doc: &mut Document, _opts: &TuneOptions) -> Result<(), AppError> {
    let features = doc.require("features")?;
    features.find_or_create("ioapic").set_attr("driver", "kvm");
    Ok(())
}

//! Ordered list of domain edits and the rules that decide which ones run.

use crate::backend::document::Document;
use crate::backend::types::{Preset, StorageBus, TuneOptions};
use crate::backend::{disguise, storage, tuning};
use crate::error::AppError;

pub type MutatorFn = fn(&mut Document, &TuneOptions) -> Result<(), AppError>;

/// When a step takes part in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    Preset(Preset),
    Laptop,
    Storage(StorageBus),
}

impl Condition {
    pub fn holds(&self, opts: &TuneOptions) -> bool {
        match self {
            Condition::Always => true,
            Condition::Preset(preset) => opts.preset == *preset,
            Condition::Laptop => opts.laptop,
            Condition::Storage(bus) => opts.storage == *bus,
        }
    }
}

#[derive(Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    pub when: Condition,
    pub apply: MutatorFn,
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("when", &self.when)
            .finish()
    }
}

pub const STEPS: &[Step] = &[
    Step { name: "huge-pages", when: Condition::Always, apply: tuning::huge_pages },
    Step { name: "cpu-topology", when: Condition::Always, apply: tuning::cpu_topology },
    Step { name: "cpu-pinning", when: Condition::Always, apply: tuning::cpu_pinning },
    Step {
        name: "nvme-emulation",
        when: Condition::Storage(StorageBus::Nvme),
        apply: storage::nvme_emulation,
    },
    Step {
        name: "scsi-identity",
        when: Condition::Storage(StorageBus::Scsi),
        apply: storage::scsi_identity,
    },
    Step {
        name: "other-perf-optimizations",
        when: Condition::Always,
        apply: tuning::other_perf_optimizations,
    },
    Step {
        name: "transparency",
        when: Condition::Preset(Preset::WindowsDisguised),
        apply: disguise::transparency,
    },
    Step { name: "laptop-acpi", when: Condition::Laptop, apply: disguise::laptop_acpi },
    Step { name: "looking-glass", when: Condition::Always, apply: disguise::looking_glass },
];

pub fn plan(opts: &TuneOptions) -> Vec<&'static Step> {
    STEPS.iter().filter(|step| step.when.holds(opts)).collect()
}

/// Applies every selected step in order, stopping at the first failure.
pub fn run(doc: &mut Document, opts: &TuneOptions) -> Result<(), AppError> {
    for step in plan(opts) {
        log::info!("Applying {}", step.name);
        (step.apply)(doc, opts).map_err(|e| {
            log::debug!("{} failed: {e}", step.name);
            e
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::document::Match;
    use crate::backend::fixtures::{options, WIN11_UUID, WIN11_XML};
    use crate::backend::identity;
    use crate::backend::types::CpuVendor;

    fn names(opts: &TuneOptions) -> Vec<&'static str> {
        plan(opts).iter().map(|s| s.name).collect()
    }

    fn tuned(opts: &TuneOptions) -> Document {
        let mut doc = Document::parse(WIN11_XML).unwrap();
        run(&mut doc, opts).unwrap();
        doc
    }

    #[test]
    fn default_plan_order() {
        assert_eq!(
            names(&options()),
            vec![
                "huge-pages",
                "cpu-topology",
                "cpu-pinning",
                "nvme-emulation",
                "other-perf-optimizations",
                "looking-glass",
            ]
        );
    }

    #[test]
    fn disguised_laptop_plan_order() {
        let mut opts = options();
        opts.preset = Preset::WindowsDisguised;
        opts.laptop = true;
        assert_eq!(
            names(&opts),
            vec![
                "huge-pages",
                "cpu-topology",
                "cpu-pinning",
                "nvme-emulation",
                "other-perf-optimizations",
                "transparency",
                "laptop-acpi",
                "looking-glass",
            ]
        );
    }

    #[test]
    fn only_windows_disguised_runs_transparency() {
        for preset in Preset::ALL {
            let mut opts = options();
            opts.preset = *preset;
            let has = names(&opts).contains(&"transparency");
            assert_eq!(has, *preset == Preset::WindowsDisguised, "{preset}");
        }
    }

    #[test]
    fn scsi_replaces_nvme_step() {
        let mut opts = options();
        opts.storage = StorageBus::Scsi;
        let steps = names(&opts);
        assert!(steps.contains(&"scsi-identity"));
        assert!(!steps.contains(&"nvme-emulation"));
    }

    #[test]
    fn full_pipeline_is_idempotent() {
        let mut opts = options();
        opts.preset = Preset::WindowsDisguised;
        opts.laptop = true;
        opts.cpu_vendor = CpuVendor::Amd;

        let once = tuned(&opts);
        let mut twice = once.clone();
        run(&mut twice, &opts).unwrap();
        assert_eq!(once, twice);
        assert_eq!(
            once.to_xml_string().unwrap(),
            twice.to_xml_string().unwrap()
        );

        // and stays so across a save/load cycle
        let mut reloaded = Document::parse(&once.to_xml_string().unwrap()).unwrap();
        run(&mut reloaded, &opts).unwrap();
        assert_eq!(reloaded, once);
    }

    #[test]
    fn scsi_pipeline_is_idempotent() {
        let mut opts = options();
        opts.storage = StorageBus::Scsi;
        let once = tuned(&opts);
        let mut twice = once.clone();
        run(&mut twice, &opts).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn identity_is_deterministic_across_runs() {
        let a = tuned(&options()).to_xml_string().unwrap();
        let b = tuned(&options()).to_xml_string().unwrap();
        assert_eq!(a, b);
        assert!(a.contains(&identity::serial_for(&format!("{WIN11_UUID}-0"))));
        assert!(a.contains(&identity::serial_for(&format!("{WIN11_UUID}-1"))));
    }

    #[test]
    fn four_cpu_scenario() {
        let doc = tuned(&options());
        let cputune = doc.root.child("cputune").unwrap();
        let pins: Vec<_> = cputune
            .matching(&Match::tag("vcpupin"))
            .map(|p| (p.attr("vcpu").unwrap(), p.attr("cpuset").unwrap()))
            .collect();
        assert_eq!(pins, vec![("0", "0"), ("1", "1"), ("2", "2"), ("3", "3")]);
        assert_eq!(cputune.matching(&Match::tag("emulatorpin")).count(), 1);

        let topo = doc.root.child("cpu").unwrap().child("topology").unwrap();
        assert_eq!(topo.attr("cores"), Some("2"));
        assert_eq!(topo.attr("threads"), Some("2"));
    }

    #[test]
    fn disguised_scenario_sets_vendor_id() {
        for (vendor, expected) in [
            (CpuVendor::from_str("AMD"), "AuthenticAMD"),
            (CpuVendor::from_str("Amd"), "AuthenticAMD"),
            (CpuVendor::from_str("intel"), "GenuineIntel"),
        ] {
            let mut opts = options();
            opts.preset = Preset::WindowsDisguised;
            opts.cpu_vendor = vendor;
            let mut doc = tuned(&opts);
            let hidden = doc.root.require("features/kvm/hidden").unwrap();
            assert_eq!(hidden.attr("state"), Some("on"));
            let vendor_id = doc.root.require("features/hyperv/vendor_id").unwrap();
            assert_eq!(vendor_id.attr("value"), Some(expected));
        }
    }

    #[test]
    fn optimized_preset_leaves_hypervisor_visible() {
        let doc = tuned(&options());
        let features = doc.root.child("features").unwrap();
        assert!(features.child("kvm").is_none());
        assert!(doc.root.child("os").unwrap().child("smbios").is_none());
    }

    #[test]
    fn laptop_scenario_keeps_two_args() {
        let mut opts = options();
        opts.laptop = true;
        let mut doc = tuned(&opts);
        run(&mut doc, &opts).unwrap();
        let cmdline = doc.root.child("qemu:commandline").unwrap();
        assert_eq!(cmdline.matching(&Match::tag("qemu:arg")).count(), 2);
        assert!(cmdline
            .elements()
            .any(|a| a.attr("value") == Some("file=/var/lib/libvirt/images/fakebattery.aml")));
    }

    #[test]
    fn failure_stops_the_pipeline() {
        let mut doc = Document::parse(
            r#"<domain><uuid>abc</uuid><vcpu>4</vcpu><features/><devices/></domain>"#,
        )
        .unwrap();
        let err = run(&mut doc, &options()).unwrap_err();
        assert!(matches!(err, AppError::MissingElement { ref path } if path == "domain/cpu"));
        // huge-pages ran before the failure, pinning did not
        assert!(doc.root.child("memoryBacking").is_some());
        assert!(doc.root.child("cputune").is_none());
    }
}

//! Shared test documents, modelled on what virt-install defines for a
//! Windows 11 guest with a second data disk.

use crate::backend::types::{CpuVendor, Preset, StorageBus, TuneOptions};
use crate::config;

pub const WIN11_UUID: &str = "3f9a1c52-8d2e-4b6f-9c1a-7e5d2b8f4a10";

pub const WIN11_XML: &str = r#"<!--
WARNING: THIS IS AN AUTO-GENERATED FILE. CHANGES TO IT ARE LIKELY TO BE
OVERWRITTEN AND LOST. Changes to this xml configuration should be made using:
  virsh edit win11
-->
<domain type="kvm">
  <name>win11</name>
  <uuid>3f9a1c52-8d2e-4b6f-9c1a-7e5d2b8f4a10</uuid>
  <memory unit="KiB">16777216</memory>
  <currentMemory unit="KiB">16777216</currentMemory>
  <memoryBacking>
    <source type="memfd"/>
    <access mode="shared"/>
  </memoryBacking>
  <vcpu placement="static">4</vcpu>
  <os firmware="efi">
    <type arch="x86_64" machine="pc-q35-8.2">hvm</type>
    <boot dev="hd"/>
  </os>
  <features>
    <acpi/>
    <apic/>
    <hyperv mode="custom">
      <relaxed state="on"/>
    </hyperv>
    <vmport state="off"/>
  </features>
  <cpu mode="host-passthrough" check="none" migratable="on">
    <feature policy="require" name="svm"/>
  </cpu>
  <clock offset="localtime"/>
  <devices>
    <emulator>/usr/bin/qemu-system-x86_64</emulator>
    <disk type="file" device="disk">
      <driver name="qemu" type="qcow2"/>
      <source file="/var/lib/libvirt/images/win11.qcow2"/>
      <target dev="sda" bus="sata"/>
      <address type="drive" controller="0" bus="0" target="0" unit="0"/>
    </disk>
    <disk type="file" device="cdrom">
      <driver name="qemu" type="raw"/>
      <source file="/var/lib/libvirt/images/virtio-win.iso"/>
      <target dev="sdb" bus="sata"/>
      <readonly/>
      <address type="drive" controller="0" bus="0" target="0" unit="1"/>
    </disk>
    <disk type="file" device="disk">
      <driver name="qemu" type="raw"/>
      <source file="/var/lib/libvirt/images/win11-data.img"/>
      <target dev="vda" bus="virtio"/>
      <address type="pci" domain="0x0000" bus="0x04" slot="0x00" function="0x0"/>
    </disk>
    <controller type="sata" index="0"/>
    <interface type="network">
      <source network="default"/>
      <model type="virtio"/>
    </interface>
    <graphics type="spice" autoport="yes"/>
    <video>
      <model type="qxl"/>
    </video>
  </devices>
</domain>
"#;

pub fn options() -> TuneOptions {
    TuneOptions {
        cpus: ["0", "1", "2", "3"].iter().map(|c| c.to_string()).collect(),
        emulator_cpuset: "8-9".to_string(),
        cpu_vendor: CpuVendor::Other,
        laptop: false,
        preset: Preset::WindowsOptimized,
        storage: StorageBus::Nvme,
        acpi_table: config::DEFAULT_ACPI_TABLE.to_string(),
    }
}

//! Tunes a libvirt domain XML for a passthrough desktop guest.
//!
//! ```bash
//! grustytune /etc/libvirt/qemu/win11.xml 2,3,4,5,6,7 0-1 amd n 2
//! ```
//!
//! Positional arguments, in order: domain XML path, comma separated host cpus
//! (guest vCPU `i` is pinned to entry `i`), emulator cpuset, cpu vendor,
//! laptop flag (`y`/`1`), preset ordinal (1-4). The file is only rewritten
//! after every step has succeeded.

mod backend;
mod config;
mod error;

use std::io::Write;
use std::path::PathBuf;

use backend::document::Document;
use backend::pipeline;
use backend::types::{CpuVendor, Preset, StorageBus, TuneOptions};
use clap::Parser;
use error::AppError;

#[derive(Parser, Debug)]
#[command(name = config::APP_NAME)]
#[command(about = "Apply host tuning and a deterministic hardware identity to a libvirt domain XML")]
#[command(version)]
struct Cli {
    /// Domain XML file to rewrite in place.
    xml_path: PathBuf,

    /// Host cpus for the guest vCPUs, e.g. "2,3,4,5".
    cpu_list: String,

    /// Cpuset for the emulator thread, e.g. "0-1".
    emulator_cpu_list: String,

    /// Host cpu vendor ("amd" enables topoext and AuthenticAMD).
    cpu_vendor: String,

    /// "y" or "1" to inject the laptop battery ACPI table.
    is_laptop: String,

    /// 1 WindowsOptimized, 2 WindowsDisguised, 3 LinuxOptimized, 4 LinuxDisguised.
    preset: String,

    /// Storage controller layout for primary disks.
    #[arg(long, value_enum, default_value_t = StorageBus::Nvme)]
    storage: StorageBus,

    /// ACPI table injected for laptops.
    #[arg(long, env = "GRUSTYTUNE_ACPI_TABLE", default_value = config::DEFAULT_ACPI_TABLE)]
    acpi_table: String,

    /// Print the tuned XML to stdout instead of writing the file.
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn options(&self) -> Result<TuneOptions, AppError> {
        Ok(TuneOptions {
            cpus: TuneOptions::parse_cpu_list(&self.cpu_list)?,
            emulator_cpuset: self.emulator_cpu_list.trim().to_string(),
            cpu_vendor: CpuVendor::from_str(&self.cpu_vendor),
            laptop: TuneOptions::parse_laptop_flag(&self.is_laptop),
            preset: Preset::from_ordinal(&self.preset)?,
            storage: self.storage,
            acpi_table: self.acpi_table.clone(),
        })
    }
}

fn execute(cli: &Cli) -> Result<Option<String>, AppError> {
    let opts = cli.options()?;
    log::info!(
        "Configuring {} (cpus: {}, emulator: {}, vendor: {}, laptop: {}, preset: {}, storage: {})",
        cli.xml_path.display(),
        opts.cpus.join(","),
        opts.emulator_cpuset,
        cli.cpu_vendor,
        opts.laptop,
        opts.preset,
        opts.storage
    );

    let mut doc = Document::load(&cli.xml_path)?;
    pipeline::run(&mut doc, &opts)?;

    if cli.dry_run {
        return Ok(Some(doc.to_xml_string()?));
    }
    doc.save(&cli.xml_path)?;
    log::info!("Updated XML written to {}", cli.xml_path.display());
    Ok(None)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let code = report(
        execute(&cli),
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    );
    std::process::exit(code);
}

/// Writes the dry-run document or the single diagnostic line; returns the exit code.
fn report(
    result: Result<Option<String>, AppError>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> i32 {
    match result {
        Ok(Some(xml)) => {
            let _ = out.write_all(xml.as_bytes());
            let _ = out.flush();
            0
        }
        Ok(None) => 0,
        Err(e) => {
            let _ = writeln!(err, "error: {e}");
            1
        }
    }
}

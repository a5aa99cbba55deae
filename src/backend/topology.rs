use crate::backend::types::{CpuTopology, CpuVendor};
use crate::config::THREADS_PER_CORE;

/// Single socket, die and cluster; two threads per core. An odd vCPU count
/// loses its remainder to the integer division.
pub fn plan(total_vcpus: u32, vendor: CpuVendor) -> CpuTopology {
    CpuTopology {
        sockets: 1,
        dies: 1,
        clusters: 1,
        cores: total_vcpus / THREADS_PER_CORE,
        threads: THREADS_PER_CORE,
        requires_topoext: vendor == CpuVendor::Amd,
    }
}

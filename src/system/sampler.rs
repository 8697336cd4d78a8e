use std::path::Path;

use sysinfo::{Disks, System};

use super::platform;
use super::snapshot::{CpuSample, DiskStats, MemorySnapshot, Readings};

/// Best-effort reader of host counters.
///
/// Every read degrades to zeroed fields instead of failing: a dashboard
/// showing zeros beats a dead refresh loop.
pub struct MetricSampler {
    sys: System,
}

impl Default for MetricSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSampler {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        MetricSampler { sys }
    }

    pub fn sample(&mut self, disk_path: &Path) -> Readings {
        let _span = tracing::debug_span!("sampler.sample").entered();

        Readings {
            cpu: self.sample_cpu(),
            memory: self.sample_memory(),
            disk: self.sample_disk(disk_path),
            uptime_secs: System::uptime(),
        }
    }

    pub fn sample_cpu(&self) -> CpuSample {
        match platform::cpu_ticks() {
            Some((ticks, core_count)) => CpuSample {
                usage_percentage: ticks.usage_percentage(),
                core_count,
            },
            None => {
                tracing::debug!("cpu tick read failed, reporting 0%");
                CpuSample::default()
            }
        }
    }

    pub fn sample_memory(&mut self) -> MemorySnapshot {
        self.sys.refresh_memory();

        let vm = platform::vm_counters().unwrap_or_else(|| {
            tracing::debug!("vm counter read failed, zeroing breakdown");
            Default::default()
        });

        MemorySnapshot {
            physical_total_bytes: self.sys.total_memory(),
            wired_bytes: vm.wired,
            active_bytes: vm.active,
            compressed_bytes: vm.compressed,
            free_bytes: vm.free,
            swap_used_bytes: platform::swap_used().unwrap_or(0),
        }
    }

    /// Capacity of the volume holding `path`; zeros when it cannot be resolved.
    pub fn sample_disk(&self, path: &Path) -> DiskStats {
        if !path.exists() {
            return DiskStats::default();
        }
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let disks = Disks::new_with_refreshed_list();
        let mount = disks
            .list()
            .iter()
            .filter(|disk| path.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len());

        match mount {
            Some(disk) => DiskStats::from_capacity(disk.total_space(), disk.available_space()),
            None => {
                tracing::debug!(path = %path.display(), "no mount found for disk sample");
                DiskStats::default()
            }
        }
    }
}

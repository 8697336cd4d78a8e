use serde::Serialize;

/// Cumulative-since-boot processor ticks, summed over all logical cores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub user: u64,
    pub system: u64,
    pub idle: u64,
    pub nice: u64,
}

impl CpuTicks {
    pub fn used(&self) -> u64 {
        self.user + self.system + self.nice
    }

    pub fn total(&self) -> u64 {
        self.used() + self.idle
    }

    pub fn usage_percentage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.used() as f64 / total as f64 * 100.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct CpuSample {
    pub usage_percentage: f64,
    pub core_count: usize,
}

/// Point-in-time virtual memory breakdown, all values in bytes.
///
/// Counters are read independently, so `wired + active + compressed + free`
/// only approximates `physical_total_bytes`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemorySnapshot {
    pub physical_total_bytes: u64,
    pub wired_bytes: u64,
    pub active_bytes: u64,
    pub compressed_bytes: u64,
    pub free_bytes: u64,
    pub swap_used_bytes: u64,
}

impl MemorySnapshot {
    pub fn total_used_bytes(&self) -> u64 {
        self.wired_bytes
            .saturating_add(self.active_bytes)
            .saturating_add(self.compressed_bytes)
    }

    pub fn pressure_percentage(&self) -> f64 {
        self.fraction_of_total(self.total_used_bytes()) * 100.0
    }

    /// Share of physical memory taken by `bytes`, 0 when the total is unknown.
    pub fn fraction_of_total(&self, bytes: u64) -> f64 {
        if self.physical_total_bytes == 0 {
            return 0.0;
        }
        bytes as f64 / self.physical_total_bytes as f64
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiskStats {
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub total_bytes: u64,
}

impl DiskStats {
    /// Derives `used` from the capacity figures so that
    /// `used + available == total` holds exactly.
    pub fn from_capacity(total_bytes: u64, available_bytes: u64) -> Self {
        let available_bytes = available_bytes.min(total_bytes);
        DiskStats {
            used_bytes: total_bytes - available_bytes,
            available_bytes,
            total_bytes,
        }
    }

    pub fn usage_percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.used_bytes as f64 / self.total_bytes as f64 * 100.0
    }
}

/// One refresh worth of readings, published as a unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Readings {
    pub cpu: CpuSample,
    pub memory: MemorySnapshot,
    pub disk: DiskStats,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_ratio_uses_cumulative_ticks() {
        let ticks = CpuTicks {
            user: 30,
            system: 15,
            idle: 50,
            nice: 5,
        };
        assert!((ticks.usage_percentage() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_ticks_yield_zero_usage() {
        assert_eq!(CpuTicks::default().usage_percentage(), 0.0);
    }

    #[test]
    fn pressure_without_total_is_zero() {
        let mem = MemorySnapshot {
            wired_bytes: 10,
            active_bytes: 10,
            ..MemorySnapshot::default()
        };
        assert_eq!(mem.pressure_percentage(), 0.0);
    }

    #[test]
    fn pressure_counts_wired_active_compressed() {
        let mem = MemorySnapshot {
            physical_total_bytes: 1000,
            wired_bytes: 100,
            active_bytes: 200,
            compressed_bytes: 200,
            free_bytes: 500,
            swap_used_bytes: 0,
        };
        assert!((mem.pressure_percentage() - 50.0).abs() < 1e-9);
        assert!((mem.fraction_of_total(mem.wired_bytes) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn disk_available_is_clamped_to_total() {
        let disk = DiskStats::from_capacity(100, 250);
        assert_eq!(disk.available_bytes, 100);
        assert_eq!(disk.used_bytes, 0);
        assert_eq!(disk.used_bytes + disk.available_bytes, disk.total_bytes);
    }
}

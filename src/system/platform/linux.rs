use super::{CleanupLayout, FilesystemLayout, HostCounters, TrashLayout, VmCounters};
use crate::system::snapshot::CpuTicks;

pub struct Platform;

/// Aggregate `cpu` line of `/proc/stat`, plus the number of `cpuN` lines.
fn parse_proc_stat(contents: &str) -> Option<(CpuTicks, usize)> {
    let mut ticks = None;
    let mut cores = 0;
    for line in contents.lines() {
        let Some(rest) = line.strip_prefix("cpu") else {
            continue;
        };
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            cores += 1;
            continue;
        }
        // Fields: user nice system idle iowait irq softirq steal ...
        let fields: Vec<u64> = rest
            .split_whitespace()
            .map_while(|f| f.parse().ok())
            .collect();
        if fields.len() < 4 {
            return None;
        }
        ticks = Some(CpuTicks {
            user: fields[0],
            nice: fields[1],
            system: fields[2],
            // iowait is time the core sat idle waiting on I/O
            idle: fields[3] + fields.get(4).copied().unwrap_or(0),
        });
    }
    ticks.map(|t| (t, cores))
}

/// `/proc/meminfo` value in bytes (the file reports kB).
fn meminfo_field(contents: &str, key: &str) -> Option<u64> {
    contents.lines().find_map(|line| {
        let value = line.strip_prefix(key)?.strip_prefix(':')?;
        let kb: u64 = value.trim().trim_end_matches("kB").trim().parse().ok()?;
        Some(kb * 1024)
    })
}

fn parse_meminfo(contents: &str) -> Option<VmCounters> {
    Some(VmCounters {
        wired: meminfo_field(contents, "Unevictable").unwrap_or(0),
        active: meminfo_field(contents, "Active")?,
        compressed: meminfo_field(contents, "Zswap").unwrap_or(0),
        free: meminfo_field(contents, "MemFree")?,
    })
}

fn parse_swap_used(contents: &str) -> Option<u64> {
    let total = meminfo_field(contents, "SwapTotal")?;
    let free = meminfo_field(contents, "SwapFree")?;
    Some(total.saturating_sub(free))
}

impl HostCounters for Platform {
    fn cpu_ticks() -> Option<(CpuTicks, usize)> {
        let contents = std::fs::read_to_string("/proc/stat").ok()?;
        parse_proc_stat(&contents)
    }

    fn vm_counters() -> Option<VmCounters> {
        let contents = std::fs::read_to_string("/proc/meminfo").ok()?;
        parse_meminfo(&contents)
    }

    fn swap_used() -> Option<u64> {
        let contents = std::fs::read_to_string("/proc/meminfo").ok()?;
        parse_swap_used(&contents)
    }
}

impl FilesystemLayout for Platform {
    fn cleanup_layout() -> CleanupLayout {
        CleanupLayout {
            user_caches: &[".cache"],
            logs: &[".local/share/xorg"],
            trash: &[".local/share/Trash/files"],
            downloads: &["Downloads"],
            system_caches: "/var/cache",
        }
    }

    fn trash_layout() -> Option<TrashLayout> {
        Some(TrashLayout {
            files: ".local/share/Trash/files",
            info: Some(".local/share/Trash/info"),
        })
    }
}

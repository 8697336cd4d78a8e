use super::{CleanupLayout, FilesystemLayout, HostCounters, TrashLayout, VmCounters};
use crate::system::snapshot::CpuTicks;

pub struct Platform;

#[cfg(target_os = "windows")]
use windows_sys::Win32::{Foundation::FILETIME, System::Threading::GetSystemTimes};

#[cfg(target_os = "windows")]
fn filetime_ticks(ft: &FILETIME) -> u64 {
    ((ft.dwHighDateTime as u64) << 32) | ft.dwLowDateTime as u64
}

impl HostCounters for Platform {
    #[cfg(target_os = "windows")]
    fn cpu_ticks() -> Option<(CpuTicks, usize)> {
        unsafe {
            let mut idle = std::mem::zeroed::<FILETIME>();
            let mut kernel = std::mem::zeroed::<FILETIME>();
            let mut user = std::mem::zeroed::<FILETIME>();
            if GetSystemTimes(&mut idle, &mut kernel, &mut user) == 0 {
                return None;
            }
            let idle = filetime_ticks(&idle);
            // Kernel time includes the idle loop.
            let kernel = filetime_ticks(&kernel).saturating_sub(idle);
            let cores = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);
            Some((
                CpuTicks {
                    user: filetime_ticks(&user),
                    system: kernel,
                    idle,
                    nice: 0,
                },
                cores,
            ))
        }
    }

    #[cfg(not(target_os = "windows"))]
    fn cpu_ticks() -> Option<(CpuTicks, usize)> {
        None
    }

    fn vm_counters() -> Option<VmCounters> {
        // Wired/compressed page counts are not exposed without perf counters.
        None
    }

    fn swap_used() -> Option<u64> {
        None
    }
}

impl FilesystemLayout for Platform {
    fn cleanup_layout() -> CleanupLayout {
        CleanupLayout {
            user_caches: &["AppData/Local/Temp"],
            logs: &["AppData/Local/CrashDumps"],
            trash: &[],
            downloads: &["Downloads"],
            system_caches: "C:\\Windows\\Temp",
        }
    }

    fn trash_layout() -> Option<TrashLayout> {
        // The recycle bin is per-volume and shell-managed.
        None
    }
}

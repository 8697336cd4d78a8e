#![allow(deprecated)] // libc's mach bindings are flagged in favour of mach2

use std::mem;
use std::ptr;

use super::{CleanupLayout, FilesystemLayout, HostCounters, TrashLayout, VmCounters};
use crate::system::snapshot::CpuTicks;

pub struct Platform;

/// Per-processor load array returned by `host_processor_info`.
/// The kernel allocates it in our address space; dropping the guard hands it back.
struct ProcessorLoadInfo {
    info: libc::processor_info_array_t,
    info_count: libc::mach_msg_type_number_t,
    cpu_count: libc::natural_t,
}

impl ProcessorLoadInfo {
    fn read() -> Option<Self> {
        let mut cpu_count: libc::natural_t = 0;
        let mut info: libc::processor_info_array_t = ptr::null_mut();
        let mut info_count: libc::mach_msg_type_number_t = 0;

        let result = unsafe {
            libc::host_processor_info(
                libc::mach_host_self(),
                libc::PROCESSOR_CPU_LOAD_INFO,
                &mut cpu_count,
                &mut info,
                &mut info_count,
            )
        };

        // Take ownership before looking at the result so the buffer is
        // released on the failure path too.
        let guard = (!info.is_null()).then_some(ProcessorLoadInfo {
            info,
            info_count,
            cpu_count,
        });
        if result != libc::KERN_SUCCESS {
            return None;
        }
        guard
    }

    fn ticks(&self) -> CpuTicks {
        let states = libc::CPU_STATE_MAX as usize;
        let len = (self.info_count as usize).min(self.cpu_count as usize * states);
        let raw = unsafe { std::slice::from_raw_parts(self.info, len) };

        let mut ticks = CpuTicks::default();
        for cpu in raw.chunks_exact(states) {
            ticks.user += cpu[libc::CPU_STATE_USER as usize] as u32 as u64;
            ticks.system += cpu[libc::CPU_STATE_SYSTEM as usize] as u32 as u64;
            ticks.idle += cpu[libc::CPU_STATE_IDLE as usize] as u32 as u64;
            ticks.nice += cpu[libc::CPU_STATE_NICE as usize] as u32 as u64;
        }
        ticks
    }
}

impl Drop for ProcessorLoadInfo {
    fn drop(&mut self) {
        let size = self.info_count as usize * mem::size_of::<libc::integer_t>();
        unsafe {
            libc::vm_deallocate(
                libc::mach_task_self(),
                self.info as libc::vm_address_t,
                size as libc::vm_size_t,
            );
        }
    }
}

fn page_size() -> Option<u64> {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    (size > 0).then_some(size as u64)
}

impl HostCounters for Platform {
    fn cpu_ticks() -> Option<(CpuTicks, usize)> {
        let load = ProcessorLoadInfo::read()?;
        Some((load.ticks(), load.cpu_count as usize))
    }

    fn vm_counters() -> Option<VmCounters> {
        let mut stats: libc::vm_statistics64 = unsafe { mem::zeroed() };
        let mut count = (mem::size_of::<libc::vm_statistics64>()
            / mem::size_of::<libc::integer_t>())
            as libc::mach_msg_type_number_t;

        let result = unsafe {
            libc::host_statistics64(
                libc::mach_host_self(),
                libc::HOST_VM_INFO64,
                &mut stats as *mut libc::vm_statistics64 as libc::host_info64_t,
                &mut count,
            )
        };
        if result != libc::KERN_SUCCESS {
            return None;
        }

        let page = page_size()?;
        Some(VmCounters {
            wired: stats.wire_count as u64 * page,
            active: stats.active_count as u64 * page,
            compressed: stats.compressor_page_count as u64 * page,
            free: stats.free_count as u64 * page,
        })
    }

    fn swap_used() -> Option<u64> {
        let mut usage: libc::xsw_usage = unsafe { mem::zeroed() };
        let mut size = mem::size_of::<libc::xsw_usage>();
        let rc = unsafe {
            libc::sysctlbyname(
                c"vm.swapusage".as_ptr(),
                &mut usage as *mut libc::xsw_usage as *mut libc::c_void,
                &mut size,
                ptr::null_mut(),
                0,
            )
        };
        if rc != 0 { None } else { Some(usage.xsu_used) }
    }
}

impl FilesystemLayout for Platform {
    fn cleanup_layout() -> CleanupLayout {
        CleanupLayout {
            user_caches: &["Library/Caches"],
            logs: &["Library/Logs"],
            trash: &[".Trash"],
            downloads: &["Downloads"],
            system_caches: "/Library/Caches",
        }
    }

    fn trash_layout() -> Option<TrashLayout> {
        Some(TrashLayout {
            files: ".Trash",
            info: None,
        })
    }
}

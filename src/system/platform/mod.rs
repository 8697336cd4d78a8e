use crate::system::snapshot::CpuTicks;

/// Virtual memory counters already converted to bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VmCounters {
    pub wired: u64,
    pub active: u64,
    pub compressed: u64,
    pub free: u64,
}

/// Where each cleanup category lives on this OS. User entries are relative
/// to the home directory; `system_caches` is absolute.
#[derive(Clone, Copy, Debug)]
pub struct CleanupLayout {
    pub user_caches: &'static [&'static str],
    pub logs: &'static [&'static str],
    pub trash: &'static [&'static str],
    pub downloads: &'static [&'static str],
    pub system_caches: &'static str,
}

/// Home-relative location of the per-user trash. `info` is set when the
/// platform expects a metadata record next to every trashed entry.
#[derive(Clone, Copy, Debug)]
pub struct TrashLayout {
    pub files: &'static str,
    pub info: Option<&'static str>,
}

pub trait HostCounters {
    /// Summed ticks across logical processors plus the processor count.
    fn cpu_ticks() -> Option<(CpuTicks, usize)>;
    fn vm_counters() -> Option<VmCounters>;
    fn swap_used() -> Option<u64>;
}

pub trait FilesystemLayout {
    fn cleanup_layout() -> CleanupLayout;
    fn trash_layout() -> Option<TrashLayout>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn cpu_ticks() -> Option<(CpuTicks, usize)> {
    platform_impl::Platform::cpu_ticks()
}

pub fn vm_counters() -> Option<VmCounters> {
    platform_impl::Platform::vm_counters()
}

pub fn swap_used() -> Option<u64> {
    platform_impl::Platform::swap_used()
}

pub fn cleanup_layout() -> CleanupLayout {
    platform_impl::Platform::cleanup_layout()
}

pub fn trash_layout() -> Option<TrashLayout> {
    platform_impl::Platform::trash_layout()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrappers_do_not_panic() {
        let _ = cpu_ticks();
        let _ = vm_counters();
        let _ = swap_used();
        let _ = trash_layout();
    }

    #[test]
    fn layout_has_roots_for_user_categories() {
        let layout = cleanup_layout();
        assert!(!layout.user_caches.is_empty());
        assert!(!layout.downloads.is_empty());
        assert!(!layout.system_caches.is_empty());
    }
}

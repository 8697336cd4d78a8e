use proptest::prelude::*;
use sysdeck::system::history::HistoryBuffer;
use sysdeck::system::snapshot::{CpuTicks, DiskStats, MemorySnapshot};

// Per-core counters are 32-bit on macOS; summing a few hundred cores fits in u64.
fn tick_value() -> impl Strategy<Value = u64> {
    (0u64..=u32::MAX as u64).prop_map(|v| v * 64)
}

proptest! {
    #[test]
    fn cpu_usage_is_finite_and_bounded(
        user in tick_value(),
        system in tick_value(),
        idle in tick_value(),
        nice in tick_value(),
    ) {
        let usage = CpuTicks { user, system, idle, nice }.usage_percentage();
        prop_assert!(usage.is_finite());
        prop_assert!((0.0..=100.0).contains(&usage), "usage out of range: {}", usage);
    }

    #[test]
    fn memory_pressure_is_finite_and_non_negative(
        physical_total_bytes in any::<u64>(),
        wired_bytes in any::<u64>(),
        active_bytes in any::<u64>(),
        compressed_bytes in any::<u64>(),
    ) {
        let mem = MemorySnapshot {
            physical_total_bytes,
            wired_bytes,
            active_bytes,
            compressed_bytes,
            free_bytes: 0,
            swap_used_bytes: 0,
        };
        let pressure = mem.pressure_percentage();
        prop_assert!(pressure.is_finite());
        prop_assert!(pressure >= 0.0);
    }

    #[test]
    fn history_keeps_last_n_in_push_order(
        capacity in 1usize..64,
        values in prop::collection::vec(0.0f64..100.0, 0..200),
    ) {
        let mut history = HistoryBuffer::new(capacity);
        for &v in &values {
            history.push_value(v);
        }
        let out = history.values();
        prop_assert_eq!(out.len(), capacity);

        if values.len() >= capacity {
            prop_assert_eq!(&out[..], &values[values.len() - capacity..]);
        } else {
            let zeros = capacity - values.len();
            prop_assert!(out[..zeros].iter().all(|&v| v == 0.0));
            prop_assert_eq!(&out[zeros..], &values[..]);
        }
    }

    #[test]
    fn disk_used_plus_available_is_total(
        total in any::<u64>(),
        available in any::<u64>(),
    ) {
        let disk = DiskStats::from_capacity(total, available);
        prop_assert_eq!(disk.used_bytes + disk.available_bytes, disk.total_bytes);
        prop_assert_eq!(disk.total_bytes, total);
    }
}

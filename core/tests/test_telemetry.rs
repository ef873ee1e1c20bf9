#[cfg(test)]
mod tests {
    use std::time::Duration;

    use fs_core::telemetry::{Stage, StageTimes, Telemetry, TelemetryCounters, TelemetrySnapshot};

    #[test]
    fn stage_times_accumulate() {
        let mut times = StageTimes::default();
        times.add(Stage::Read, Duration::from_millis(2));
        times.add(Stage::Read, Duration::from_millis(3));
        times.add(Stage::Compress, Duration::from_millis(1));

        assert_eq!(times.get(Stage::Read), Duration::from_millis(5));
        assert_eq!(times.get(Stage::Write), Duration::ZERO);
        assert_eq!(times.total(), Duration::from_millis(6));
        assert!(times.has_all(&[Stage::Read, Stage::Compress]));
        assert!(!times.has_all(&[Stage::Decompress]));
    }

    #[test]
    fn stage_display_names() {
        assert_eq!(Stage::Decompress.to_string(), "decompress");
        assert_eq!(Stage::Write.to_string(), "write");
    }

    #[test]
    fn compression_ratio_from_counters() {
        let mut counters = TelemetryCounters::default();
        counters.add_compress(1000, 250);
        let snapshot = TelemetrySnapshot::from(&counters, &StageTimes::default(), Duration::from_secs(1));
        assert!((snapshot.compression_ratio - 0.25).abs() < f64::EPSILON);

        let empty = TelemetrySnapshot::from(&TelemetryCounters::default(), &StageTimes::default(), Duration::ZERO);
        assert_eq!(empty.compression_ratio, 0.0);
    }

    #[test]
    fn counters_add_assign() {
        let mut a = TelemetryCounters::default();
        a.add_read(10);
        let mut b = TelemetryCounters::default();
        b.add_write(5);
        b.add_failure();
        a += b;
        assert_eq!(a.reads_completed, 1);
        assert_eq!(a.writes_completed, 1);
        assert_eq!(a.bytes_read + a.bytes_written, 15);
        assert_eq!(a.failures, 1);
    }

    #[test]
    fn shared_telemetry_snapshot_serializes() {
        let telemetry = Telemetry::new();
        telemetry.update(|c| c.add_read(42));
        telemetry.add_stage_time(Stage::Read, Duration::from_micros(10));

        let snapshot = telemetry.snapshot();
        assert_eq!(snapshot.counters.bytes_read, 42);
        assert!(snapshot.has_all_stages(&[Stage::Read]));

        let json = snapshot.to_json().unwrap();
        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.counters, snapshot.counters);
    }
}

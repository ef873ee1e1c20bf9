#[cfg(test)]
mod tests {
    use fs_core::config::FsConfig;
    use fs_core::constants::{
        DEFAULT_MAX_DECOMPRESSED_SIZE, DEFAULT_QUEUE_CAPACITY, MAX_DECOMPRESSED_SIZE_LIMIT, MAX_PATH_LEN,
        MAX_QUEUE_CAPACITY,
    };
    use fs_core::types::FsError;

    #[test]
    fn defaults() {
        let config = FsConfig::default();
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.max_path_len, MAX_PATH_LEN);
        assert_eq!(config.max_decompressed_size, DEFAULT_MAX_DECOMPRESSED_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = FsConfig::from_json_str(r#"{ "queue_capacity": 3 }"#).unwrap();
        assert_eq!(config, FsConfig::new(3));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = FsConfig::from_json_str(r#"{ "queue_capacity": 0 }"#).unwrap_err();
        assert!(matches!(err, FsError::InvalidConfig(_)));
        assert!(FsConfig::new(0).validate().is_err());
    }

    #[test]
    fn oversized_decompression_bound_is_rejected() {
        let at_limit = FsConfig::new(4).with_max_decompressed_size(MAX_DECOMPRESSED_SIZE_LIMIT);
        assert!(at_limit.validate().is_ok());

        for max in [MAX_DECOMPRESSED_SIZE_LIMIT + 1, isize::MAX as usize, usize::MAX] {
            let config = FsConfig::new(4).with_max_decompressed_size(max);
            assert!(matches!(config.validate(), Err(FsError::InvalidConfig(_))), "accepted {max}");
        }

        let json = format!(r#"{{ "max_decompressed_size": {} }}"#, usize::MAX);
        assert!(matches!(FsConfig::from_json_str(&json), Err(FsError::InvalidConfig(_))));
    }

    #[test]
    fn oversized_queue_capacity_is_rejected() {
        assert!(FsConfig::new(MAX_QUEUE_CAPACITY).validate().is_ok());
        assert!(matches!(
            FsConfig::new(MAX_QUEUE_CAPACITY + 1).validate(),
            Err(FsError::InvalidConfig(_))
        ));
        assert!(FsConfig::new(usize::MAX).validate().is_err());
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(FsConfig::from_json_str("{ nope"), Err(FsError::InvalidConfig(_))));
    }

    #[test]
    fn builders_and_serde_roundtrip() {
        let config = FsConfig::new(4).with_max_decompressed_size(1024).with_max_path_len(64);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(FsConfig::from_json_str(&json).unwrap(), config);
    }
}

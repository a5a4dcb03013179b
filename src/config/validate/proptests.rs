//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;
use proptest::prelude::*;

fn arb_valid_spec() -> impl Strategy<Value = GanSpec> {
    (
        3u32..8,       // log2(image_size)
        1usize..256,   // batch_size
        1e-6f32..1.0,  // lr
        1usize..100,   // epochs
        0.0f32..0.5,   // label_noise
        1usize..64,    // generator channel multiplier
    )
        .prop_map(|(log_size, batch_size, lr, epochs, label_noise, mult)| {
            let mut spec = GanSpec::new("images");
            spec.data.image_size = 1 << log_size;
            spec.data.batch_size = batch_size;
            spec.optimizer.lr = lr;
            spec.training.epochs = epochs;
            spec.training.label_noise = label_noise;
            spec.model.generator_channels = mult << (log_size - 3);
            spec
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_spec_passes(spec in arb_valid_spec()) {
        prop_assert!(validate_config(&spec).is_ok());
    }

    #[test]
    fn prop_valid_spec_builds_a_plan(spec in arb_valid_spec()) {
        let config = spec.gan_config();
        let widths = config.generator.stage_channels().unwrap();
        prop_assert_eq!(widths.last().copied(), Some(3));
        prop_assert_eq!(4usize << widths.len(), spec.data.image_size);
    }

    #[test]
    fn prop_zero_batch_size_fails(spec in arb_valid_spec()) {
        let mut spec = spec;
        spec.data.batch_size = 0;
        prop_assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidBatchSize(0))));
    }

    #[test]
    fn prop_non_power_of_two_size_fails(spec in arb_valid_spec(), extra in 1usize..7) {
        let mut spec = spec;
        spec.data.image_size += extra;
        prop_assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidImageSize(_))));
    }
}

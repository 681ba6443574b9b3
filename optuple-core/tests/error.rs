// Error handling tests for optuple

mod common;

use common::*;
use optuple_core::{none, some, Opt, OptionError};
use proptest::prelude::*;
use std::any::Any;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Test that narrowing casts fail only for present, out-of-range payloads
    #[test]
    fn test_cast_errors(opt in arb_opt_int()) {
        let cast = opt.cast::<u8>();
        match opt {
            Opt::Present(v) if (0..=255).contains(&v) => {
                prop_assert_eq!(cast, Ok(some(v as u8)));
            }
            Opt::Present(_) => {
                let is_cast_error = matches!(cast, Err(OptionError::InvalidCast { .. }));
                prop_assert!(is_cast_error);
            }
            Opt::Absent => prop_assert_eq!(cast, Ok(none())),
        }
    }
}

#[test]
fn test_get_absent_is_invalid_state() {
    match none::<i32>().get() {
        Err(OptionError::InvalidState(msg)) => assert!(msg.contains("i32")),
        other => panic!("Expected InvalidState error, got {:?}", other),
    }
}

#[test]
fn test_cast_error_names_types() {
    let err = some(-1i64).cast::<u32>().unwrap_err();
    assert_eq!(
        err,
        OptionError::InvalidCast {
            from: "i64",
            to: "u32"
        }
    );
}

#[test]
fn test_downcast() {
    let boxed: Opt<Box<dyn Any>> = some(Box::new(42i32) as Box<dyn Any>);
    assert_eq!(boxed.downcast::<i32>(), Ok(some(42)));

    let boxed: Opt<Box<dyn Any>> = some(Box::new(42i32) as Box<dyn Any>);
    match boxed.downcast::<String>() {
        Err(OptionError::InvalidCast { to, .. }) => assert!(to.contains("String")),
        other => panic!("Expected InvalidCast error, got {:?}", other),
    }

    assert_eq!(none::<Box<dyn Any>>().downcast::<String>(), Ok(none()));
}

#[test]
fn test_unordered_payloads_fail_comparison() {
    let err = some(f64::NAN).try_cmp(&some(1.0)).unwrap_err();
    assert_eq!(err, OptionError::ComparisonNotSupported { type_name: "f64" });
    assert!(err.to_string().contains("f64"));
}

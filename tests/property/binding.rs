//! Property-based tests for argument binding

use nestcli::bind::bind;
use nestcli::value::{ParamKind, Value};
use nestcli::BindError;
use proptest::prelude::*;

fn supported_kind() -> impl Strategy<Value = ParamKind> {
    prop::sample::select(vec![
        ParamKind::I8,
        ParamKind::I16,
        ParamKind::I32,
        ParamKind::I64,
        ParamKind::Isize,
        ParamKind::U8,
        ParamKind::U16,
        ParamKind::U32,
        ParamKind::U64,
        ParamKind::Usize,
        ParamKind::F32,
        ParamKind::F64,
        ParamKind::Bool,
        ParamKind::Str,
    ])
}

/// Any in-range value of any supported kind.
fn any_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i8>().prop_map(Value::I8),
        any::<i16>().prop_map(Value::I16),
        any::<i32>().prop_map(Value::I32),
        any::<i64>().prop_map(Value::I64),
        any::<isize>().prop_map(Value::Isize),
        any::<u8>().prop_map(Value::U8),
        any::<u16>().prop_map(Value::U16),
        any::<u32>().prop_map(Value::U32),
        any::<u64>().prop_map(Value::U64),
        any::<usize>().prop_map(Value::Usize),
        prop::num::f32::NORMAL.prop_map(Value::F32),
        prop::num::f64::NORMAL.prop_map(Value::F64),
        any::<bool>().prop_map(Value::Bool),
        ".*".prop_map(Value::Str),
    ]
}

/// Test that bind yields exactly one value per kind, or an error
#[test]
fn test_bind_is_never_partial() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                prop::collection::vec(supported_kind(), 0..6),
                prop::collection::vec("[-+0-9a-zA-Z.]{0,6}", 0..8),
            ),
            |(kinds, tokens)| {
                match bind(&kinds, &tokens) {
                    Ok(values) => {
                        prop_assert_eq!(values.len(), kinds.len());
                        for (value, kind) in values.iter().zip(&kinds) {
                            prop_assert_eq!(value.kind(), *kind);
                        }
                    }
                    Err(BindError::MissingArguments { expected, got }) => {
                        prop_assert_eq!(expected, kinds.len());
                        prop_assert_eq!(got, tokens.len());
                        prop_assert!(tokens.len() < kinds.len());
                    }
                    Err(err) => {
                        let index = err.index().unwrap();
                        prop_assert!(index < kinds.len());
                        prop_assert!(tokens.len() >= kinds.len());
                    }
                }
                Ok(())
            },
        )
        .unwrap();
}

/// Test that canonical text binds back to the same value for every kind
#[test]
fn test_canonical_text_round_trips() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&any_value(), |value| {
            let text = value.to_string();
            let bound = bind(&[value.kind()], &[text]).unwrap();
            prop_assert_eq!(bound, vec![value]);
            Ok(())
        })
        .unwrap();
}

/// Test the i8 boundary on both sides
#[test]
fn test_i8_boundary() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(-1000i32..1000), |n| {
            let result = bind(&[ParamKind::I8], &[n.to_string()]);
            if (i8::MIN as i32..=i8::MAX as i32).contains(&n) {
                prop_assert_eq!(result.unwrap(), vec![Value::I8(n as i8)]);
            } else {
                let is_overflow = matches!(result, Err(BindError::IntegerOverflow { index: 0, .. }));
                prop_assert!(is_overflow);
            }
            Ok(())
        })
        .unwrap();
}

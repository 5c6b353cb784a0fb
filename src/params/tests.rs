use super::*;

#[test]
fn global_key_round_trips_through_id_and_name() {
    for key in GlobalParamKey::all() {
        assert_eq!(GlobalParamKey::from_id(key.id()), Some(key));
        assert_eq!(GlobalParamKey::from_name(key.canonical_name()), Some(key));
        assert_eq!(
            GlobalParamKey::from_name(&key.canonical_name().to_ascii_lowercase()),
            Some(key)
        );
    }
}

#[test]
fn frame_key_round_trips_through_id_and_name() {
    for key in FrameParamKey::all() {
        assert_eq!(FrameParamKey::from_id(key.id()), Some(key));
        assert_eq!(FrameParamKey::from_name(key.canonical_name()), Some(key));
    }
}

#[test]
fn legacy_frame_aliases_resolve() {
    assert_eq!(
        FrameParamKey::from_name("voltEntranceIFTIn"),
        Some(FrameParamKey::VoltEntranceHpfIn)
    );
    assert_eq!(
        FrameParamKey::from_name("a2"),
        Some(FrameParamKey::MassCalibrationCoefficientA2)
    );
    assert_eq!(
        FrameParamKey::from_name("Temperature"),
        Some(FrameParamKey::AmbientTemperature)
    );
}

#[test]
fn unknown_name_resolves_to_none() {
    assert_eq!(FrameParamKey::from_name("NotARealParameter"), None);
    assert_eq!(GlobalParamKey::from_id(-1), None);
}

#[test]
fn coerce_strips_trailing_dot_zero() {
    let v = value::coerce("42.0", ParamDataType::Int, false).unwrap();
    assert_eq!(v, ParamValue::Int(42));
}

#[test]
fn coerce_inf_maps_to_type_extremes() {
    assert_eq!(
        value::coerce("Inf", ParamDataType::Int, false).unwrap(),
        ParamValue::Int(i32::MAX)
    );
    assert_eq!(
        value::coerce("-inf", ParamDataType::Double, false).unwrap(),
        ParamValue::Double(f64::MIN)
    );
}

#[test]
fn coerce_empty_string_is_nan_for_floats() {
    match value::coerce("", ParamDataType::Double, false).unwrap() {
        ParamValue::Double(v) => assert!(v.is_nan()),
        other => panic!("expected Double(NaN), got {other:?}"),
    }
}

#[test]
fn coerce_failure_preserves_original_string_when_not_strict() {
    let v = value::coerce("not-a-number", ParamDataType::Int, false).unwrap();
    assert_eq!(v, ParamValue::String("not-a-number".to_string()));
}

#[test]
fn coerce_failure_returns_none_when_strict() {
    assert_eq!(value::coerce("not-a-number", ParamDataType::Int, true), None);
}

#[test]
fn unknown_key_warning_fires_once_per_id() {
    let warnings = UnknownKeyWarnings::new();
    assert!(warnings.warn_once(999, "frame"));
    assert!(!warnings.warn_once(999, "frame"));
    assert!(!warnings.warn_once(999, "frame"));
    assert!(warnings.warn_once(1000, "frame"));
}

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use proptest::prelude::*;
use sif_adk::value::{converter_for, formatter_for, Primitive, SifDecimal, SifDuration};
use sif_adk::{SifValue, SifVersion};

const ERAS: [SifVersion; 2] = [SifVersion::SIF15R1, SifVersion::SIF21];

fn date() -> impl Strategy<Value = NaiveDate> {
    (1000i32..=9999, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn time() -> impl Strategy<Value = NaiveTime> {
    (0u32..24, 0u32..60, 0u32..60).prop_map(|(h, m, s)| NaiveTime::from_hms_opt(h, m, s).unwrap())
}

fn duration() -> impl Strategy<Value = SifDuration> {
    (
        any::<bool>(),
        0u32..50,
        0u32..12,
        0u32..400,
        0u32..24,
        0u32..60,
        0u32..60,
        0u32..1000,
    )
        .prop_map(
            |(negative, years, months, days, hours, minutes, seconds, millis)| SifDuration {
                negative,
                years,
                months,
                days,
                hours,
                minutes,
                seconds,
                millis,
            },
        )
}

fn primitive() -> impl Strategy<Value = Primitive> {
    prop_oneof![
        "[A-Za-z0-9 ]{1,24}".prop_map(Primitive::String),
        any::<i32>().prop_map(Primitive::Int),
        any::<u32>().prop_map(Primitive::UInt),
        any::<i64>().prop_map(Primitive::Long),
        (-1_000_000_000_000i64..1_000_000_000_000, 0u32..=12)
            .prop_map(|(m, s)| Primitive::Decimal(SifDecimal::new(i128::from(m), s))),
        any::<bool>().prop_map(Primitive::Boolean),
        date().prop_map(Primitive::Date),
        time().prop_map(Primitive::Time),
        (date(), time()).prop_map(|(d, t)| Primitive::DateTime(NaiveDateTime::new(d, t))),
        duration().prop_map(Primitive::Duration),
    ]
}

proptest! {
    #[test]
    fn test_present_values_round_trip_in_both_eras(value in primitive()) {
        let value = SifValue::from_primitive(value);
        let converter = converter_for(value.category());
        for version in ERAS {
            let formatter = formatter_for(version);
            let text = converter.to_text(formatter, &value).unwrap();
            prop_assert!(text.is_some());
            let parsed = converter.parse(formatter, text.as_deref()).unwrap();
            prop_assert_eq!(&parsed, &value);
        }
    }

    #[test]
    fn test_absent_values_round_trip_in_both_eras(value in primitive()) {
        let absent = SifValue::absent(value.data_type());
        let converter = converter_for(absent.category());
        for version in ERAS {
            let formatter = formatter_for(version);
            let text = converter.to_text(formatter, &absent).unwrap();
            prop_assert_eq!(text.as_deref(), None);
            let parsed = converter.parse(formatter, None).unwrap();
            prop_assert!(parsed.is_absent());
            prop_assert_eq!(parsed.category(), absent.category());
        }
    }
}

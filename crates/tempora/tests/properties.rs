use proptest::prelude::*;
use tempora::{construct, get, ConstructOptions, Formats, Temporal, Zone};

fn temporal() -> impl Strategy<Value = Temporal> {
    (
        1970i32..2500,
        1u32..=12,
        1u32..=28,
        0u32..24,
        0u32..60,
        0u32..60,
        0u32..1_000_000_000,
        -14 * 60i32..=14 * 60,
    )
        .prop_map(|(y, mo, d, h, mi, s, nanos, offset_minutes)| {
            let offset = chrono::FixedOffset::east_opt(offset_minutes * 60).unwrap();
            Temporal::new(y, mo, d, h, mi, s, nanos, &Zone::Fixed(offset)).unwrap()
        })
}

proptest! {
    #[test]
    fn prop_iso_rendering_round_trips(t in temporal()) {
        let rendered = t.to_iso8601();
        let parsed = get(rendered.as_str()).unwrap();
        prop_assert_eq!(parsed, t, "rendered as {}", rendered);
    }

    #[test]
    fn prop_first_structural_match_wins(
        y in 2000i32..2100,
        a in 1u32..=12,
        b in 1u32..=12,
    ) {
        // Both layouts match "YYYY/aa/bb" structurally; the first one decides.
        let text = format!("{y}/{a:02}/{b:02}");
        let formats = Formats::new(&["YYYY/MM/DD", "YYYY/DD/MM"]).unwrap();
        let t = construct(text.as_str(), &ConstructOptions::default().with_formats(formats)).unwrap();
        prop_assert_eq!((t.month(), t.day()), (a, b));

        let formats = Formats::new(&["YYYY/DD/MM", "YYYY/MM/DD"]).unwrap();
        let t = construct(text.as_str(), &ConstructOptions::default().with_formats(formats)).unwrap();
        prop_assert_eq!((t.month(), t.day()), (b, a));
    }

    #[test]
    fn prop_epoch_seconds_are_exact(seconds in -62_135_596_800i64..=253_402_300_799) {
        let t = get(seconds).unwrap();
        prop_assert_eq!(t.timestamp(), seconds);
        prop_assert_eq!(t.offset().local_minus_utc(), 0);
    }
}

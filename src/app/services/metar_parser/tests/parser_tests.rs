//! Tests for the full report parser

use super::*;
use crate::app::models::{Intensity, Phenomenon, Qualifier, Sky, WindDirection};
use crate::app::services::metar_parser::parse_report;

/// Test the complete thunderstorm report decodes every field
///
/// Purpose: Pins the end-to-end behaviour including last-wins cloud handling
/// Benefit: Guards the tokenizer, every decoder and the merge policy together
#[test]
fn test_parse_thunderstorm_report() {
    let report = parse(THUNDERSTORM_REPORT);

    assert_eq!(
        report.observation_time,
        Some(Utc.with_ymd_and_hms(2024, 3, 22, 17, 51, 0).unwrap())
    );
    assert_eq!(report.wind_direction, Some(WindDirection::S));
    assert_eq!(report.wind_speed_knots, Some(15.0));
    assert_eq!(report.wind_gust_knots, Some(25.0));
    assert_eq!(report.visibility_miles, Some(0.25));

    let condition = report.condition.unwrap();
    assert_eq!(condition.intensity, Intensity::Heavy);
    assert_eq!(condition.qualifier, Qualifier::Thunderstorm);
    assert_eq!(condition.phenomenon, Phenomenon::Rain);
    assert!(condition.significant);

    assert_eq!(report.sky, Some(Sky::Overcast));
    assert_close(report.temperature_f.unwrap(), 64.4, 1e-9);
    assert_close(report.dew_point_f.unwrap(), 62.6, 1e-9);
    assert_eq!(report.pressure_inhg, Some(29.92));
    assert_eq!(report.field_count(), 10);
}

#[test]
fn test_first_wins_policy_keeps_first_cloud_layer() {
    let report = create_test_parser(DuplicateFieldPolicy::FirstWins).parse(THUNDERSTORM_REPORT);
    assert_eq!(report.sky, Some(Sky::Broken));
    assert_eq!(report.pressure_inhg, Some(29.92));
}

#[test]
fn test_cavok_sets_visibility_and_sky() {
    let report = parse("EGLL 251150Z 24008KT CAVOK 12/05 Q1021");

    assert_close(report.visibility_miles.unwrap(), 6.2137, 1e-3);
    assert_eq!(report.sky, Some(Sky::Clear));
    assert_close(report.pressure_inhg.unwrap(), 30.1401, 1e-3);
}

#[test]
fn test_cloud_after_cavok_overrides_sky() {
    let report = parse("CAVOK FEW040");
    assert_eq!(report.sky, Some(Sky::Few));

    let report = create_test_parser(DuplicateFieldPolicy::FirstWins).parse("CAVOK FEW040");
    assert_eq!(report.sky, Some(Sky::Clear));
}

#[test]
fn test_remarks_are_ignored() {
    let report = parse("KORD 111251Z 27012KT 10SM FEW250 M09/M17 A3036 RMK AO2 TSB45 SLP285 Q0999");

    assert_eq!(report.pressure_inhg, Some(30.36));
    assert!(report.condition.is_none());
}

#[test]
fn test_remarks_kept_when_stripping_disabled() {
    let parser = create_test_parser(DuplicateFieldPolicy::LastWins).with_strip_remarks(false);
    let report = parser.parse("A3036 RMK Q0999");

    assert_close(report.pressure_inhg.unwrap(), 29.5005, 1e-3);
}

#[test]
fn test_parse_empty_and_garbage() {
    assert!(parse("").is_empty());
    assert!(parse("NIL=").is_empty());
    assert!(parse("the quick brown fox").is_empty());
}

/// Count warning events emitted while `f` runs
fn count_warnings(f: impl FnOnce()) -> usize {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&count)));
    tracing::subscriber::with_default(subscriber, f);
    count.load(Ordering::SeqCst)
}

/// Test the parser warns only when no group is recognised
///
/// Purpose: Validates the warning for unrecognisable report text
/// Benefit: Library callers see the warning without going through the CLI
#[test]
fn test_unrecognised_report_logs_warning() {
    assert_eq!(count_warnings(|| assert!(parse("NIL=").is_empty())), 1);
    assert_eq!(count_warnings(|| assert!(!parse("18015KT A2992").is_empty())), 0);
}

#[test]
fn test_malformed_tokens_leave_fields_unknown() {
    // Hour 25 and a bearing beyond 360 match their patterns but do not decode
    let report = parse("222551Z 40010KT");

    assert!(report.observation_time.is_none());
    assert_eq!(report.wind_direction, None);
    assert_eq!(report.wind_speed_knots, Some(10.0));
}

#[test]
fn test_unitless_wind_group_defaults_to_knots() {
    let report = parse("221751Z 18015 1/4SM");

    assert_eq!(report.wind_direction, Some(WindDirection::S));
    assert_eq!(report.wind_speed_knots, Some(15.0));
    assert_eq!(report.visibility_miles, Some(0.25));
}

#[test]
fn test_calm_wind_and_international_visibility() {
    let report = parse("LFPG 250900Z 00000KT 0800 FG VV002 M01/M01 Q1030");

    assert_eq!(report.wind_direction, Some(WindDirection::Calm));
    assert_close(report.visibility_miles.unwrap(), 0.4971, 1e-3);
    assert_eq!(report.condition.unwrap().phenomenon, Phenomenon::Fog);
    assert!(report.sky.is_none());
    assert_close(report.temperature_f.unwrap(), 30.2, 1e-9);
}

#[test]
fn test_parse_into_accumulates() {
    let parser = create_test_parser(DuplicateFieldPolicy::LastWins);
    let mut report = Report::new();

    parser.parse_into("18015KT", &mut report);
    parser.parse_into("A2992", &mut report);

    assert_eq!(report.wind_speed_knots, Some(15.0));
    assert_eq!(report.pressure_inhg, Some(29.92));
}

#[test]
fn test_parse_report_uses_defaults() {
    let report = parse_report("18015KT 10SM SKC 20/10 A3001=");

    assert_eq!(report.wind_direction, Some(WindDirection::S));
    assert_eq!(report.sky, Some(Sky::Clear));
    assert_eq!(report.pressure_inhg, Some(30.01));
}

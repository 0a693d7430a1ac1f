//! Tests for lunar phase and phase-instant finding

use super::*;
use crate::app::services::astronomy::{moon_position, upcoming_moon_phases};

const SYNODIC_MONTH_SECONDS: i64 = 2_551_443;

#[test]
fn test_moon_phase_at_known_new_and_full_moons() {
    let new = moon_position(utc(2024, 1, 11, 11, 57, 0));
    assert!(angle_difference(new.phase, 0.0).abs() < 2.0);
    assert!(new.illumination() < 0.01);

    let full = moon_position(utc(2024, 1, 25, 17, 54, 0));
    assert!(angle_difference(full.phase, 180.0).abs() < 2.0);
    assert!(full.illumination() > 0.99);
}

#[test]
fn test_moon_position_ranges() {
    let moon = moon_position(utc(2024, 1, 1, 0, 0, 0));

    assert!((moon.phase - 236.1).abs() < 0.5);
    assert!((moon.latitude - 12.77).abs() < 0.5);
    assert!((moon.ecliptic_latitude - 3.65).abs() < 0.5);

    for day in 0..60 {
        let moon = moon_position(utc(2024, 1, 1, 0, 0, 0) + chrono::Duration::days(day));
        assert!((0.0..360.0).contains(&moon.phase));
        assert!(moon.ecliptic_latitude.abs() <= 5.2);
        assert!(moon.latitude.abs() <= 29.0);
    }
}

/// Test that the phase repeats after one mean synodic month
///
/// Purpose: Checks the phase model against the mean lunation length
/// Benefit: Catches sign and unit errors in the perturbation terms
///
/// Real lunations run several hours longer or shorter than the mean, which
/// moves the phase by up to about 4.5° at the worst points of 2024, so
/// every half day of the year is sampled against a 6° bound.
#[test]
fn test_phase_repeats_after_synodic_month() {
    let start = utc(2024, 1, 1, 0, 0, 0);
    for step in 0..730 {
        let at = start + chrono::Duration::hours(12 * step);
        let first = moon_position(at).phase;
        let second = moon_position(at + chrono::Duration::seconds(SYNODIC_MONTH_SECONDS)).phase;
        assert!(
            angle_difference(first, second).abs() < 6.0,
            "{}: {} vs {}",
            at,
            first,
            second
        );
    }
}

#[test]
fn test_upcoming_moon_phases_january_2024() {
    let phases = upcoming_moon_phases(utc(2024, 1, 1, 0, 0, 0));

    // Published times, within the accuracy of the model
    assert_near_instant(phases.new, utc(2024, 1, 11, 11, 57, 0), 30 * 60);
    assert_near_instant(phases.first_quarter, utc(2024, 1, 18, 3, 53, 0), 30 * 60);
    assert_near_instant(phases.full, utc(2024, 1, 25, 17, 54, 0), 30 * 60);
    assert_near_instant(phases.third_quarter, utc(2024, 1, 4, 3, 30, 0), 30 * 60);
}

#[test]
fn test_upcoming_moon_phases_are_in_the_next_lunation() {
    let start = utc(2024, 6, 1, 0, 0, 0);
    let phases = upcoming_moon_phases(start);

    for (name, at) in phases.chronological() {
        assert!(at > start, "{} is in the past", name);
        assert!((at - start).num_seconds() < SYNODIC_MONTH_SECONDS, "{} too late", name);
    }

    assert_near_instant(phases.new, utc(2024, 6, 6, 12, 38, 0), 30 * 60);
    assert_near_instant(phases.full, utc(2024, 6, 22, 1, 8, 0), 30 * 60);

    let names: Vec<&str> = phases.chronological().iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec!["New moon", "First quarter", "Full moon", "Third quarter"]);
}

#[test]
fn test_found_phase_instants_hit_their_targets() {
    let phases = upcoming_moon_phases(utc(2024, 3, 1, 0, 0, 0));

    assert!(angle_difference(moon_position(phases.new).phase, 0.0).abs() < 0.05);
    assert!(angle_difference(moon_position(phases.first_quarter).phase, 90.0).abs() < 0.05);
    assert!(angle_difference(moon_position(phases.full).phase, 180.0).abs() < 0.05);
    assert!(angle_difference(moon_position(phases.third_quarter).phase, 270.0).abs() < 0.05);
}

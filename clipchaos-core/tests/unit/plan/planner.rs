use super::*;
use std::collections::HashSet;

use crate::catalog::descriptor::{CATALOG, LevelRange};

fn default_settings() -> Vec<EffectSetting> {
    crate::config::settings::resolve_config(&serde_json::Value::Null)
        .unwrap()
        .settings
}

/// Defaults with every probability pinned and everything but `keep` disabled.
fn solo(keep: EffectId, probability: f64) -> Vec<EffectSetting> {
    let mut settings = default_settings();
    for s in &mut settings {
        s.enabled = s.id == keep;
        s.probability = probability;
    }
    settings
}

#[test]
fn same_seed_reproduces_the_same_plan() {
    let settings = default_settings();
    let limits = ChainLimits::default();
    for seed in [0u64, 7, 42, u64::MAX] {
        let a = plan_chain(&settings, limits, seed).unwrap();
        let b = plan_chain(&settings, limits, seed).unwrap();
        assert_eq!(a, b, "seed {seed} diverged");
    }
}

#[test]
fn chain_is_bounded_and_free_of_duplicates() {
    let settings = default_settings();
    let limits = ChainLimits::default();
    for seed in 0..200u64 {
        let plan = plan_chain(&settings, limits, seed).unwrap();
        assert!(plan.len() <= CATALOG.len());
        let ids: HashSet<_> = plan.iter().map(|s| s.effect.id()).collect();
        assert_eq!(ids.len(), plan.len(), "duplicate effect at seed {seed}");
    }
}

#[test]
fn certain_and_impossible_probabilities() {
    // mirror at 1.0, invert at 0.0, everything else off: the plan is always
    // exactly [mirror], whatever invert's level range says.
    let mut settings = solo(EffectId::Mirror, 1.0);
    for s in &mut settings {
        if s.id == EffectId::Invert {
            s.enabled = true;
            s.probability = 0.0;
        }
    }
    for seed in 0..100u64 {
        let plan = plan_chain(&settings, ChainLimits::default(), seed).unwrap();
        assert_eq!(plan.len(), 1, "seed {seed}");
        assert_eq!(plan[0].effect.id(), EffectId::Mirror);
    }
}

#[test]
fn drawn_levels_stay_inside_the_configured_range() {
    let mut settings = solo(EffectId::StutterLoop, 1.0);
    for s in &mut settings {
        if s.id == EffectId::StutterLoop {
            s.level = Some(LevelRange::Int { min: 2, max: 4 });
        }
    }
    for seed in 0..1000u64 {
        let plan = plan_chain(&settings, ChainLimits::default(), seed).unwrap();
        match plan[0].effect {
            PlannedEffect::StutterLoop { repeats } => {
                assert!((2..=4).contains(&repeats), "seed {seed} drew {repeats}")
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }
}

#[test]
fn empty_plan_is_valid() {
    let mut settings = default_settings();
    for s in &mut settings {
        s.enabled = false;
    }
    let plan = plan_chain(&settings, ChainLimits::default(), 5).unwrap();
    assert!(plan.is_empty());
}

#[test]
fn max_len_truncates_in_catalog_order() {
    let mut settings = default_settings();
    for s in &mut settings {
        s.probability = 1.0;
    }
    let limits = ChainLimits { min_len: 0, max_len: 3 };
    let plan = plan_chain(&settings, limits, 9).unwrap();
    assert_eq!(plan.len(), 3);
    let expected: Vec<_> = CATALOG.iter().take(3).map(|d| d.id).collect();
    let got: Vec<_> = plan.iter().map(|s| s.effect.id()).collect();
    assert_eq!(got, expected);
}

#[test]
fn min_len_forces_enabled_effects_in() {
    let mut settings = default_settings();
    for s in &mut settings {
        s.probability = 0.0;
    }
    let limits = ChainLimits { min_len: 2, max_len: CATALOG.len() };
    let plan = plan_chain(&settings, limits, 3).unwrap();
    assert_eq!(plan.len(), 2);
    let got: Vec<_> = plan.iter().map(|s| s.effect.id()).collect();
    assert_eq!(got, vec![EffectId::Invert, EffectId::Mirror]);
}

#[test]
fn forcing_is_deterministic_too() {
    let mut settings = default_settings();
    for s in &mut settings {
        s.probability = 0.0;
    }
    let limits = ChainLimits { min_len: 4, max_len: CATALOG.len() };
    let a = plan_chain(&settings, limits, 11).unwrap();
    let b = plan_chain(&settings, limits, 11).unwrap();
    assert_eq!(a, b);
}

#[test]
fn inverted_limits_are_a_planning_failure() {
    let err = plan_chain(&default_settings(), ChainLimits { min_len: 5, max_len: 2 }, 0)
        .unwrap_err();
    assert!(err.to_string().contains("planning failure"));
}

#[test]
fn corrupt_probability_is_a_planning_failure() {
    let mut settings = default_settings();
    settings[0].probability = f64::NAN;
    let err = plan_chain(&settings, ChainLimits::default(), 0).unwrap_err();
    assert!(err.to_string().contains("planning failure"));
}

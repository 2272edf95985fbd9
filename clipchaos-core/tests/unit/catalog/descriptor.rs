use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn names_roundtrip_for_every_catalog_entry() {
    for desc in CATALOG {
        assert_eq!(EffectId::from_name(desc.id.name()), Some(desc.id));
    }
}

#[test]
fn unknown_name_does_not_parse() {
    assert_eq!(EffectId::from_name("zalgo"), None);
}

#[test]
fn catalog_defaults_are_sane() {
    for desc in CATALOG {
        assert!(
            (0.0..=1.0).contains(&desc.probability),
            "probability out of range for {}",
            desc.id
        );
        if let Some(range) = desc.level {
            assert!(range.is_valid(), "invalid default range for {}", desc.id);
        }
    }
}

#[test]
fn int_range_draws_stay_inclusive() {
    let range = LevelRange::Int { min: 2, max: 4 };
    for seed in 0..1000u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        match range.draw(&mut rng) {
            Level::Int(v) => assert!((2..=4).contains(&v), "drew {v}"),
            other => panic!("int range drew {other:?}"),
        }
    }
}

#[test]
fn float_range_draws_stay_inclusive() {
    let range = LevelRange::Float { min: 0.5, max: 2.0 };
    for seed in 0..1000u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        match range.draw(&mut rng) {
            Level::Float(v) => assert!((0.5..=2.0).contains(&v), "drew {v}"),
            other => panic!("float range drew {other:?}"),
        }
    }
}

#[test]
fn level_coercions() {
    assert_eq!(Level::Int(3).as_f64(), 3.0);
    assert_eq!(Level::Float(2.6).as_i64(), 3);
    assert_eq!(Level::Int(7).as_i64(), 7);
}

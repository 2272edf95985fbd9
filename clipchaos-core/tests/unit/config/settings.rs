use super::*;
use serde_json::json;

#[test]
fn null_document_resolves_to_catalog_defaults() {
    let resolved = resolve_config(&Value::Null).unwrap();
    assert_eq!(resolved.settings.len(), CATALOG.len());
    assert!(resolved.warnings.is_empty());
    assert_eq!(resolved.chain, ChainLimits::default());
    for (setting, desc) in resolved.settings.iter().zip(CATALOG) {
        assert_eq!(setting.id, desc.id);
        assert_eq!(setting.enabled, desc.enabled);
        assert_eq!(setting.probability, desc.probability);
        assert_eq!(setting.level, desc.level);
    }
}

#[test]
fn every_resolved_probability_is_in_unit_interval() {
    let doc = json!({ "effects": {
        "speed": { "probability": 1.7 },
        "invert": { "probability": -0.5 },
    }});
    let resolved = resolve_config(&doc).unwrap();
    for setting in &resolved.settings {
        assert!((0.0..=1.0).contains(&setting.probability), "{}", setting.id);
    }
    let speed = resolved.settings.iter().find(|s| s.id == EffectId::Speed).unwrap();
    assert_eq!(speed.probability, 1.0);
    let invert = resolved.settings.iter().find(|s| s.id == EffectId::Invert).unwrap();
    assert_eq!(invert.probability, 0.0);
}

#[test]
fn overrides_merge_over_defaults() {
    let doc = json!({ "effects": {
        "speed": { "enabled": false, "probability": 0.9, "level_range": [0.8, 1.2] },
    }});
    let resolved = resolve_config(&doc).unwrap();
    assert!(resolved.warnings.is_empty());
    let speed = resolved.settings.iter().find(|s| s.id == EffectId::Speed).unwrap();
    assert!(!speed.enabled);
    assert_eq!(speed.probability, 0.9);
    assert_eq!(speed.level, Some(LevelRange::Float { min: 0.8, max: 1.2 }));
    // Everything else untouched.
    let mirror = resolved.settings.iter().find(|s| s.id == EffectId::Mirror).unwrap();
    assert_eq!(mirror.probability, 0.20);
}

#[test]
fn int_level_ranges_parse_as_integers() {
    let doc = json!({ "effects": { "stutter_loop": { "level_range": [2, 4] } } });
    let resolved = resolve_config(&doc).unwrap();
    let stutter = resolved
        .settings
        .iter()
        .find(|s| s.id == EffectId::StutterLoop)
        .unwrap();
    assert_eq!(stutter.level, Some(LevelRange::Int { min: 2, max: 4 }));
}

#[test]
fn unknown_effect_warns_and_is_ignored() {
    let doc = json!({ "effects": { "zalgo": { "enabled": true } } });
    let resolved = resolve_config(&doc).unwrap();
    assert_eq!(resolved.settings.len(), CATALOG.len());
    assert!(resolved.warnings.iter().any(|w| w.contains("unknown effect 'zalgo'")));
}

#[test]
fn unknown_keys_warn_at_every_level() {
    let doc = json!({
        "wat": 1,
        "effects": { "speed": { "wat": true } },
        "chain": { "wat": 2 },
    });
    let resolved = resolve_config(&doc).unwrap();
    assert!(resolved.warnings.iter().any(|w| w.contains("unknown settings key 'wat'")));
    assert!(resolved.warnings.iter().any(|w| w.contains("'speed.wat'")));
    assert!(resolved.warnings.iter().any(|w| w.contains("'chain.wat'")));
}

#[test]
fn wrong_typed_overrides_warn_and_keep_defaults() {
    let doc = json!({ "effects": {
        "speed": { "probability": "fast", "enabled": "yes" },
        "invert": { "level_range": [1, 2] },
    }});
    let resolved = resolve_config(&doc).unwrap();
    let speed = resolved.settings.iter().find(|s| s.id == EffectId::Speed).unwrap();
    assert_eq!(speed.probability, 0.25);
    assert!(speed.enabled);
    let invert = resolved.settings.iter().find(|s| s.id == EffectId::Invert).unwrap();
    assert_eq!(invert.level, None);
    assert_eq!(resolved.warnings.len(), 3);
}

#[test]
fn inverted_level_range_warns_and_keeps_default() {
    let doc = json!({ "effects": { "speed": { "level_range": [2.0, 0.5] } } });
    let resolved = resolve_config(&doc).unwrap();
    let speed = resolved.settings.iter().find(|s| s.id == EffectId::Speed).unwrap();
    assert_eq!(speed.level, Some(LevelRange::Float { min: 0.5, max: 2.0 }));
    assert_eq!(resolved.warnings.len(), 1);
}

#[test]
fn chain_section_is_resolved() {
    let doc = json!({ "chain": { "min_len": 1, "max_len": 3 } });
    let resolved = resolve_config(&doc).unwrap();
    assert_eq!(resolved.chain, ChainLimits { min_len: 1, max_len: 3 });
}

#[test]
fn non_object_root_is_a_config_error() {
    let err = resolve_config(&json!([1, 2])).unwrap_err();
    assert!(err.to_string().contains("configuration error"));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let resolved = load_config(Path::new("/definitely/not/here/config.json")).unwrap();
    assert_eq!(resolved.settings.len(), CATALOG.len());
    assert!(resolved.warnings.is_empty());
}

#[test]
fn unparseable_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("parse"));
}

#[test]
fn default_document_resolves_cleanly_back() {
    let resolved = resolve_config(&default_document()).unwrap();
    assert!(resolved.warnings.is_empty(), "{:?}", resolved.warnings);
    let defaults = resolve_config(&Value::Null).unwrap();
    assert_eq!(resolved.settings, defaults.settings);
    assert_eq!(resolved.chain, defaults.chain);
}

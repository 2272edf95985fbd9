use std::path::Path;

use serde_json::{Map, Value, json};

use crate::catalog::descriptor::{CATALOG, EffectId, ExecutionKind, LevelRange};
use crate::foundation::error::{ChaosError, ChaosResult};

/// Effective per-effect setting for one run: a catalog entry merged with any
/// user override. Consumed read-only by the planner.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectSetting {
    /// Effect identity.
    pub id: EffectId,
    /// Execution strategy, always the catalog's (not overridable).
    pub kind: ExecutionKind,
    /// Whether the planner may include this effect.
    pub enabled: bool,
    /// Inclusion probability, clamped to [0.0, 1.0].
    pub probability: f64,
    /// Level bounds, `None` for effects without an intensity knob.
    pub level: Option<LevelRange>,
}

/// Bounds on the planned chain length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainLimits {
    /// Minimum number of steps; enabled effects are forced in (catalog order)
    /// to meet it. Zero means an empty plan is acceptable.
    pub min_len: usize,
    /// Maximum number of steps; the Bernoulli result is truncated to it.
    pub max_len: usize,
}

impl Default for ChainLimits {
    fn default() -> Self {
        Self {
            min_len: 0,
            max_len: CATALOG.len(),
        }
    }
}

/// Output of the configuration resolver: exactly one setting per catalog
/// entry, chain limits, and the non-fatal warnings produced while merging.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    /// One entry per catalog entry, in catalog order.
    pub settings: Vec<EffectSetting>,
    /// Resolved chain length bounds.
    pub chain: ChainLimits,
    /// Human-readable warnings for ignored overrides and unknown keys.
    pub warnings: Vec<String>,
}

/// Resolve a settings document against the catalog.
///
/// `Value::Null` resolves to pure defaults. Unknown effect identifiers and
/// unknown keys are ignored with a warning; a document whose root is neither
/// `null` nor an object is a configuration error.
pub fn resolve_config(doc: &Value) -> ChaosResult<ResolvedConfig> {
    let root = match doc {
        Value::Null => None,
        Value::Object(map) => Some(map),
        other => {
            return Err(ChaosError::config(format!(
                "settings root must be an object, got {}",
                json_kind(other)
            )));
        }
    };

    let mut warnings = Vec::new();
    let effects = match root.and_then(|m| m.get("effects")) {
        None => None,
        Some(Value::Object(map)) => Some(map),
        Some(other) => {
            warn(
                &mut warnings,
                format!("'effects' must be an object, got {}; ignored", json_kind(other)),
            );
            None
        }
    };

    if let Some(map) = root {
        for key in map.keys().filter(|k| *k != "effects" && *k != "chain") {
            warn(&mut warnings, format!("unknown settings key '{key}' ignored"));
        }
    }
    if let Some(map) = effects {
        for key in map.keys().filter(|k| EffectId::from_name(k).is_none()) {
            warn(&mut warnings, format!("unknown effect '{key}' ignored"));
        }
    }

    let mut settings = Vec::with_capacity(CATALOG.len());
    for desc in CATALOG {
        let mut setting = EffectSetting {
            id: desc.id,
            kind: desc.kind,
            enabled: desc.enabled,
            probability: desc.probability,
            level: desc.level,
        };
        if let Some(ov) = effects.and_then(|m| m.get(desc.id.name())) {
            apply_override(&mut setting, desc.level, ov, &mut warnings);
        }
        settings.push(setting);
    }

    let chain = resolve_chain(root.and_then(|m| m.get("chain")), &mut warnings);

    Ok(ResolvedConfig {
        settings,
        chain,
        warnings,
    })
}

/// Load and resolve a settings file. A missing file falls back entirely to
/// catalog defaults; an unreadable or unparseable one is a configuration
/// error.
pub fn load_config(path: &Path) -> ChaosResult<ResolvedConfig> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file, using catalog defaults");
            return resolve_config(&Value::Null);
        }
        Err(e) => {
            return Err(ChaosError::config(format!(
                "failed to read settings '{}': {e}",
                path.display()
            )));
        }
    };
    let doc: Value = serde_json::from_str(&text).map_err(|e| {
        ChaosError::config(format!("failed to parse settings '{}': {e}", path.display()))
    })?;
    resolve_config(&doc)
}

/// Build the settings document that reproduces the catalog defaults, in the
/// on-disk shape. Useful for seeding a `config.json` or echoing effective
/// settings.
pub fn default_document() -> Value {
    document_for(
        CATALOG.iter().map(|d| EffectSetting {
            id: d.id,
            kind: d.kind,
            enabled: d.enabled,
            probability: d.probability,
            level: d.level,
        }),
        ChainLimits::default(),
    )
}

/// Render resolved settings back into the on-disk document shape.
pub fn document_for(
    settings: impl IntoIterator<Item = EffectSetting>,
    chain: ChainLimits,
) -> Value {
    let mut effects = Map::new();
    for s in settings {
        let mut entry = Map::new();
        entry.insert("enabled".into(), Value::Bool(s.enabled));
        entry.insert("probability".into(), json!(s.probability));
        if let Some(range) = s.level {
            entry.insert("level_range".into(), level_range_value(range));
        }
        effects.insert(s.id.name().into(), Value::Object(entry));
    }
    json!({
        "effects": effects,
        "chain": { "min_len": chain.min_len, "max_len": chain.max_len },
    })
}

fn apply_override(
    setting: &mut EffectSetting,
    catalog_level: Option<LevelRange>,
    ov: &Value,
    warnings: &mut Vec<String>,
) {
    let name = setting.id.name();
    let Some(obj) = ov.as_object() else {
        warn(
            warnings,
            format!("override for '{name}' must be an object, got {}; ignored", json_kind(ov)),
        );
        return;
    };

    for (key, value) in obj {
        match key.as_str() {
            "enabled" => match value.as_bool() {
                Some(v) => setting.enabled = v,
                None => warn(warnings, format!("'{name}.enabled' must be a boolean; ignored")),
            },
            "probability" => match value.as_f64() {
                Some(p) if p.is_finite() => setting.probability = p.clamp(0.0, 1.0),
                _ => warn(
                    warnings,
                    format!("'{name}.probability' must be a finite number; ignored"),
                ),
            },
            "level_range" => {
                apply_level_override(setting, catalog_level, value, warnings);
            }
            other => warn(warnings, format!("unknown key '{name}.{other}' ignored")),
        }
    }
}

fn apply_level_override(
    setting: &mut EffectSetting,
    catalog_level: Option<LevelRange>,
    value: &Value,
    warnings: &mut Vec<String>,
) {
    let name = setting.id.name();
    let Some(catalog_range) = catalog_level else {
        warn(warnings, format!("'{name}' takes no level; level_range ignored"));
        return;
    };
    let bounds = value.as_array().filter(|a| a.len() == 2);
    let Some(bounds) = bounds else {
        warn(
            warnings,
            format!("'{name}.level_range' must be a [min, max] pair; ignored"),
        );
        return;
    };

    let parsed = match catalog_range {
        LevelRange::Int { .. } => match (bounds[0].as_i64(), bounds[1].as_i64()) {
            (Some(min), Some(max)) => Some(LevelRange::Int { min, max }),
            _ => None,
        },
        LevelRange::Float { .. } => match (bounds[0].as_f64(), bounds[1].as_f64()) {
            (Some(min), Some(max)) => Some(LevelRange::Float { min, max }),
            _ => None,
        },
    };
    match parsed {
        Some(range) if range.is_valid() => setting.level = Some(range),
        Some(_) => warn(
            warnings,
            format!("'{name}.level_range' bounds must be ordered and finite; ignored"),
        ),
        None => warn(
            warnings,
            format!("'{name}.level_range' entries have the wrong type; ignored"),
        ),
    }
}

fn resolve_chain(value: Option<&Value>, warnings: &mut Vec<String>) -> ChainLimits {
    let mut chain = ChainLimits::default();
    let Some(value) = value else {
        return chain;
    };
    let Some(obj) = value.as_object() else {
        warn(
            warnings,
            format!("'chain' must be an object, got {}; ignored", json_kind(value)),
        );
        return chain;
    };
    for (key, value) in obj {
        match key.as_str() {
            "min_len" => match value.as_u64() {
                Some(v) => chain.min_len = v as usize,
                None => warn(warnings, "'chain.min_len' must be a non-negative integer; ignored".into()),
            },
            "max_len" => match value.as_u64() {
                Some(v) => chain.max_len = v as usize,
                None => warn(warnings, "'chain.max_len' must be a non-negative integer; ignored".into()),
            },
            other => warn(warnings, format!("unknown key 'chain.{other}' ignored")),
        }
    }
    chain
}

fn level_range_value(range: LevelRange) -> Value {
    match range {
        LevelRange::Int { min, max } => json!([min, max]),
        LevelRange::Float { min, max } => json!([min, max]),
    }
}

fn warn(warnings: &mut Vec<String>, msg: String) {
    tracing::warn!("{msg}");
    warnings.push(msg);
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;

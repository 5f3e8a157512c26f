//! Config validation: unknown-key detection with Levenshtein suggestions
//! and value range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, ", did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for MonitorConfig.
///
/// Maintained by hand to match the struct hierarchy in monitor_config.rs.
/// Entries of the `[[components]]` array share the `components.` prefix.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [machine]
        "machine",
        "machine.name",
        "machine.line",
        "machine.utc_offset_hours",
        // [health]
        "health",
        "health.rpn_weight",
        "health.oee_weight",
        "health.threshold_good",
        "health.critical_threshold",
        "health.oee_min",
        "health.oee_max",
        // [availability]
        "availability",
        "availability.default_rate",
        // [downtime]
        "downtime",
        "downtime.performance_threshold",
        "downtime.quality_threshold",
        "downtime.feed_stage_performance",
        "downtime.pre_feed_stage_performance",
        "downtime.stage_tiebreak",
        "downtime.default_limit",
        // [estimator]
        "estimator",
        "estimator.timeout_ms",
        "estimator.min_duration_minutes",
        "estimator.max_duration_minutes",
        "estimator.low_ratio",
        "estimator.high_ratio",
        "estimator.cap_factor",
        "estimator.low_baseline_weight",
        "estimator.baseline_weight",
        // [[components]]
        "components",
        "components.name",
        "components.rpn_value",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`. Tables inside arrays are walked under the
/// array's own path, so `[[a]] b = 1` yields `["a", "a.b"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            match v {
                toml::Value::Table(_) => keys.extend(walk_toml_keys(v, &path)),
                toml::Value::Array(items) => {
                    for item in items.iter().filter(|i| i.is_table()) {
                        for nested in walk_toml_keys(item, &path) {
                            if !keys.contains(&nested) {
                                keys.push(nested);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }
    keys
}

/// Dotted paths of every float value that is NaN or infinite.
pub fn non_finite_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    match value {
        toml::Value::Float(f) if !f.is_finite() => vec![prefix.to_string()],
        toml::Value::Table(table) => table
            .iter()
            .flat_map(|(k, v)| {
                let path = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                non_finite_keys(v, &path)
            })
            .collect(),
        toml::Value::Array(items) => items
            .iter()
            .flat_map(|item| non_finite_keys(item, prefix))
            .collect(),
        _ => Vec::new(),
    }
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, d)| d <= 3)
        // Tie-break on the key itself so suggestions do not depend on hash order
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Never fails on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

fn percent_field(value: f64, field: &str, errors: &mut Vec<String>) {
    if !(0.0..=100.0).contains(&value) {
        errors.push(format!("{field} = {value:.2} is outside the percentage range (0-100)"));
    }
}

fn weight_field(value: f64, field: &str, errors: &mut Vec<String>) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(format!("{field} = {value:.3} must be within [0, 1]"));
    }
}

/// Validate value ranges on a parsed MonitorConfig.
///
/// Returns (errors, warnings): errors are impossible values that must
/// prevent startup, warnings are suspicious but not fatal.
pub fn validate_ranges(config: &super::MonitorConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let h = &config.health;
    percent_field(h.threshold_good, "health.threshold_good", &mut errors);
    percent_field(h.critical_threshold, "health.critical_threshold", &mut errors);
    percent_field(h.oee_min, "health.oee_min", &mut errors);
    percent_field(h.oee_max, "health.oee_max", &mut errors);

    percent_field(
        config.availability.default_rate,
        "availability.default_rate",
        &mut errors,
    );

    let d = &config.downtime;
    percent_field(d.performance_threshold, "downtime.performance_threshold", &mut errors);
    percent_field(d.quality_threshold, "downtime.quality_threshold", &mut errors);
    percent_field(d.feed_stage_performance, "downtime.feed_stage_performance", &mut errors);
    percent_field(
        d.pre_feed_stage_performance,
        "downtime.pre_feed_stage_performance",
        &mut errors,
    );

    let e = &config.estimator;
    if e.min_duration_minutes <= 0.0 {
        errors.push(format!(
            "estimator.min_duration_minutes = {:.1} must be > 0",
            e.min_duration_minutes
        ));
    }
    if e.low_ratio <= 0.0 {
        errors.push(format!("estimator.low_ratio = {:.3} must be > 0", e.low_ratio));
    }
    if e.cap_factor <= 0.0 {
        errors.push(format!("estimator.cap_factor = {:.3} must be > 0", e.cap_factor));
    }
    weight_field(e.low_baseline_weight, "estimator.low_baseline_weight", &mut errors);
    weight_field(e.baseline_weight, "estimator.baseline_weight", &mut errors);

    if !(-12..=14).contains(&config.machine.utc_offset_hours) {
        errors.push(format!(
            "machine.utc_offset_hours = {} is outside the real-world range (-12 to +14)",
            config.machine.utc_offset_hours
        ));
    }

    for c in &config.components {
        if c.rpn_value < 0.0 {
            errors.push(format!(
                "components '{}': rpn_value = {:.1} cannot be negative",
                c.name, c.rpn_value
            ));
        }
        if c.rpn_value > 1000.0 {
            warnings.push(ValidationWarning {
                field: "components.rpn_value".to_string(),
                message: format!(
                    "components '{}': rpn_value = {:.1} exceeds the 1-1000 FMEA scale",
                    c.name, c.rpn_value
                ),
                suggestion: None,
            });
        }
    }

    // Longer than a full day is almost certainly a unit mistake (hours vs minutes)
    if e.max_duration_minutes > 1440.0 {
        warnings.push(ValidationWarning {
            field: "estimator.max_duration_minutes".to_string(),
            message: format!(
                "estimator.max_duration_minutes = {:.0} exceeds one day",
                e.max_duration_minutes
            ),
            suggestion: None,
        });
    }

    if config.availability.default_rate < 50.0 {
        warnings.push(ValidationWarning {
            field: "availability.default_rate".to_string(),
            message: format!(
                "availability.default_rate = {:.1} is unusually pessimistic for an empty window",
                config.availability.default_rate
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

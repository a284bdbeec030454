//! Parameter schemas.
use super::{ParamValue, Parameters};
use crate::error::TabrlError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{btree_map::Iter, BTreeMap};

/// Type of a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Integer.
    Int,

    /// Floating-point number. Integer values are accepted.
    Float,

    /// Text.
    String,
}

/// Specification of a single tunable parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Type of the parameter.
    #[serde(rename = "type")]
    pub param_type: ParamType,

    /// Inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Inclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Value used when the parameter is not given.
    pub default: ParamValue,

    /// Accepted values of a text parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    /// Human readable description.
    pub description: String,
}

impl ParamSpec {
    fn new(param_type: ParamType, default: ParamValue, description: &str) -> Self {
        Self {
            param_type,
            min: None,
            max: None,
            default,
            options: None,
            description: description.to_string(),
        }
    }

    /// A floating-point parameter.
    pub fn float(default: f64, description: &str) -> Self {
        Self::new(ParamType::Float, ParamValue::Float(default), description)
    }

    /// An integer parameter.
    pub fn int(default: i64, description: &str) -> Self {
        Self::new(ParamType::Int, ParamValue::Int(default), description)
    }

    /// A text parameter restricted to `options`.
    pub fn choice(default: &str, options: &[&str], description: &str) -> Self {
        let mut spec = Self::new(ParamType::String, default.into(), description);
        spec.options = Some(options.iter().map(|s| s.to_string()).collect());
        spec
    }

    /// Sets the inclusive lower bound.
    pub fn min(mut self, v: f64) -> Self {
        self.min = Some(v);
        self
    }

    /// Sets the inclusive upper bound.
    pub fn max(mut self, v: f64) -> Self {
        self.max = Some(v);
        self
    }

    /// Checks `value` against the specification and returns it normalized to the
    /// parameter type.
    pub fn check(&self, name: &str, value: &ParamValue) -> Result<ParamValue> {
        let value = match (self.param_type, value) {
            (ParamType::Int, ParamValue::Int(v)) => ParamValue::Int(*v),
            (ParamType::Float, ParamValue::Int(v)) => ParamValue::Float(*v as f64),
            (ParamType::Float, ParamValue::Float(v)) => ParamValue::Float(*v),
            (ParamType::String, ParamValue::String(s)) => ParamValue::String(s.clone()),
            (t, v) => {
                return Err(TabrlError::Validation(format!(
                    "parameter '{}' must be of type {:?}, got {}",
                    name,
                    t,
                    v
                ))
                .into())
            }
        };

        if let Some(x) = value.as_f64() {
            if !x.is_finite() {
                return Err(validation(format!("parameter '{}' must be finite", name)));
            }
            if let Some(min) = self.min {
                if x < min {
                    return Err(validation(format!(
                        "parameter '{}' must be >= {}, got {}",
                        name, min, x
                    )));
                }
            }
            if let Some(max) = self.max {
                if x > max {
                    return Err(validation(format!(
                        "parameter '{}' must be <= {}, got {}",
                        name, max, x
                    )));
                }
            }
        }

        if let (Some(options), Some(s)) = (&self.options, value.as_str()) {
            if !options.iter().any(|o| o == s) {
                return Err(validation(format!(
                    "parameter '{}' must be one of {:?}, got '{}'",
                    name, options, s
                )));
            }
        }

        Ok(value)
    }
}

fn validation(msg: String) -> anyhow::Error {
    TabrlError::Validation(msg).into()
}

/// The set of tunable parameters of an algorithm, keyed by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSchema(BTreeMap<String, ParamSpec>);

impl ParameterSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds a parameter, builder style.
    pub fn with(mut self, name: impl Into<String>, spec: ParamSpec) -> Self {
        self.0.insert(name.into(), spec);
        self
    }

    /// Gets the specification of a parameter.
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.0.get(name)
    }

    /// Returns `true` if the schema declares the parameter.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Iterates over parameter specifications in name order.
    pub fn iter(&self) -> Iter<'_, String, ParamSpec> {
        self.0.iter()
    }

    /// The number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the schema declares no parameter.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Default values of all parameters.
    pub fn defaults(&self) -> Parameters {
        self.0
            .iter()
            .map(|(k, spec)| (k.clone(), spec.default.clone()))
            .collect()
    }

    /// Validates `params` and fills in defaults for missing parameters.
    ///
    /// Unknown names, type mismatches, out-of-range values and text values
    /// outside the declared options fail with [`TabrlError::Validation`].
    pub fn resolve(&self, params: &Parameters) -> Result<Parameters> {
        if let Some((name, _)) = params.iter().find(|(name, _)| !self.contains(name)) {
            return Err(validation(format!("unknown parameter '{}'", name)));
        }

        let mut resolved = Parameters::new();
        for (name, spec) in self.0.iter() {
            let value = match params.get(name) {
                Some(v) => spec.check(name, v)?,
                None => spec.default.clone(),
            };
            resolved.insert(name.clone(), value);
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn schema() -> ParameterSchema {
        ParameterSchema::new()
            .with("rate", ParamSpec::float(0.1, "rate").min(0.01).max(1.0))
            .with("episodes", ParamSpec::int(100, "episodes"))
            .with("mode", ParamSpec::choice("a", &["a", "b"], "mode"))
    }

    fn is_validation(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<TabrlError>(), Some(TabrlError::Validation(_)))
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let resolved = schema().resolve(&Parameters::new().with("rate", 1i64)).unwrap();
        assert_eq!(resolved.get("rate"), Some(&ParamValue::Float(1.0)));
        assert_eq!(resolved.get("episodes"), Some(&ParamValue::Int(100)));
        assert_eq!(resolved.get("mode"), Some(&ParamValue::String("a".into())));
        assert_eq!(resolved, schema().resolve(&resolved).unwrap());
    }

    #[test]
    fn test_resolve_rejects_bad_values() {
        let s = schema();
        for params in [
            Parameters::new().with("rate", 0.0),
            Parameters::new().with("rate", 1.5),
            Parameters::new().with("rate", f64::NAN),
            Parameters::new().with("rate", "fast"),
            Parameters::new().with("episodes", 10.5),
            Parameters::new().with("mode", "c"),
            Parameters::new().with("unknown", 1i64),
        ] {
            let err = s.resolve(&params).unwrap_err();
            assert!(is_validation(&err), "{:?} -> {}", params, err);
        }
    }

    #[test]
    fn test_schema_json_shape() {
        let json = serde_json::to_value(schema()).unwrap();
        assert_eq!(json["rate"]["type"], "float");
        assert_eq!(json["rate"]["min"], 0.01);
        assert_eq!(json["rate"]["max"], 1.0);
        assert_eq!(json["rate"]["default"], 0.1);
        assert_eq!(json["episodes"]["default"], 100);
        assert!(json["episodes"].get("min").is_none());
        assert_eq!(json["mode"]["options"][1], "b");
    }
}

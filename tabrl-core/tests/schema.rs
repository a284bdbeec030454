use tabrl_core::{
    params::{ParamSpec, ParamValue, ParameterSchema, Parameters},
    TabrlError,
};

fn schema() -> ParameterSchema {
    ParameterSchema::new()
        .with(
            "step_size",
            ParamSpec::float(0.1, "Step size of updates").min(0.01).max(1.0),
        )
        .with("num_episodes", ParamSpec::int(500, "Number of training episodes"))
        .with(
            "policy",
            ParamSpec::choice("greedy", &["greedy", "softmax"], "Action selection"),
        )
}

#[test]
fn test_resolve_request_body() {
    let body = r#"{"step_size": 1, "policy": "softmax"}"#;
    let params: Parameters = serde_json::from_str(body).unwrap();
    let resolved = schema().resolve(&params).unwrap();

    assert_eq!(resolved.len(), 3);
    assert_eq!(resolved.get("step_size"), Some(&ParamValue::Float(1.0)));
    assert_eq!(resolved.get("num_episodes"), Some(&ParamValue::Int(500)));
    assert_eq!(resolved.str_or("policy", "").unwrap(), "softmax");
}

#[test]
fn test_resolve_rejects_bad_requests() {
    for body in [
        r#"{"step_size": 0.0}"#,
        r#"{"step_size": "fast"}"#,
        r#"{"num_episodes": 10.5}"#,
        r#"{"policy": "random"}"#,
        r#"{"momentum": 0.9}"#,
    ] {
        let params: Parameters = serde_json::from_str(body).unwrap();
        let err = schema().resolve(&params).unwrap_err();
        let err = err.downcast_ref::<TabrlError>().unwrap();
        assert!(matches!(err, TabrlError::Validation(_)), "{}", body);
        assert!(err.is_validation() && !err.is_lookup());
    }
}

#[test]
fn test_schema_json() {
    let json = serde_json::to_value(schema()).unwrap();
    assert_eq!(
        json["step_size"],
        serde_json::json!({
            "type": "float",
            "min": 0.01,
            "max": 1.0,
            "default": 0.1,
            "description": "Step size of updates",
        })
    );
    assert_eq!(json["num_episodes"]["default"], 500);
    assert!(json["num_episodes"].get("min").is_none());
    assert_eq!(json["policy"]["options"], serde_json::json!(["greedy", "softmax"]));

    let schema_: ParameterSchema = serde_json::from_value(json).unwrap();
    assert_eq!(schema_, schema());
}

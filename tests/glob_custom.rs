//! End-to-end tests for glob expansion and custom converters.

use argbind::{Binder, CallArgs, CustomConverter, Signature, TypeExpr, Value};

fn argv(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

// =============================================================================
// GLOB EXPANSION
// =============================================================================

#[test]
fn glob_param_expands_pattern_to_matches() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), "").unwrap();
    std::fs::write(dir.path().join("b.txt"), "").unwrap();
    std::fs::write(dir.path().join("c.log"), "").unwrap();
    let pattern = format!("{}/*.txt", dir.path().display());

    let sig = Signature::new().arg("paths", TypeExpr::list(TypeExpr::path()));
    let out = Binder::new(sig)
        .use_glob(["paths"])
        .try_call_from(argv(&["--path", &pattern]), CallArgs::new(), |b| {
            b.get("paths").clone()
        })
        .unwrap();

    let paths = out.as_slice().unwrap();
    assert_eq!(paths.len(), 2);
    let names: Vec<String> = paths
        .iter()
        .filter_map(|p| p.as_path())
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    assert!(names.contains(&"a.txt".to_string()));
    assert!(names.contains(&"b.txt".to_string()));
}

#[test]
fn glob_param_flattens_multiple_patterns() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), "").unwrap();
    std::fs::write(dir.path().join("b.log"), "").unwrap();
    let txt = format!("{}/*.txt", dir.path().display());
    let log = format!("{}/*.log", dir.path().display());

    let sig = Signature::new().arg("paths", TypeExpr::list(TypeExpr::path()));
    let out = Binder::new(sig)
        .use_glob(["paths"])
        .try_call_from(argv(&["--path", &txt, &log]), CallArgs::new(), |b| {
            b.get("paths").clone()
        })
        .unwrap();
    assert_eq!(out.as_slice().unwrap().len(), 2);
}

#[test]
fn glob_only_applies_to_listed_params() {
    let sig = Signature::new().arg("name", TypeExpr::string());
    let out = Binder::new(sig)
        .try_call_from(argv(&["--name", "*.txt"]), CallArgs::new(), |b| {
            b.get("name").clone()
        })
        .unwrap();
    // Not in the glob allow-set: the token stays a plain string.
    assert_eq!(out, Value::str("*.txt"));
}

#[test]
fn single_arity_glob_param_binds_match_list() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("only.txt"), "").unwrap();
    let pattern = format!("{}/*.txt", dir.path().display());

    let sig = Signature::new().arg("pattern", TypeExpr::path());
    let out = Binder::new(sig)
        .use_glob(["pattern"])
        .try_call_from(argv(&["--pattern", &pattern]), CallArgs::new(), |b| {
            b.get("pattern").clone()
        })
        .unwrap();
    assert_eq!(out.as_slice().unwrap().len(), 1);
}

// =============================================================================
// CUSTOM CONVERTERS
// =============================================================================

#[test]
fn custom_converter_receives_raw_string_value() {
    let sig = Signature::new().arg("p", TypeExpr::int());
    let out = Binder::new(sig)
        .use_custom(
            "p",
            CustomConverter::new(TypeExpr::string(), |v| {
                let s = v.as_str().ok_or_else(|| "expected a string".to_string())?;
                Ok(Value::Int(s.len() as i64))
            }),
        )
        .try_call_from(argv(&["--p", "hello"]), CallArgs::new(), |b| b.get_i64("p"))
        .unwrap();
    assert_eq!(out, Some(5));
}

#[test]
fn custom_converter_with_list_input_dispatches_multi() {
    let sig = Signature::new().arg("value", TypeExpr::string());
    let out = Binder::new(sig)
        .use_custom(
            "value",
            CustomConverter::new(TypeExpr::list(TypeExpr::path()), |v| {
                let n = v.as_slice().map(|s| s.len()).unwrap_or(0);
                Ok(Value::Int(n as i64))
            }),
        )
        .try_call_from(argv(&["--value", ".", "."]), CallArgs::new(), |b| {
            b.get_i64("value")
        })
        .unwrap();
    assert_eq!(out, Some(2));
}

#[test]
fn custom_converter_without_input_type_assumes_str() {
    let sig = Signature::new().arg("value", TypeExpr::int());
    let out = Binder::new(sig)
        .use_custom(
            "value",
            CustomConverter::assuming_str(|v| {
                Ok(Value::str(format!("<{}>", v.as_str().unwrap_or(""))))
            }),
        )
        .try_call_from(argv(&["--value", "any"]), CallArgs::new(), |b| {
            b.get("value").clone()
        })
        .unwrap();
    assert_eq!(out, Value::str("<any>"));
}

#[test]
fn custom_converter_error_is_reported() {
    let sig = Signature::new().arg("value", TypeExpr::int());
    let err = Binder::new(sig)
        .use_custom(
            "value",
            CustomConverter::new(TypeExpr::string(), |_| Err("nope".to_string())),
        )
        .try_call_from(argv(&["--value", "x"]), CallArgs::new(), |b| {
            b.get("value").clone()
        })
        .unwrap_err();
    assert!(err.to_string().contains("nope"));
}

#[test]
fn custom_converter_skips_absent_values() {
    let sig = Signature::new().arg("value", TypeExpr::optional(TypeExpr::int()));
    let out = Binder::new(sig)
        .use_custom(
            "value",
            CustomConverter::new(TypeExpr::optional(TypeExpr::string()), |_| {
                Ok(Value::Int(1))
            }),
        )
        .try_call_from(argv(&[]), CallArgs::new(), |b| b.get("value").clone())
        .unwrap();
    assert!(out.is_none());
}

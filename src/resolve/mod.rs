//! Key-path resolution over a configuration tree.
//!
//! `get` consults the environment before the tree — the single
//! highest-precedence override in the system, applied at read time.
//! `set` writes through a dotted path, creating intermediate mappings.
//! `parse_secret_value` sniffs raw secret strings into tree values.

use thiserror::Error;

use crate::env::Env;
use crate::merge;
use crate::models::{KeyPath, Mapping, Value};

/// Error from [`set`]: the only contract violation it can hit.
#[derive(Debug, Error)]
pub enum SetError {
    /// Setting the empty path replaces the whole tree, which only makes
    /// sense for a mapping value.
    #[error("setting the tree root requires a mapping value")]
    RootNotAMapping,
}

/// Resolve a key path against a tree, consulting the environment first.
///
/// The environment variable consulted is `env_var` when supplied,
/// otherwise the path's implicit name (`db.username` → `DB_USERNAME`).
/// A set, non-empty variable wins unconditionally over the stored tree,
/// after magic-literal coercion (see [`coerce_env_value`]).
///
/// Without an environment override, the tree is walked segment by
/// segment; any missing segment yields `None` so the caller can supply
/// a default. The empty path yields the whole tree.
///
/// Returned values are owned clones — a `get` result never aliases the
/// live tree, at any depth.
pub fn get(tree: &Mapping, path: &KeyPath, env: &Env, env_var: Option<&str>) -> Option<Value> {
    let name = match env_var {
        Some(name) => name.to_string(),
        None => path.env_var_name(),
    };
    if !name.is_empty() {
        if let Some(raw) = env.lookup(&name) {
            return Some(coerce_env_value(&raw));
        }
    }

    let segments = path.segments();
    let mut current = tree;
    for (depth, segment) in segments.iter().enumerate() {
        let child = current.get(Value::String(segment.clone()))?;
        if depth + 1 == segments.len() {
            return Some(child.clone());
        }
        current = child.as_mapping()?;
    }

    // Empty path: the whole tree.
    Some(Value::Mapping(tree.clone()))
}

/// Apply magic-literal coercion to an environment override value.
///
/// Exactly three case-insensitive literals are special: `true`,
/// `false`, and `null`/`none`. Any other string passes through
/// verbatim — environment values are never JSON- or YAML-parsed.
pub fn coerce_env_value(raw: &str) -> Value {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" | "none" => Value::Null,
        _ => Value::String(raw.to_string()),
    }
}

/// Write `value` at `path`, creating intermediate mappings as needed.
///
/// The empty path deep-merges a mapping `value` into the root — the
/// full-configuration-replacement case. Every other path assigns the
/// leaf directly: overwrite, never merge, never sequence union. A
/// non-mapping value found where an intermediate mapping is needed is
/// replaced by an empty mapping.
pub fn set(tree: &mut Mapping, path: &KeyPath, value: Value) -> Result<(), SetError> {
    if path.is_root() {
        let Value::Mapping(overlay) = value else {
            return Err(SetError::RootNotAMapping);
        };
        merge::merge_into(tree, &overlay);
        return Ok(());
    }

    let Some((leaf, parents)) = path.segments().split_last() else {
        return Ok(()); // unreachable: root handled above
    };

    let mut current = tree;
    for segment in parents {
        current = child_mapping(current, segment);
    }
    current.insert(Value::String(leaf.clone()), value);
    Ok(())
}

/// Descend one level, creating or coercing the slot to a mapping.
fn child_mapping<'a>(node: &'a mut Mapping, segment: &str) -> &'a mut Mapping {
    let slot = node
        .entry(Value::String(segment.to_owned()))
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    if !slot.is_mapping() {
        *slot = Value::Mapping(Mapping::new());
    }
    match slot {
        Value::Mapping(child) => child,
        _ => unreachable!("slot was just forced to a mapping"),
    }
}

/// Parse a secret's raw string through the ordered fallback chain:
/// strict JSON first, lenient YAML second, verbatim string last.
///
/// Never fails — an unparseable value is a recognized fallback, not an
/// error, and is stored as the raw string.
pub fn parse_secret_value(raw: &str) -> Value {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(raw) {
        if let Ok(value) = serde_yaml_ng::to_value(json) {
            return value;
        }
    }
    match serde_yaml_ng::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(_) => Value::String(raw.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree(doc: &str) -> Mapping {
        serde_yaml_ng::from_str(doc).expect("test document")
    }

    fn no_env() -> Env {
        Env::mock(Vec::<(&str, &str)>::new())
    }

    #[test]
    fn get_walks_nested_path() {
        let t = tree("a: {b: {c: 1}}");
        let got = get(&t, &KeyPath::from("a.b.c"), &no_env(), None);
        assert_eq!(got, Some(Value::Number(1.into())));
    }

    #[test]
    fn get_missing_segment_is_none() {
        let t = tree("a: {b: {c: 1}}");
        assert_eq!(get(&t, &KeyPath::from("a.b.missing"), &no_env(), None), None);
        assert_eq!(get(&t, &KeyPath::from("x.y"), &no_env(), None), None);
    }

    #[test]
    fn get_through_scalar_is_none() {
        let t = tree("a: 5");
        assert_eq!(get(&t, &KeyPath::from("a.b"), &no_env(), None), None);
    }

    #[test]
    fn get_empty_path_returns_whole_tree() {
        let t = tree("a: 1\nb: 2");
        let got = get(&t, &KeyPath::root(), &no_env(), None).unwrap();
        assert_eq!(got, Value::Mapping(t.clone()));
    }

    #[test]
    fn env_var_wins_over_stored_value() {
        let t = tree("db: {username: stored}");
        let env = Env::mock([("DB_USERNAME", "from-env")]);
        let got = get(&t, &KeyPath::from("db.username"), &env, None);
        assert_eq!(got, Some(Value::String("from-env".into())));
    }

    #[test]
    fn explicit_env_var_overrides_implicit_name() {
        let t = tree("db: {username: stored}");
        let env = Env::mock([("CUSTOM_NAME", "custom")]);
        let got = get(&t, &KeyPath::from("db.username"), &env, Some("CUSTOM_NAME"));
        assert_eq!(got, Some(Value::String("custom".into())));
    }

    #[test]
    fn env_coercion_handles_magic_literals() {
        for raw in ["TRUE", "true", "True"] {
            assert_eq!(coerce_env_value(raw), Value::Bool(true));
        }
        for raw in ["FALSE", "false", "False"] {
            assert_eq!(coerce_env_value(raw), Value::Bool(false));
        }
        for raw in ["none", "None", "NULL", "null"] {
            assert_eq!(coerce_env_value(raw), Value::Null);
        }
        assert_eq!(coerce_env_value("10"), Value::String("10".into()));
        assert_eq!(coerce_env_value("truthy"), Value::String("truthy".into()));
    }

    #[test]
    fn env_coercion_applies_through_get() {
        let t = tree("feature: {enabled: false}");
        let env = Env::mock([("FEATURE_ENABLED", "TRUE")]);
        let got = get(&t, &KeyPath::from("feature.enabled"), &env, None);
        assert_eq!(got, Some(Value::Bool(true)));
    }

    #[test]
    fn empty_env_var_does_not_shadow_tree() {
        let t = tree("db: {username: stored}");
        let env = Env::mock([("DB_USERNAME", "")]);
        let got = get(&t, &KeyPath::from("db.username"), &env, None);
        assert_eq!(got, Some(Value::String("stored".into())));
    }

    #[test]
    fn set_creates_intermediate_mappings() {
        let mut t = Mapping::new();
        set(&mut t, &KeyPath::from("x.y"), Value::Number(5.into())).unwrap();
        assert_eq!(
            Value::Mapping(t),
            serde_yaml_ng::from_str::<Value>("x: {y: 5}").unwrap()
        );
    }

    #[test]
    fn set_overwrites_leaf_without_merging() {
        let mut t = Mapping::new();
        set(&mut t, &KeyPath::from("x.y"), Value::Number(5.into())).unwrap();
        set(&mut t, &KeyPath::from("x.y"), Value::Number(6.into())).unwrap();
        assert_eq!(
            Value::Mapping(t),
            serde_yaml_ng::from_str::<Value>("x: {y: 6}").unwrap()
        );
    }

    #[test]
    fn set_replaces_scalar_intermediate_with_mapping() {
        let mut t = tree("x: 1");
        set(&mut t, &KeyPath::from("x.y"), Value::Bool(true)).unwrap();
        assert_eq!(
            Value::Mapping(t),
            serde_yaml_ng::from_str::<Value>("x: {y: true}").unwrap()
        );
    }

    #[test]
    fn set_root_merges_into_existing_tree() {
        let mut t = tree("b: 2");
        let overlay: Value = serde_yaml_ng::from_str("a: 1").unwrap();
        set(&mut t, &KeyPath::root(), overlay).unwrap();
        assert_eq!(
            Value::Mapping(t),
            serde_yaml_ng::from_str::<Value>("b: 2\na: 1").unwrap()
        );
    }

    #[test]
    fn set_root_with_non_mapping_is_an_error() {
        let mut t = Mapping::new();
        let result = set(&mut t, &KeyPath::root(), Value::String("nope".into()));
        assert!(matches!(result, Err(SetError::RootNotAMapping)));
    }

    #[test]
    fn sniff_parses_strict_json_first() {
        assert_eq!(
            parse_secret_value(r#"{"a": 1}"#),
            serde_yaml_ng::from_str::<Value>("a: 1").unwrap()
        );
        assert_eq!(parse_secret_value("5"), Value::Number(5.into()));
        assert_eq!(parse_secret_value("true"), Value::Bool(true));
    }

    #[test]
    fn sniff_falls_back_to_yaml() {
        assert_eq!(
            parse_secret_value("feature:\n  enabled: true"),
            serde_yaml_ng::from_str::<Value>("feature: {enabled: true}").unwrap()
        );
    }

    #[test]
    fn sniff_falls_back_to_verbatim_string() {
        // Not valid JSON, and YAML rejects the tab indentation.
        let raw = "a:\n\tb: c";
        assert_eq!(parse_secret_value(raw), Value::String(raw.into()));
    }

    #[test]
    fn sniff_keeps_plain_strings() {
        assert_eq!(
            parse_secret_value("postgresql://localhost/app"),
            Value::String("postgresql://localhost/app".into())
        );
    }
}

//! Integration test: the embedded project configuration resolved per file.
//!
//! The real base configs come from npm packages, so a small catalog with a
//! few representative rules from each stands in for them here.

use rulestack::{
    project_config, BaseConfigRegistry, ConfigError, Resolver, RuleValue, Severity,
    REQUIRED_BASES,
};
use serde_json::json;

const BASES: &str = r#"
[bases.airbnb]
plugins = ["import", "react", "jsx-a11y"]

[bases.airbnb.rules]
semi = ["error", "always"]
no-shadow = "error"
max-len = ["error", 100, 2]
"react/prop-types" = "error"
"react/jsx-filename-extension" = ["error", { extensions = [".jsx"] }]
"import/extensions" = ["error", "ignorePackages", { js = "never", mjs = "never", jsx = "never" }]
"jsx-a11y/click-events-have-key-events" = "error"

[bases."eslint:recommended".rules]
no-debugger = "error"
no-unused-vars = "error"

[bases.react-app]
parser = "babel-eslint"

[bases.react-app.rules]
no-unused-vars = ["warn", { args = "none" }]

[bases."plugin:promise/recommended"]
plugins = ["promise"]

[bases."plugin:promise/recommended".rules]
"promise/always-return" = "error"
"promise/catch-or-return" = "error"

[bases."plugin:@typescript-eslint/recommended"]
plugins = ["@typescript-eslint"]

[bases."plugin:@typescript-eslint/recommended".rules]
"@typescript-eslint/no-unused-vars" = "warn"
"@typescript-eslint/unbound-method" = "error"

[bases."plugin:@typescript-eslint/recommended-requiring-type-checking".rules]
"@typescript-eslint/no-floating-promises" = "error"

[bases."plugin:import/typescript".settings."import/resolver".node]
extensions = [".ts", ".tsx", ".js", ".jsx"]
"#;

fn bases() -> BaseConfigRegistry {
    BaseConfigRegistry::parse_toml(BASES).expect("stub bases should parse")
}

#[test]
fn stub_catalog_provides_every_required_base() {
    let bases = bases();
    for name in REQUIRED_BASES {
        assert!(bases.names().contains(name), "missing stub base {name}");
    }
}

#[test]
fn javascript_file_uses_top_level_rules() {
    let config = project_config().unwrap();
    let bases = bases();
    let js = Resolver::new(&config, &bases)
        .resolve_for_file("src/index.js")
        .unwrap();

    assert_eq!(js.parser(), Some("@babel/eslint-parser"));
    assert_eq!(
        js.rules().get("semi"),
        Some(&RuleValue::Error(vec![json!("never")]))
    );
    assert_eq!(js.rules().get("no-shadow"), Some(&RuleValue::Error(vec![])));
    assert_eq!(js.rules().get("react/prop-types"), Some(&RuleValue::Off));
    assert_eq!(
        js.rules().get("promise/always-return"),
        Some(&RuleValue::Off)
    );
    assert_eq!(
        js.rules().get("promise/catch-or-return"),
        Some(&RuleValue::Error(vec![]))
    );
    // react-app comes after eslint:recommended.
    assert_eq!(
        js.rules().get("no-unused-vars"),
        Some(&RuleValue::Warn(vec![json!({ "args": "none" })]))
    );
    assert_eq!(js.rules().get("no-debugger"), Some(&RuleValue::Warn(vec![])));
    assert!(!js.rules().contains("@typescript-eslint/semi"));
}

#[test]
fn max_len_options_are_replaced_not_merged() {
    let config = project_config().unwrap();
    let bases = bases();
    let js = Resolver::new(&config, &bases)
        .resolve_for_file("src/index.js")
        .unwrap();

    let max_len = js.rules().get("max-len").unwrap();
    assert_eq!(max_len.severity(), Severity::Error);
    assert_eq!(max_len.options()[0], json!(200));
    assert_eq!(max_len.options().len(), 3);
}

#[test]
fn typescript_file_layers_the_override() {
    let config = project_config().unwrap();
    let bases = bases();
    let tsx = Resolver::new(&config, &bases)
        .resolve_for_file("src/components/App.tsx")
        .unwrap();

    assert_eq!(tsx.parser(), Some("@typescript-eslint/parser"));
    assert_eq!(tsx.rules().get("semi"), Some(&RuleValue::Off));
    assert_eq!(tsx.rules().get("no-shadow"), Some(&RuleValue::Off));
    assert_eq!(
        tsx.rules().get("@typescript-eslint/semi"),
        Some(&RuleValue::Error(vec![json!("never")]))
    );
    assert_eq!(
        tsx.rules().get("@typescript-eslint/unbound-method"),
        Some(&RuleValue::Off)
    );
    assert_eq!(
        tsx.rules().get("@typescript-eslint/no-floating-promises"),
        Some(&RuleValue::Error(vec![]))
    );
    assert_eq!(
        tsx.rules().get("react/jsx-filename-extension"),
        Some(&RuleValue::Error(vec![json!({ "extensions": [".jsx", ".tsx"] })]))
    );
    // Top-level rules the override leaves alone still apply.
    assert_eq!(tsx.rules().get("react/prop-types"), Some(&RuleValue::Off));
    assert_eq!(
        tsx.rules().get("complexity"),
        Some(&RuleValue::Error(vec![json!(10)]))
    );
}

#[test]
fn typescript_parser_options_merge_with_top_level() {
    let config = project_config().unwrap();
    let bases = bases();
    let ts = Resolver::new(&config, &bases)
        .resolve_for_file("src/api.ts")
        .unwrap();

    let options = ts.parser_options();
    assert_eq!(options["sourceType"], "module");
    assert_eq!(options["requireConfigFile"], false);
    assert_eq!(options["ecmaVersion"], 2018);
    assert_eq!(options["ecmaFeatures"], json!({ "jsx": true }));
    assert_eq!(options["project"], json!(["./tsconfig.json"]));
    assert!(ts.settings().contains_key("import/resolver"));
    assert_eq!(ts.settings()["react"], json!({ "version": "detect" }));
}

#[test]
fn env_and_plugins_come_through() {
    let config = project_config().unwrap();
    let bases = bases();
    let js = Resolver::new(&config, &bases)
        .resolve_for_file("src/index.js")
        .unwrap();

    for flag in ["browser", "commonjs", "es6", "jest", "node"] {
        assert_eq!(js.env().get(flag), Some(&true), "env {flag}");
    }
    assert!(js.plugins().iter().any(|p| p == "css-modules"));
    assert!(js.plugins().iter().any(|p| p == "jsx-a11y"));
    assert!(js.rules_missing_plugin().is_empty());
}

#[test]
fn missing_base_is_reported() {
    let config = project_config().unwrap();
    let bases = BaseConfigRegistry::parse_toml(
        r#"
[bases.airbnb]
[bases."eslint:recommended"]
[bases.react-app]
"#,
    )
    .unwrap();

    match Resolver::new(&config, &bases).resolve_for_file("src/index.js") {
        Err(ConfigError::UnknownBase { context, name }) => {
            assert_eq!(context, "extends");
            assert_eq!(name, "plugin:promise/recommended");
        }
        other => panic!("expected unknown base, got {other:?}"),
    }
}

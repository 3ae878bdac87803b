//! Demo capabilities exposed by the CLI host.

use quill_host::{CapabilityLibrary, CapabilityRegistry};
use rhai::{Array, Dynamic, EvalAltResult, FLOAT, INT, ImmutableString, Module, Position};

/// Builds the registry of importable capabilities.
pub fn registry() -> CapabilityRegistry {
    let registry = CapabilityRegistry::new();
    registry.expose("Quill.Math", "Calc", calc());
    registry.expose("Quill.Text", "Strings", strings());
    registry
}

/// Libraries bound at activation, reachable as `quill::...`.
pub fn libraries() -> Vec<CapabilityLibrary> {
    let mut module = Module::new();
    module.set_var("VERSION", env!("CARGO_PKG_VERSION").to_string());
    module.set_native_fn("log", |text: ImmutableString| {
        log::info!("[quill] {}", text);
        Ok(())
    });

    vec![CapabilityLibrary::native("quill", module)]
}

fn calc() -> Module {
    let mut module = Module::new();
    module.set_native_fn("double", |x: INT| x.checked_mul(2).ok_or_else(|| overflow("double")));
    module.set_native_fn("square", |x: INT| x.checked_mul(x).ok_or_else(|| overflow("square")));
    module.set_native_fn("clamp", |x: INT, low: INT, high: INT| Ok(x.max(low).min(high)));
    module.set_native_fn("pi", || Ok(std::f64::consts::PI as FLOAT));
    module
}

fn overflow(function: &str) -> Box<EvalAltResult> {
    EvalAltResult::ErrorArithmetic(
        format!("Integer overflow in Calc::{}", function),
        Position::NONE,
    )
    .into()
}

fn strings() -> Module {
    let mut module = Module::new();
    module.set_native_fn("upper", |s: ImmutableString| Ok(s.to_uppercase()));
    module.set_native_fn("lower", |s: ImmutableString| Ok(s.to_lowercase()));
    module.set_native_fn("reverse", |s: ImmutableString| {
        Ok(s.chars().rev().collect::<String>())
    });
    module.set_native_fn("words", |s: ImmutableString| {
        Ok(s.split_whitespace()
            .map(|word| Dynamic::from(word.to_string()))
            .collect::<Array>())
    });
    module
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_registry_contents() {
        let registry = registry();
        let paths: Vec<_> = registry.exposed().iter().map(|c| c.import_path()).collect();
        assert_eq!(paths, vec!["Quill.Math/Calc", "Quill.Text/Strings"]);
    }

    #[test]
    fn test_calc_overflow_is_a_script_error() {
        let registry = registry();
        let calc = registry.resolve("Quill.Math/Calc").unwrap();
        let mut engine = rhai::Engine::new();
        engine.register_static_module("Calc", calc);

        let err = engine.eval::<INT>("Calc::square(9999999999)").unwrap_err();
        assert!(matches!(*err, EvalAltResult::ErrorArithmetic(..)), "{}", err);
        assert!(engine.eval::<INT>(&format!("Calc::double({})", INT::MAX)).is_err());
        assert_eq!(engine.eval::<INT>("Calc::square(12)").unwrap(), 144);
    }

    #[test]
    fn test_demo_library_name() {
        let libraries = libraries();
        assert_eq!(libraries.len(), 1);
        assert_eq!(libraries[0].name(), "quill");
    }
}

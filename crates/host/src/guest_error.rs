//! Mapping of guest engine errors onto [`QuillError`].

use quill_core::QuillError;
use rhai::EvalAltResult;

/// Classifies a guest error raised while running a composed script.
///
/// Unresolvable imports become [`QuillError::Resolution`]; everything else,
/// parse errors included, is a [`QuillError::Runtime`]. Line numbers are made
/// relative to the operator's script by discounting `preamble_lines`.
pub fn classify(mut err: Box<EvalAltResult>, preamble_lines: usize) -> QuillError {
    if let Some(message) = unresolved_import(&err) {
        return QuillError::Resolution { message };
    }

    let position = err.take_position();

    QuillError::Runtime {
        message: err.to_string(),
        line: position
            .line()
            .and_then(|line| line.checked_sub(preamble_lines))
            .filter(|line| *line > 0),
    }
}

/// Finds an import failure, looking through function and module frames.
fn unresolved_import(err: &EvalAltResult) -> Option<String> {
    match err {
        EvalAltResult::ErrorModuleNotFound(path, _) => Some(format!("Module not found: {}", path)),
        EvalAltResult::ErrorInFunctionCall(_, _, inner, _) => unresolved_import(inner),
        EvalAltResult::ErrorInModule(path, inner, _) => Some(
            unresolved_import(inner)
                .unwrap_or_else(|| format!("Error in module '{}': {}", path, inner)),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::ErrorKind;
    use rhai::{Engine, Scope};

    fn run(script: &str) -> Box<EvalAltResult> {
        Engine::new()
            .eval_with_scope::<rhai::Dynamic>(&mut Scope::new(), script)
            .unwrap_err()
    }

    #[test]
    fn test_runtime_error_line_is_relative_to_operator_script() {
        let err = run("// preamble\n// ### begin custom\nlet x = 1;\nx + y");
        let classified = classify(err, 2);

        match classified {
            QuillError::Runtime { message, line } => {
                assert!(message.contains('y'), "{}", message);
                assert_eq!(line, Some(2));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_is_runtime() {
        let err = run("let = ;");
        assert_eq!(classify(err, 0).kind(), ErrorKind::Runtime);
    }

    #[test]
    fn test_missing_module_is_resolution() {
        let err = run("import \"Nowhere/Thing\" as Thing;\n1");
        let classified = classify(err, 1);

        assert_eq!(classified.kind(), ErrorKind::Resolution);
        assert!(classified.to_string().contains("Nowhere/Thing"));
    }

    #[test]
    fn test_missing_module_inside_function_is_resolution() {
        let err = run("fn load() {\n    import \"Nowhere/Thing\" as Thing;\n    1\n}\nload()");
        let classified = classify(err, 0);

        assert_eq!(classified.kind(), ErrorKind::Resolution);
        assert!(classified.to_string().contains("Nowhere/Thing"));
    }

    #[test]
    fn test_runtime_error_inside_function_stays_runtime() {
        let err = run("fn boom() { throw \"inner\"; }\nboom()");
        assert_eq!(classify(err, 0).kind(), ErrorKind::Runtime);
    }

    #[test]
    fn test_error_inside_preamble_has_no_line() {
        let err = run("throw \"early\";\n// ### begin custom\n1");
        match classify(err, 2) {
            QuillError::Runtime { line, .. } => assert_eq!(line, None),
            other => panic!("unexpected {:?}", other),
        }
    }
}

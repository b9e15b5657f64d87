//! Integration tests for the runner.
//!
//! Library-level tests write inline WAT modules to temp directories; the
//! end-to-end tests drive the binary with the path piped through stdin.

const ARITH_WAT: &str = r#"(module
    (func (export "add") (param i32 i32) (result i32)
        local.get 0
        local.get 1
        i32.add)
    (func (export "multiple") (param i32 i32) (result i32)
        local.get 0
        local.get 1
        i32.mul))"#;

fn write_module(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

// ── Library Tests ───────────────────────────────────────────────────────

mod library_tests {
    use super::*;
    use wasm_export_runner::{
        default_invocations, run, Arg, HostRuntime, Invocation, LoadError, RunnerConfig,
    };

    #[test]
    fn test_run_binary_module() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_module(&dir, "model.wasm", &wat::parse_str(ARITH_WAT).unwrap());
        let runtime = HostRuntime::new(&RunnerConfig::default()).unwrap();

        let results = run(&runtime, Some(&path), &default_invocations()).unwrap();
        let lines: Vec<String> = results.iter().map(ToString::to_string).collect();
        assert_eq!(lines, ["sum(6, 27) = 33", "multiple(6, 27) = 162"]);
    }

    #[test]
    fn test_run_text_module() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_module(&dir, "model.wat", ARITH_WAT.as_bytes());
        let runtime = HostRuntime::new(&RunnerConfig::default()).unwrap();

        let results = run(&runtime, Some(&path), &default_invocations()).unwrap();
        assert_eq!(results[0].results[0].i32(), Some(33));
        assert_eq!(results[1].results[0].i32(), Some(162));
    }

    #[test]
    fn test_load_twice_independent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_module(&dir, "model.wat", ARITH_WAT.as_bytes());
        let runtime = HostRuntime::new(&RunnerConfig::default()).unwrap();

        let first = runtime.load(Some(&path)).unwrap();
        let second = runtime.load(Some(&path)).unwrap();

        let call = Invocation::new("add", vec![Arg::Int(6), Arg::Int(27)]);
        let mut a = runtime.instantiate(&first).unwrap();
        let mut b = runtime.instantiate(&second).unwrap();
        assert_eq!(a.invoke(&call).unwrap().to_string(), "add(6, 27) = 33");
        assert_eq!(b.invoke(&call).unwrap().to_string(), "add(6, 27) = 33");
    }

    #[test]
    fn test_wrong_suffix_reports_path_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_module(&dir, "model.txt", ARITH_WAT.as_bytes());
        let runtime = HostRuntime::new(&RunnerConfig::default()).unwrap();

        let err = runtime.load(Some(&path)).unwrap_err();
        assert!(err.is_path_error());
        assert!(matches!(err, LoadError::UnrecognizedSuffix { .. }));
    }

    #[test]
    fn test_run_error_carries_cause() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_module(&dir, "model.wat", b"(module)");
        let runtime = HostRuntime::new(&RunnerConfig::default()).unwrap();

        let err = run(&runtime, Some(&path), &default_invocations()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("invocation of 'sum' failed"));
        assert!(message.contains("no export named 'add'"));
    }
}

// ── End-to-End Tests ────────────────────────────────────────────────────

mod binary_tests {
    use super::*;
    use std::io::Write;
    use std::process::{Command, Output, Stdio};

    fn run_binary(stdin: &str, envs: &[(&str, &str)]) -> Output {
        let mut child = Command::new(env!("CARGO_BIN_EXE_wasm-export-runner"))
            .env_remove("WASM_RUNNER_INVOCATIONS")
            .env_remove("WASM_RUNNER_MAX_FUEL")
            .envs(envs.iter().copied())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        child
            .stdin
            .take()
            .unwrap()
            .write_all(stdin.as_bytes())
            .unwrap();
        child.wait_with_output().unwrap()
    }

    #[test]
    fn test_prints_sum_and_multiple() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_module(&dir, "model.wasm", &wat::parse_str(ARITH_WAT).unwrap());

        let output = run_binary(&format!("{path}\n"), &[]);
        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert_eq!(stdout, "sum(6, 27) = 33\nmultiple(6, 27) = 162\n");
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("Input wasm file path:"));
    }

    #[test]
    fn test_custom_invocations_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_module(&dir, "model.wat", ARITH_WAT.as_bytes());
        let calls = dir.path().join("calls.toml");
        std::fs::write(
            &calls,
            "[[invoke]]\nexport = \"multiple\"\nlabel = \"product\"\nargs = [7, 8]\n",
        )
        .unwrap();

        let output = run_binary(
            &format!("{path}\n"),
            &[("WASM_RUNNER_INVOCATIONS", calls.to_str().unwrap())],
        );
        assert!(output.status.success());
        assert_eq!(String::from_utf8(output.stdout).unwrap(), "product(7, 8) = 56\n");
    }

    #[test]
    fn test_runs_under_fuel_budget() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_module(&dir, "model.wat", ARITH_WAT.as_bytes());

        let output = run_binary(&format!("{path}\n"), &[("WASM_RUNNER_MAX_FUEL", "100000")]);
        assert!(output.status.success());
        assert_eq!(
            String::from_utf8(output.stdout).unwrap(),
            "sum(6, 27) = 33\nmultiple(6, 27) = 162\n"
        );
    }

    #[test]
    fn test_prints_results_before_failing_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_module(
            &dir,
            "add_only.wat",
            br#"(module
                (func (export "add") (param i32 i32) (result i32)
                    local.get 0
                    local.get 1
                    i32.add))"#,
        );

        let output = run_binary(&format!("{path}\n"), &[]);
        assert!(!output.status.success());
        assert_eq!(String::from_utf8(output.stdout).unwrap(), "sum(6, 27) = 33\n");
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("no export named 'multiple'"));
    }

    #[test]
    fn test_unrecognized_suffix_fails() {
        let output = run_binary("model.txt\n", &[]);
        assert!(!output.status.success());
        assert!(output.stdout.is_empty());
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("unrecognized module suffix"));
    }

    #[test]
    fn test_missing_file_fails() {
        let output = run_binary("/nonexistent/model.wasm\n", &[]);
        assert!(!output.status.success());
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("failed to read module"));
    }

    #[test]
    fn test_empty_stdin_fails() {
        let output = run_binary("", &[]);
        assert!(!output.status.success());
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("no module path provided"));
    }
}

use super::*;

fn outcome(exit_code: Option<i32>, output: OutputState) -> ToolOutcome {
    ToolOutcome {
        exit_code,
        stderr: String::new(),
        timed_out: false,
        output,
    }
}

#[test]
fn success_requires_zero_exit_and_usable_output() {
    assert!(outcome(Some(0), OutputState::NotDeclared).success());
    assert!(outcome(Some(0), OutputState::Present(10)).success());
    assert!(!outcome(Some(1), OutputState::Present(10)).success());
    assert!(!outcome(None, OutputState::Present(10)).success());
    assert!(!outcome(Some(0), OutputState::Missing).success());
    assert!(!outcome(Some(0), OutputState::Empty).success());
}

#[test]
fn timed_out_outcome_is_never_a_success() {
    let mut o = outcome(Some(0), OutputState::Present(10));
    o.timed_out = true;
    assert!(!o.success());
}

#[test]
fn failure_text_combines_status_output_and_stderr() {
    let mut o = outcome(Some(1), OutputState::Missing);
    o.stderr = "  no such filter\n".into();
    let text = o.failure_text();
    assert!(text.contains("exit code 1"));
    assert!(text.contains("declared output missing"));
    assert!(text.contains("no such filter"));
    assert!(!text.ends_with('\n'));
}

#[test]
fn failure_text_reports_timeout_kills() {
    let mut o = outcome(None, OutputState::NotDeclared);
    o.timed_out = true;
    assert!(o.failure_text().contains("killed on timeout"));
}

#[test]
fn unspawnable_program_is_an_error_not_an_outcome() {
    let runner = FfmpegRunner::with_program("clipchaos-no-such-tool");
    let err = runner.run(&osargs(["-version"]), None).unwrap_err();
    assert!(err.to_string().contains("failed to spawn"));
}

#[test]
fn unspawnable_program_is_not_available() {
    assert!(!FfmpegRunner::with_program("clipchaos-no-such-tool").is_available());
}

#[test]
fn osargs_accepts_mixed_flag_lists() {
    let args = osargs(["-y", "-v", "error"]);
    assert_eq!(args.len(), 3);
    assert_eq!(args[0], std::ffi::OsString::from("-y"));
}

use std::process::Command;

#[test]
fn version_flag_prints_name_and_exits() {
    let output = Command::new(env!("CARGO_BIN_EXE_mandelswirl"))
        .arg("--version")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("mandelswirl"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_flag_mentions_how_to_quit() {
    let output = Command::new(env!("CARGO_BIN_EXE_mandelswirl"))
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("mandelswirl"));
    assert!(stdout.contains("Escape"));
}

#[test]
fn unknown_flag_fails_without_opening_a_window() {
    let output = Command::new(env!("CARGO_BIN_EXE_mandelswirl"))
        .arg("--fullscreen")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("--fullscreen"));
}

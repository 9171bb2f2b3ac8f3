use regex::Regex;
use std::collections::VecDeque;
use std::error::Error;
use std::fs;
use std::process::Command;

const LOXSCAN_PATH: &str = "./target/debug/loxscan";
const TEST_DIR: &str = "./test";

/// Compares output lines against the expectations, in order.
fn compare(stream: &str, expectations: &mut VecDeque<String>, output: &str) -> Vec<String> {
    let mut failures = Vec::new();
    for line in output.lines() {
        match expectations.pop_front() {
            Some(expected) if expected == line => {}
            Some(expected) => {
                failures.push(format!("{} expected: {}, actual: {}", stream, expected, line))
            }
            None => failures.push(format!("{} unexpected: {}", stream, line)),
        }
    }
    for missed in expectations.drain(..) {
        failures.push(format!("{} expected, not found: {}", stream, missed));
    }
    failures
}

fn main() -> Result<(), Box<dyn Error>> {
    let expect_regex = Regex::new("// expect: (.*)")?;
    let error_regex = Regex::new("// error: (.*)")?;
    let mut failed = 0;

    let mut test_files: Vec<_> = fs::read_dir(TEST_DIR)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "lox"))
        .collect();
    test_files.sort();

    for test_file in test_files {
        print!("Running test: {} ... ", test_file.display());
        let contents = fs::read_to_string(&test_file)?;

        let mut expectations = VecDeque::new();
        let mut errors = VecDeque::new();
        for line in contents.lines() {
            if let Some(expected) = expect_regex.captures(line).and_then(|c| c.get(1)) {
                expectations.push_back(expected.as_str().to_string());
            }
            if let Some(expected) = error_regex.captures(line).and_then(|c| c.get(1)) {
                errors.push_back(expected.as_str().to_string());
            }
        }
        let expect_failure = !errors.is_empty();

        let output = Command::new(LOXSCAN_PATH).arg(&test_file).output()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let mut failures = compare("stdout", &mut expectations, &stdout);
        failures.extend(compare("stderr", &mut errors, &stderr));
        if output.status.success() == expect_failure {
            failures.push(format!("unexpected exit status: {}", output.status));
        }

        if failures.is_empty() {
            println!("pass!");
        } else {
            failed += 1;
            println!("\x1b[0;31mfail!\x1b[0m");
            for failure in failures {
                println!("{}", failure);
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} test(s) failed", failed).into());
    }
    Ok(())
}

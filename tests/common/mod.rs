use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rocks_lang::Rocks;

/// A `Write` sink backed by a shared buffer, so the test and the [`Rocks`] driver it owns can
/// both see the captured output after the run.
#[derive(Clone, Default)]
pub struct CapturedOutput(Rc<RefCell<Vec<u8>>>);

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_string(self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("interpreter output is valid UTF-8")
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `source` to completion in-process and returns everything it printed. Does not surface
/// whether an error occurred; use the `ERR` arm of [`tests!`] (which spawns the real binary) for
/// that.
pub fn run(source: &str) -> String {
    let output = CapturedOutput::new();
    let mut rocks = Rocks::with_output(Box::new(output.clone()));
    rocks.run_str(source);
    output.into_string()
}

/// Declares a test that runs an inline program and asserts on its outcome.
///
/// `OK` runs the program in-process and compares captured stdout against the expected lines,
/// each joined by a newline. `ERR` writes the program to a temporary `.rocks` file and runs it
/// through the real `rocks` binary, asserting the expected lines appear on stderr and that the
/// process exits with a failure code.
#[macro_export]
macro_rules! tests {
    ($name:ident, $source:expr, OK $(, $expected:expr)* $(,)?) => {
        #[test]
        fn $name() {
            let mut expected = vec![$($expected),*];
            let expected = if expected.is_empty() {
                String::new()
            } else {
                expected.push("");
                expected.join("\n")
            };

            assert_eq!(common::run($source), expected);
        }
    };

    ($name:ident, $source:expr, ERR $(, $expected:expr)+ $(,)?) => {
        #[test]
        fn $name() {
            use std::io::Write as _;

            use assert_cmd::Command;

            let mut file = tempfile::Builder::new().suffix(".rocks").tempfile().unwrap();
            write!(file, "{}", $source).unwrap();

            let expected = vec![$($expected),+].join("\n");

            Command::cargo_bin("rocks")
                .unwrap()
                .arg(file.path())
                .assert()
                .stderr(format!("{expected}\n"))
                .failure();
        }
    };
}

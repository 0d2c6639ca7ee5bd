// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

pub mod fixtures;

use std::fs;
use std::path::{Path, PathBuf};
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Test fixture helper for creating temporary directories with input documents
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            root_path,
        }
    }

    /// Create a text file with given content
    pub fn create_text_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        self.create_binary_file(relative_path, content.as_bytes())
    }

    /// Create a file with raw bytes (audio payloads, invalid UTF-8)
    pub fn create_binary_file<P: AsRef<Path>>(&self, relative_path: P, content: &[u8]) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Install a shell script that behaves like a whisper CLI
    ///
    /// The script answers `--help`, writes `<stem>.json` with the given body
    /// into `--output_dir`, and records its arguments in `<name>.args`. It only
    /// uses shell builtins so it runs under the CLI tests' empty PATH; the body
    /// must not contain single quotes.
    #[cfg(unix)]
    pub fn create_fake_engine(&self, name: &str, json_body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let args_log = self.root_path.join(format!("{name}.args"));
        let script = format!(
            r#"#!/bin/sh
if [ "$1" = "--help" ]; then
  exit 0
fi
printf '%s\n' "$@" > '{args_log}'
out=""
audio=""
while [ $# -gt 0 ]; do
  case "$1" in
    --output_dir) out="$2"; shift 2 ;;
    --*) shift 2 ;;
    *) audio="$1"; shift ;;
  esac
done
name="${{audio##*/}}"
stem="${{name%.*}}"
printf '%s\n' '{json_body}' > "$out/$stem.json"
"#,
            args_log = args_log.display(),
        );

        let path = self.create_text_file(name, &script);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to mark fake engine executable");
        path
    }

    /// Install a whisper stand-in that always fails with a message on stderr
    #[cfg(unix)]
    pub fn create_failing_engine(&self, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = "#!/bin/sh\nif [ \"$1\" = \"--help\" ]; then exit 0; fi\necho 'unsupported audio format' >&2\nexit 1\n";
        let path = self.create_text_file(name, script);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to mark failing engine executable");
        path
    }

    /// Arguments recorded by a fake engine on its last transcription
    pub fn recorded_args(&self, name: &str) -> Vec<String> {
        fs::read_to_string(self.root_path.join(format!("{name}.args")))
            .expect("Fake engine did not record arguments")
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Command for the `textgist` binary with a clean environment rooted in the fixture
    ///
    /// PATH points at the fixture directory only, so no real whisper CLI is found.
    pub fn cli(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_textgist"));
        command
            .env_clear()
            .env("PATH", &self.root_path)
            .env("RUST_LOG", "warn")
            .current_dir(&self.root_path);
        command
    }

    /// Run the CLI with `args`, feeding `stdin` when given
    pub fn run_cli(&self, args: &[&str], envs: &[(&str, &str)], stdin: Option<&[u8]>) -> Output {
        let mut command = self.cli();
        command.args(args).envs(envs.iter().copied());
        command
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().expect("Failed to spawn textgist");
        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            // WHY: the CLI may exit before reading stdin (argument or config errors)
            let _ = pipe.write_all(input);
        }
        child.wait_with_output().expect("Failed to wait for textgist")
    }
}

/// Parse a successful CLI run's stdout as JSON
pub fn json_stdout(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "textgist failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

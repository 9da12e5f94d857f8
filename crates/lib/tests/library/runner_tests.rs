//! SystemRunner against real child processes.

use std::path::Path;

use docsmith_lib::env::EnvOverlay;
use docsmith_lib::exec::{ExecError, Invocation, Runner, SystemRunner};
use tempfile::TempDir;

#[tokio::test]
async fn captures_stdout() {
  let output = SystemRunner
    .run(&Invocation::shell("echo rendered"))
    .await
    .unwrap();
  assert_eq!(output.stdout.trim(), "rendered");
}

#[tokio::test]
async fn non_zero_exit_carries_code_and_stderr() {
  let err = SystemRunner
    .run(&Invocation::shell("echo 'render failed' >&2; exit 3"))
    .await
    .unwrap_err();

  match err {
    ExecError::Failed { code, stderr, .. } => {
      assert_eq!(code, Some(3));
      assert_eq!(stderr.trim(), "render failed");
    }
    other => panic!("expected Failed, got {other:?}"),
  }
}

#[tokio::test]
async fn missing_program_is_not_found() {
  let err = SystemRunner
    .run(&Invocation::new("docsmith-no-such-tool"))
    .await
    .unwrap_err();
  assert!(err.is_not_found());
  assert!(!SystemRunner.probe(&Invocation::new("docsmith-no-such-tool")).await);
}

#[tokio::test]
async fn runs_in_requested_directory() {
  let temp = TempDir::new().unwrap();
  let dir = canonical(temp.path());

  let output = SystemRunner
    .run(&Invocation::new("pwd").cwd(&dir))
    .await
    .unwrap();
  assert_eq!(Path::new(output.stdout.trim()), dir);
}

#[tokio::test]
async fn overlay_reaches_child_only() {
  let overlay = EnvOverlay::new().with_var("DOCSMITH_TEST_LOCALE", "C.utf8");

  let output = SystemRunner
    .run(&Invocation::shell("printf %s \"$DOCSMITH_TEST_LOCALE\"").env(&overlay))
    .await
    .unwrap();

  assert_eq!(output.stdout, "C.utf8");
  assert!(std::env::var_os("DOCSMITH_TEST_LOCALE").is_none());
}

#[tokio::test]
async fn path_prefix_is_searched_first() {
  use std::os::unix::fs::PermissionsExt;

  let temp = TempDir::new().unwrap();
  let tool = temp.path().join("docsmith-fake-renderer");
  std::fs::write(&tool, "#!/bin/sh\necho from-prefix\n").unwrap();
  std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

  let overlay = EnvOverlay::new().with_path_prefix(temp.path());
  let output = SystemRunner
    .run(&Invocation::new("docsmith-fake-renderer").env(&overlay))
    .await
    .unwrap();

  assert_eq!(output.stdout.trim(), "from-prefix");
}

fn canonical(path: &Path) -> std::path::PathBuf {
  std::fs::canonicalize(path).unwrap()
}

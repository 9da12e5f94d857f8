//! Integration tests for `docsmith clean`.

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn clean_removes_build_dir_and_keeps_sources() {
  let env = TestEnv::project();
  env.write_file("build/openrisc-manual.pdf", "%PDF-1.7");
  env.write_file("build/pdf.workdir/build/openrisc-manual.pdf", "%PDF-1.7");

  env
    .docsmith_cmd()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Removed"));

  assert!(!env.exists("build"));
  assert!(env.exists("src/openrisc-manual.adoc"));
  assert!(env.exists("docs-resources/global-config.adoc"));
}

#[test]
fn clean_twice_is_a_no_op() {
  let env = TestEnv::project();
  env.write_file("build/openrisc-manual.html", "<html></html>");

  env.docsmith_cmd().arg("clean").assert().success();
  env
    .docsmith_cmd()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to clean"));
}

#[test]
fn clean_json_reports_freed_bytes() {
  let env = TestEnv::project();
  env.write_file("build/openrisc-manual.json", "{\"tags\": []}");

  env
    .docsmith_cmd()
    .args(["clean", "-o", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"existed\": true"))
    .stdout(predicate::str::contains("\"bytes_freed\": 12"));
}

#[test]
fn clean_honours_configured_build_dir() {
  let env = TestEnv::project();
  env.write_file("docsmith.toml", "[document]\nbuild_dir = \"out\"\n");
  env.write_file("out/openrisc-manual.pdf", "%PDF-1.7");
  env.write_file("build/keep.txt", "untouched");

  env.docsmith_cmd().arg("clean").assert().success();

  assert!(!env.exists("out"));
  assert_eq!(env.read("build/keep.txt"), "untouched");
}

#[test]
fn clean_rejects_unknown_config_keys() {
  let env = TestEnv::project();
  env.write_file("docsmith.toml", "[document]\noutput = \"out\"\n");

  env
    .docsmith_cmd()
    .arg("clean")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load project"));
}

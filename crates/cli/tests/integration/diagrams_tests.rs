//! Integration tests for `docsmith diagrams`, run against stand-in node and
//! renderer executables.

use predicates::prelude::*;

use crate::common::{TestEnv, VALID_DIAGRAM};

const SOURCE_DIR: &str = "assets/images/wavedrom/edn";
const OUTPUT_DIR: &str = "assets/images/wavedrom/svg";

#[test]
fn diagrams_renders_each_source() {
  let env = TestEnv::project();
  env.fake_node_runtime();
  env.write_file(&format!("{SOURCE_DIR}/clock.edn"), VALID_DIAGRAM);
  env.write_file(&format!("{SOURCE_DIR}/notes.txt"), "not a diagram");

  env
    .docsmith_cmd()
    .arg("diagrams")
    .assert()
    .success()
    .stdout(predicate::str::contains("Regenerated 1 diagram(s)"));

  let image = env.read(&format!("{OUTPUT_DIR}/clock.svg"));
  assert!(image.contains("wave: 'p...'"));
  assert!(!image.contains("...."));
  assert!(!env.exists(&format!("{OUTPUT_DIR}/notes.svg")));
}

#[test]
fn malformed_source_fails_without_writing_images() {
  let env = TestEnv::project();
  env.fake_node_runtime();
  env.write_file(&format!("{SOURCE_DIR}/a-clock.edn"), VALID_DIAGRAM);
  env.write_file(&format!("{SOURCE_DIR}/b-broken.edn"), "Broken\n....\n{signal: []}\n");

  env
    .docsmith_cmd()
    .arg("diagrams")
    .assert()
    .failure()
    .stderr(predicate::str::contains("malformed diagram"))
    .stderr(predicate::str::contains("found 1"));

  assert!(!env.exists(&format!("{OUTPUT_DIR}/a-clock.svg")));
}

#[test]
fn missing_source_dir_fails() {
  let env = TestEnv::project();
  env.fake_node_runtime();

  env
    .docsmith_cmd()
    .arg("diagrams")
    .assert()
    .failure()
    .stderr(predicate::str::contains("diagram source directory not found"));
}

#[test]
fn diagrams_json_lists_images() {
  let env = TestEnv::project();
  env.fake_node_runtime();
  env.write_file(&format!("{SOURCE_DIR}/clock.edn"), VALID_DIAGRAM);

  env
    .docsmith_cmd()
    .args(["-o", "json", "diagrams"])
    .assert()
    .success()
    .stdout(predicate::str::contains("clock.svg"));
}

#[test]
fn verbose_tool_output_stays_out_of_json_report() {
  let env = TestEnv::project();
  env.fake_node_runtime();
  env.fake_tool("npm", "echo 'added 0 packages in 1s'");
  env.write_file(&format!("{SOURCE_DIR}/clock.edn"), VALID_DIAGRAM);

  let assert = env
    .docsmith_cmd()
    .args(["-v", "-o", "json", "diagrams"])
    .assert()
    .success()
    .stderr(predicate::str::contains("added 0 packages"));

  let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  let images = report["images"].as_array().unwrap();
  assert_eq!(images.len(), 1);
  assert!(images[0].as_str().unwrap().ends_with("clock.svg"));
}

//! Full build runs through the public pipeline API, with every external
//! tool played by a scripted runner.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use docsmith_lib::build::{BuildTarget, ReleaseProfile, TargetSelection};
use docsmith_lib::config::{Config, Project};
use docsmith_lib::exec::{ExecError, Invocation, ProcessOutput, Runner};
use docsmith_lib::pipeline::{BuildRequest, Pipeline, PipelineError, PipelineState, Stage};
use tempfile::TempDir;

/// Plays the host tools. Renderers write a file named after their workspace
/// into its `build/` directory.
#[derive(Default)]
struct ScriptedRunner {
  calls: Mutex<Vec<Invocation>>,
  fail_renderer: Option<&'static str>,
}

impl ScriptedRunner {
  fn failing(renderer: &'static str) -> Self {
    Self {
      fail_renderer: Some(renderer),
      ..Self::default()
    }
  }

  fn calls(&self) -> Vec<Invocation> {
    self.calls.lock().unwrap().clone()
  }

  fn renders(&self) -> Vec<String> {
    self
      .calls()
      .into_iter()
      .filter(|inv| inv.program == "bundle" && inv.args.first().map(String::as_str) == Some("exec"))
      .map(|inv| inv.args[1].clone())
      .collect()
  }
}

fn ok(stdout: &str) -> Result<ProcessOutput, ExecError> {
  Ok(ProcessOutput {
    stdout: stdout.to_string(),
    stderr: String::new(),
  })
}

impl Runner for ScriptedRunner {
  async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ExecError> {
    self.calls.lock().unwrap().push(invocation.clone());

    match invocation.program.as_str() {
      "rpm" => ok("installed\n"),
      "ruby" => ok("3.2.0"),
      "bundle" if invocation.args.first().map(String::as_str) == Some("exec") => {
        if self.fail_renderer == Some(invocation.args[1].as_str()) {
          return Err(ExecError::Failed {
            cmd: invocation.command_line(),
            code: Some(1),
            stderr: "asciidoctor: FAILED".to_string(),
          });
        }
        let workspace = invocation.working_dir().unwrap();
        let name = workspace.file_name().unwrap().to_str().unwrap();
        let artifact = name.strip_suffix(".workdir").unwrap();
        let out = workspace.join("build");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join(artifact), artifact).unwrap();
        ok("")
      }
      _ => ok(""),
    }
  }
}

fn write(path: &Path, content: &str) {
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, content).unwrap();
}

fn checkout() -> (TempDir, Project) {
  let temp = TempDir::new().unwrap();
  let root = temp.path();
  write(&root.join("os-release"), "NAME=\"Fedora Linux\"\nID=fedora\n");
  write(&root.join("src/openrisc-manual.adoc"), "= OpenRISC Manual\n");
  write(&root.join("docs-resources/global-config.adoc"), ":doctype: book\n");
  write(&root.join("assets/resource/openrisc.bib"), "");
  write(&root.join("Gemfile"), "source 'https://rubygems.org'\n");
  write(&root.join("package.json"), "{}\n");
  let project = Project::new(root, Config::default());
  (temp, project)
}

fn request(selection: TargetSelection, profile: ReleaseProfile) -> BuildRequest {
  BuildRequest {
    selection,
    profile,
    verbose: false,
  }
}

#[tokio::test]
async fn draft_build_of_everything_on_fedora() {
  let (temp, project) = checkout();
  let runner = ScriptedRunner::default();
  let mut pipeline = Pipeline::new(&project, &runner)
    .os_release(temp.path().join("os-release"))
    .today(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());

  let report = pipeline
    .run(&request(TargetSelection::All, ReleaseProfile::Draft))
    .await
    .unwrap();

  assert_eq!(pipeline.state(), PipelineState::At(Stage::Complete));
  assert_eq!(report.revision, "20261016");
  assert_eq!(
    runner.renders(),
    vec!["asciidoctor-pdf", "asciidoctor-epub3", "asciidoctor", "asciidoctor"]
  );

  let build = temp.path().join("build");
  for artifact in [
    "openrisc-manual.pdf",
    "openrisc-manual.epub",
    "openrisc-manual.html",
    "openrisc-manual-norm-tags.json",
  ] {
    assert!(build.join(artifact).is_file(), "{artifact} not promoted");
    assert!(!build.join(format!("{artifact}.workdir")).exists());
  }
  assert_eq!(report.artifacts.len(), 4);

  let render = runner
    .calls()
    .into_iter()
    .find(|inv| inv.args.get(1).map(String::as_str) == Some("asciidoctor-pdf"))
    .unwrap();
  assert!(render.args.contains(&"revnumber=20261016".to_string()));
  assert!(render.args.contains(&"draft-watermark".to_string()));
}

#[tokio::test]
async fn single_target_builds_only_that_target() {
  let (temp, project) = checkout();
  let runner = ScriptedRunner::default();
  let mut pipeline = Pipeline::new(&project, &runner).os_release(temp.path().join("os-release"));

  let report = pipeline
    .run(&request(TargetSelection::Only(BuildTarget::Html), ReleaseProfile::Official))
    .await
    .unwrap();

  assert_eq!(runner.renders(), vec!["asciidoctor"]);
  assert_eq!(report.artifacts.len(), 1);
  assert_eq!(report.artifacts[0].target, BuildTarget::Html);
  assert!(temp.path().join("build/openrisc-manual.html").is_file());
  assert!(!temp.path().join("build/openrisc-manual.pdf").exists());
}

#[tokio::test]
async fn failed_render_keeps_its_workspace() {
  let (temp, project) = checkout();
  let runner = ScriptedRunner::failing("asciidoctor-epub3");
  let mut pipeline = Pipeline::new(&project, &runner).os_release(temp.path().join("os-release"));

  let err = pipeline
    .run(&request(TargetSelection::All, ReleaseProfile::Intermediate))
    .await
    .unwrap_err();

  assert!(matches!(err, PipelineError::Build(_)));
  assert_eq!(pipeline.state(), PipelineState::Failed(Stage::Build));

  let build = temp.path().join("build");
  assert!(build.join("openrisc-manual.pdf").is_file());
  assert!(build.join("openrisc-manual.epub.workdir").is_dir());
  assert!(!build.join("openrisc-manual.html").exists());
  assert_eq!(runner.renders(), vec!["asciidoctor-pdf", "asciidoctor-epub3"]);
}

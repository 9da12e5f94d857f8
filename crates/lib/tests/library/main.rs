mod pipeline_tests;
#[cfg(unix)]
mod runner_tests;

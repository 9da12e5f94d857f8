mod clean_tests;
mod common;
#[cfg(unix)]
mod diagrams_tests;

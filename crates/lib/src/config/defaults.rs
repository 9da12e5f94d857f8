//! Built-in configuration defaults.

use std::path::PathBuf;

use super::{DiagramConfig, DocumentConfig, NodeRuntime, PackageLists, RenderConfig, RubyToolchain};

fn strings(items: &[&str]) -> Vec<String> {
  items.iter().map(|s| s.to_string()).collect()
}

impl Default for DocumentConfig {
  fn default() -> Self {
    Self {
      name: "openrisc-manual".to_string(),
      source: "openrisc-manual.adoc".to_string(),
      version: "1.4.0".to_string(),
      locale: "C.utf8".to_string(),
      build_dir: PathBuf::from("build"),
      required_resources: vec![PathBuf::from("docs-resources/global-config.adoc")],
    }
  }
}

impl Default for RenderConfig {
  fn default() -> Self {
    Self {
      trace: true,
      compress: true,
      math_format: "svg".to_string(),
      fonts_dir: "docs-resources/fonts".to_string(),
      theme: "docs-resources/themes/openrisc-pdf.yml".to_string(),
      docinfo: "shared".to_string(),
      bibliography: PathBuf::from("assets/resource/openrisc.bib"),
      failure_level: "WARN".to_string(),
      requires: strings(&[
        "asciidoctor-bibtex",
        "asciidoctor-diagram",
        "asciidoctor-lists",
        "asciidoctor-mathematical",
        "asciidoctor-sail",
      ]),
    }
  }
}

impl Default for PackageLists {
  fn default() -> Self {
    Self {
      apt: strings(&[
        "bison",
        "build-essential",
        "cmake",
        "curl",
        "flex",
        "fonts-lyx",
        "graphviz",
        "bundler",
        "default-jre",
        "libcairo2-dev",
        "libffi-dev",
        "libgdk-pixbuf2.0-dev",
        "libpango1.0-dev",
        "libxml2-dev",
        "make",
        "pkg-config",
        "ruby",
        "ruby-dev",
        "libwebp-dev",
        "libzstd-dev",
      ]),
      dnf: strings(&[
        "bison",
        "gcc",
        "gcc-c++",
        "cmake",
        "curl",
        "flex",
        "lyx-fonts",
        "graphviz",
        "rubygem-bundler",
        "java-latest-openjdk",
        "cairo-devel",
        "libffi-devel",
        "gdk-pixbuf2-devel",
        "pango-devel",
        "libxml2-devel",
        "make",
        "pkgconf-pkg-config",
        "ruby",
        "ruby-devel",
        "libwebp-devel",
        "libzstd-devel",
      ]),
      pacman: strings(&[
        "base-devel",
        "bison",
        "cmake",
        "curl",
        "flex",
        "graphviz",
        "jre-openjdk",
        "cairo",
        "libffi",
        "gdk-pixbuf2",
        "pango",
        "libxml2",
        "pkgconf",
        "ruby",
        "ruby-bundler",
        "libwebp",
        "zstd",
      ]),
    }
  }
}

impl Default for RubyToolchain {
  fn default() -> Self {
    Self {
      gemfile: PathBuf::from("Gemfile"),
      install_path: PathBuf::from("vendor/bundle"),
    }
  }
}

impl Default for NodeRuntime {
  fn default() -> Self {
    Self {
      bootstrap: "curl -fsSL https://fnm.vercel.app/install | bash -s -- --skip-shell".to_string(),
      version: "20".to_string(),
      manifest: PathBuf::from("package.json"),
      bin_path: PathBuf::from("node_modules/.bin"),
      fnm_dir: None,
    }
  }
}

impl Default for DiagramConfig {
  fn default() -> Self {
    Self {
      source_dir: PathBuf::from("assets/images/wavedrom/edn"),
      output_dir: PathBuf::from("assets/images/wavedrom/svg"),
      extension: "edn".to_string(),
      marker: "....".to_string(),
      renderer: "wavedrom-cli".to_string(),
    }
  }
}

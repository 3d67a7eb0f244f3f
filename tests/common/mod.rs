//! Common test utilities for Sprout integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// An isolated test environment: a fake home directory with an XDG config
/// tree and a component catalog. Environment variables are set per command
/// invocation, so parallel tests never interfere.
#[allow(dead_code)]
pub struct TestEnv {
    #[allow(dead_code)]
    pub temp: TempDir,
    pub home: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let home = temp.path().join("home");
        let env = TestEnv { temp, home };
        std::fs::create_dir_all(env.catalog_dir()).expect("Failed to create catalog directory");
        env
    }

    /// $XDG_CONFIG_HOME for this environment
    pub fn config_home(&self) -> PathBuf {
        self.home.join(".config")
    }

    /// Directory generated scripts land in
    pub fn sprout_dir(&self) -> PathBuf {
        self.config_home().join("sprout")
    }

    /// Component catalog directory
    pub fn catalog_dir(&self) -> PathBuf {
        self.sprout_dir().join("catalog")
    }

    /// Shell rc file used by inject/eject (SHELL is forced to bash)
    pub fn rc_file(&self) -> PathBuf {
        self.home.join(".bashrc")
    }

    /// Write a component YAML into the catalog
    pub fn write_component(&self, name: &str, content: &str) {
        std::fs::write(self.catalog_dir().join(format!("{name}.yaml")), content)
            .expect("Failed to write component");
    }

    /// Write the scaffold YAML into the catalog
    pub fn write_scaffold(&self, content: &str) {
        std::fs::write(self.catalog_dir().join("scaffold.yaml"), content)
            .expect("Failed to write scaffold");
    }

    /// Write a file under the fake home directory
    pub fn write_home_file(&self, name: &str, content: &str) {
        std::fs::create_dir_all(&self.home).expect("Failed to create home");
        std::fs::write(self.home.join(name), content).expect("Failed to write file");
    }

    /// Read a file under the fake home directory
    pub fn read_home_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.home.join(name)).expect("Failed to read file")
    }

    /// A sprout command pointed at this environment
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("sprout").expect("binary exists");
        cmd.env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("SHELL", "/bin/bash")
            .env_remove("SPROUT_CATALOG");
        cmd
    }
}

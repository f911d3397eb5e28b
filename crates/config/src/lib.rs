//! Layered configuration.
//!
//! Values are merged, last wins, from:
//!
//! 1. built-in defaults,
//! 2. a TOML, YAML or JSON file (an explicit path, or `config.{toml,yaml,yml,json}`
//!    in the platform config directory),
//! 3. `NIXDOCS_`-prefixed environment variables (`NIXDOCS_STABLE_BRANCH=nixos-24.11`).

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use nixdocs_compress::Compression;
pub use nixdocs_index::ListingPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "NIXDOCS_";
const CONFIG_STEM: &str = "config";
const CONFIG_EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where revision directories and the landing page are written.
    pub output: PathBuf,
    /// Substituted for the `stable` revision alias.
    pub stable_branch: String,
    /// Nix system the manuals are built for.
    pub system: String,
    /// Build outputs must live below this directory.
    pub store_root: PathBuf,
    /// The `nix` executable, looked up on `PATH` unless absolute.
    pub nix: String,
    pub compression: String,
    /// Defaults to `nixpkgs.docset.tar.<ext>` for the chosen compression.
    pub archive_name: Option<String>,
    /// Revisions built concurrently.
    pub jobs: usize,
    pub listing_policy: ListingPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from("target"),
            stable_branch: "nixos-25.05".to_string(),
            system: "x86_64-linux".to_string(),
            store_root: PathBuf::from("/nix/store"),
            nix: "nix".to_string(),
            compression: Compression::Gzip.to_string(),
            archive_name: None,
            jobs: 1,
            listing_policy: ListingPolicy::FirstWins,
        }
    }
}

impl Config {
    /// Loads and validates the configuration.
    ///
    /// An explicit `path` must exist; without one, the platform config
    /// directory is searched and a missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };
        if let Some(file) = &file {
            tracing::debug!(path = %file.display(), "loading configuration file");
        }
        let config: Self = Self::figment(file.as_deref())?.extract().or_raise(|| ErrorKind::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// The merged provider stack, before extraction.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            figment = match file.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(file)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(file)),
                Some("json") => figment.merge(Json::file(file)),
                _ => exn::bail!(ErrorKind::Invalid(format!("unknown config format: {}", file.display()))),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// First `config.*` file in the platform config directory.
    pub fn discover() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("org", "nixos", "nixdocs")?;
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| dirs.config_dir().join(format!("{CONFIG_STEM}.{ext}")))
            .find(|path| path.is_file())
    }

    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            exn::bail!(ErrorKind::Invalid("jobs must be at least 1".to_string()));
        }
        if self.stable_branch.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("stable_branch must not be empty".to_string()));
        }
        if self.system.trim().is_empty() || self.nix.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("system and nix must not be empty".to_string()));
        }
        if !self.store_root.is_absolute() {
            exn::bail!(ErrorKind::Invalid(format!("store_root must be absolute: {}", self.store_root.display())));
        }
        if let Some(name) = &self.archive_name
            && (name.is_empty() || name.contains('/'))
        {
            exn::bail!(ErrorKind::Invalid(format!("archive_name must be a file name: {name:?}")));
        }
        self.compression()?;
        Ok(())
    }

    pub fn compression(&self) -> Result<Compression> {
        self.compression
            .parse::<Compression>()
            .or_raise(|| ErrorKind::Invalid(format!("compression: {}", self.compression)))
    }

    pub fn archive_name(&self) -> Result<String> {
        Ok(match &self.archive_name {
            Some(name) => name.clone(),
            None => format!("nixpkgs.docset{}", self.compression()?.archive_extension()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.compression().unwrap(), Compression::Gzip);
        assert_eq!(config.archive_name().unwrap(), "nixpkgs.docset.tar.gz");
    }

    #[test]
    fn missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound(path));
    }

    #[test]
    fn file_then_environment() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "nixdocs.toml",
                r#"
                    stable_branch = "nixos-24.11"
                    jobs = 2
                    archive_name = "nixpkgs.docset.tgz"
                "#,
            )?;
            jail.set_env("NIXDOCS_JOBS", "4");
            let config = Config::load(Some(Path::new("nixdocs.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.stable_branch, "nixos-24.11");
            assert_eq!(config.jobs, 4);
            assert_eq!(config.archive_name().map_err(|e| e.to_string())?, "nixpkgs.docset.tgz");
            assert_eq!(config.system, "x86_64-linux");
            Ok(())
        });
    }

    #[test]
    fn yaml_listing_policy() {
        Jail::expect_with(|jail| {
            jail.create_file("nixdocs.yaml", "listing_policy: last-wins\ncompression: zstd-nope\n")?;
            let figment = Config::figment(Some(Path::new("nixdocs.yaml"))).map_err(|e| e.to_string())?;
            let config: Config = figment.extract()?;
            assert_eq!(config.listing_policy, ListingPolicy::LastWins);
            assert!(config.validate().is_err());
            Ok(())
        });
    }

    #[rstest]
    #[case(Config { jobs: 0, ..Config::default() })]
    #[case(Config { stable_branch: " ".to_string(), ..Config::default() })]
    #[case(Config { store_root: PathBuf::from("nix/store"), ..Config::default() })]
    #[case(Config { compression: "lz4".to_string(), ..Config::default() })]
    #[case(Config { archive_name: Some("out/nixpkgs.tgz".to_string()), ..Config::default() })]
    fn invalid(#[case] config: Config) {
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }

    #[rstest]
    #[case("tgz", Compression::Gzip, "nixpkgs.docset.tar.gz")]
    #[case("bzip2", Compression::Bzip2, "nixpkgs.docset.tar.bz2")]
    #[case("none", Compression::None, "nixpkgs.docset.tar")]
    fn compression_and_archive_name(#[case] name: &str, #[case] expected: Compression, #[case] archive: &str) {
        let config = Config { compression: name.to_string(), ..Config::default() };
        assert_eq!(config.compression().unwrap(), expected);
        assert_eq!(config.archive_name().unwrap(), archive);
    }

    #[test]
    fn unknown_format() {
        let err = Config::figment(Some(Path::new("nixdocs.ini"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }
}

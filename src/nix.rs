//! Invocations of the `nix` command.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::instrument;

/// The doc-dump tool run over each library file.
const NIX_DOC: &str = "nixpkgs#nix-doc";

#[derive(Debug, Clone)]
pub struct Nix {
    binary: PathBuf,
    store_root: PathBuf,
    /// Pass stderr of every invocation through to the terminal.
    verbose: bool,
}

impl Nix {
    /// Finds `binary` on `PATH` (or accepts it as given, if it is a path).
    pub fn locate(binary: &str, store_root: impl Into<PathBuf>) -> Result<Self> {
        let binary = which::which(binary).or_raise(|| ErrorKind::NixNotFound(binary.to_string()))?;
        tracing::debug!(nix = %binary.display(), "located nix");
        Ok(Self { binary, store_root: store_root.into(), verbose: false })
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn store_root(&self) -> &Path {
        &self.store_root
    }

    async fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        let command = args.iter().map(|a| a.to_string_lossy()).collect::<Vec<_>>().join(" ");
        tracing::debug!(command = %command, "running nix");
        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(if self.verbose { Stdio::inherit() } else { Stdio::piped() })
            .kill_on_drop(true)
            .output()
            .await
            .or_raise(|| ErrorKind::Io)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                tracing::debug!(stderr = %stderr.trim(), "nix failed");
            }
            exn::bail!(ErrorKind::NixFailed { command, status: output.status.to_string() });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Builds `nixpkgs/<revision>#<attribute>` and returns its output path.
    #[instrument(skip(self))]
    pub async fn build(&self, revision: &str, attribute: &str) -> Result<PathBuf> {
        let installable = format!("nixpkgs/{revision}#{attribute}");
        let stdout = self.run(["build", installable.as_str(), "--print-out-paths", "--no-link"]).await?;
        let path = out_path(&stdout).ok_or_raise(|| ErrorKind::NixFailed {
            command: format!("build {installable}"),
            status: "no output path".to_string(),
        })?;
        let path = tokio::fs::canonicalize(path).await.or_raise(|| ErrorKind::Io)?;
        if !path.starts_with(&self.store_root) {
            exn::bail!(ErrorKind::OutsideStore(path));
        }
        Ok(path)
    }

    /// Raw, colorized `nix-doc` listing of every function in `file`.
    #[instrument(skip(self), fields(file = %file.display()))]
    pub async fn doc_dump(&self, file: &Path) -> Result<String> {
        let args = ["run", NIX_DOC, "--", "search", ".*"].map(OsStr::new);
        self.run(args.into_iter().chain([file.as_os_str()])).await
    }
}

/// The last non-empty line printed by `nix build --print-out-paths`.
fn out_path(stdout: &str) -> Option<PathBuf> {
    stdout.lines().rev().map(str::trim).find(|l| !l.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/nix/store/abc-source\n", Some("/nix/store/abc-source"))]
    #[case("warning: dirty\n/nix/store/abc-doc\n\n", Some("/nix/store/abc-doc"))]
    #[case("\n  \n", None)]
    fn test_out_path(#[case] stdout: &str, #[case] expected: Option<&str>) {
        assert_eq!(out_path(stdout), expected.map(PathBuf::from));
    }

    #[test]
    fn test_locate_missing_binary() {
        let err = Nix::locate("definitely-not-a-nix-binary", "/nix/store").unwrap_err();
        assert_eq!(*err, ErrorKind::NixNotFound("definitely-not-a-nix-binary".to_string()));
    }

    #[cfg(unix)]
    mod fake {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        /// A `nix` stand-in that prints `output` and exits with `code`.
        fn fake_nix(dir: &Path, output: &Path, code: i32) -> PathBuf {
            let script = dir.join("nix");
            std::fs::write(&script, format!("#!/bin/sh\necho '{}'\nexit {code}\n", output.display())).unwrap();
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
            script
        }

        #[tokio::test]
        async fn test_build_inside_store() {
            let store = tempfile::tempdir().unwrap();
            let store_root = store.path().canonicalize().unwrap();
            let out = store_root.join("abc-nixpkgs");
            std::fs::create_dir(&out).unwrap();
            let bin = tempfile::tempdir().unwrap();
            let script = fake_nix(bin.path(), &out, 0);

            let nix = Nix::locate(script.to_str().unwrap(), &store_root).unwrap();
            assert_eq!(nix.build("master", "path").await.unwrap(), out);
        }

        #[tokio::test]
        async fn test_build_outside_store() {
            let elsewhere = tempfile::tempdir().unwrap();
            let bin = tempfile::tempdir().unwrap();
            let script = fake_nix(bin.path(), elsewhere.path(), 0);

            let nix = Nix::locate(script.to_str().unwrap(), "/nix/store").unwrap();
            let err = nix.build("master", "path").await.unwrap_err();
            assert!(matches!(&*err, ErrorKind::OutsideStore(_)));
        }

        #[tokio::test]
        async fn test_failed_invocation() {
            let bin = tempfile::tempdir().unwrap();
            let script = fake_nix(bin.path(), Path::new("/nix/store/x"), 1);

            let nix = Nix::locate(script.to_str().unwrap(), "/nix/store").unwrap();
            let err = nix.doc_dump(Path::new("/nix/store/x/lib/lists.nix")).await.unwrap_err();
            assert!(matches!(&*err, ErrorKind::NixFailed { command, .. } if command.starts_with("run nixpkgs#nix-doc")));
        }
    }
}

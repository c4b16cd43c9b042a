use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::info;

/// Directory inside the package that holds the built client.
pub const PUBLIC_DIR: &str = "public";
/// Directory inside the package where the server keeps its JSON files.
pub const DATA_DIR: &str = "data";

/// Remove `dir` if present and recreate it empty.
pub fn clean_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("removing {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    info!("Created directory: {}", dir.display());
    Ok(())
}

/// `cargo build --release -p <package>` in the current workspace.
pub fn build_server(package: &str) -> Result<()> {
    let status = Command::new(std::env::var("CARGO").unwrap_or_else(|_| "cargo".into()))
        .args(["build", "--release", "-p", package])
        .status()
        .context("failed to run cargo")?;

    if !status.success() {
        bail!("cargo build exited with {}", status);
    }
    Ok(())
}

/// Copy the compiled server binary into `out`. Returns the destination path.
pub fn copy_server_binary(target_dir: &Path, bin_name: &str, out: &Path) -> Result<PathBuf> {
    let file_name = format!("{}{}", bin_name, std::env::consts::EXE_SUFFIX);
    let src = target_dir.join("release").join(&file_name);
    if !src.is_file() {
        bail!("server binary not found at {}", src.display());
    }

    let dst = out.join(&file_name);
    fs::copy(&src, &dst)
        .with_context(|| format!("copying {} -> {}", src.display(), dst.display()))?;
    info!("Copied file: {} -> {}", src.display(), dst.display());
    Ok(dst)
}

/// Recursively copy `src` into `dst`. Returns the number of files copied.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<usize> {
    fs::create_dir_all(dst).with_context(|| format!("creating {}", dst.display()))?;

    let mut copied = 0;
    for entry in fs::read_dir(src).with_context(|| format!("reading {}", src.display()))? {
        let entry = entry?;
        let from = entry.path();
        let to = dst.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copied += copy_dir(&from, &to)?;
        } else {
            fs::copy(&from, &to)
                .with_context(|| format!("copying {} -> {}", from.display(), to.display()))?;
            info!("Copied file: {} -> {}", from.display(), to.display());
            copied += 1;
        }
    }
    Ok(copied)
}

/// Server settings for the packaged layout.
pub fn write_env(out: &Path, port: u16) -> Result<()> {
    let contents = format!(
        "CHATTER_PORT={port}\nCHATTER_DATA_DIR={DATA_DIR}\nCHATTER_STATIC_DIR={PUBLIC_DIR}\n"
    );
    let path = out.join(".env");
    fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
    info!("Created {}", path.display());
    Ok(())
}

pub fn write_readme(out: &Path, bin_name: &str, port: u16) -> Result<()> {
    let contents = format!(
        "# Chatter - production build

## Run
1. `cd` into this directory
2. Start the server: `./{bin_name}`
3. Open http://localhost:{port}

## Notes
- The server hosts both the API (`/api/...`) and the client in `{PUBLIC_DIR}/`.
- Messages and users are stored as JSON files in `{DATA_DIR}/`.
- Settings live in `.env`; see `CHATTER_*` variables.
"
    );
    let path = out.join("README.md");
    fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
    info!("Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("chatter_dist_{}_{}", tag, uuid::Uuid::new_v4()))
    }

    #[test]
    fn clean_dir_removes_old_contents() {
        let dir = temp_dir("clean");
        fs::create_dir_all(dir.join("stale")).unwrap();
        fs::write(dir.join("stale/old.txt"), "x").unwrap();

        clean_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn copy_dir_is_recursive() {
        let src = temp_dir("src");
        fs::create_dir_all(src.join("assets/img")).unwrap();
        fs::write(src.join("index.html"), "<html></html>").unwrap();
        fs::write(src.join("assets/app.js"), "console.log(1)").unwrap();
        fs::write(src.join("assets/img/logo.svg"), "<svg/>").unwrap();

        let dst = temp_dir("dst");
        let copied = copy_dir(&src, &dst).unwrap();

        assert_eq!(copied, 3);
        assert_eq!(
            fs::read_to_string(dst.join("assets/img/logo.svg")).unwrap(),
            "<svg/>"
        );
        assert_eq!(
            fs::read_to_string(dst.join("index.html")).unwrap(),
            "<html></html>"
        );
    }

    #[test]
    fn missing_binary_is_an_error() {
        let out = temp_dir("out");
        fs::create_dir_all(&out).unwrap();
        let err = copy_server_binary(&temp_dir("target"), "chatter", &out).unwrap_err();
        assert!(err.to_string().contains("server binary not found"));
    }

    #[test]
    fn env_points_at_packaged_dirs() {
        let out = temp_dir("env");
        fs::create_dir_all(&out).unwrap();
        write_env(&out, 3002).unwrap();

        let env = fs::read_to_string(out.join(".env")).unwrap();
        assert!(env.contains("CHATTER_PORT=3002"));
        assert!(env.contains("CHATTER_DATA_DIR=data"));
        assert!(env.contains("CHATTER_STATIC_DIR=public"));
    }

    #[test]
    fn readme_mentions_binary_and_port() {
        let out = temp_dir("readme");
        fs::create_dir_all(&out).unwrap();
        write_readme(&out, "chatter", 8080).unwrap();

        let readme = fs::read_to_string(out.join("README.md")).unwrap();
        assert!(readme.contains("./chatter"));
        assert!(readme.contains("http://localhost:8080"));
    }
}

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Exposes the commit the binary was built from as `VECDRAW_GIT_HASH`.
///
/// Packagers building from a tarball can set `VECDRAW_GIT_HASH` themselves; a
/// checkout with local changes gets a `-dirty` suffix.
fn main() {
    println!("cargo:rerun-if-env-changed=VECDRAW_GIT_HASH");

    let manifest_dir = env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let version = env::var("VECDRAW_GIT_HASH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| describe_head(&manifest_dir))
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=VECDRAW_GIT_HASH={version}");

    if let Some(git_dir) = git_dir(&manifest_dir) {
        for watched in ["HEAD", "index", "refs", "packed-refs"] {
            rerun_if_exists(&git_dir.join(watched));
        }
    }
}

fn git(manifest_dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(manifest_dir)
        .args(args)
        .output()
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn describe_head(manifest_dir: &Path) -> Option<String> {
    let hash = git(manifest_dir, &["rev-parse", "--short", "HEAD"]).filter(|h| !h.is_empty())?;
    let dirty = git(manifest_dir, &["status", "--porcelain", "--untracked-files=no"])
        .is_some_and(|status| !status.is_empty());
    Some(if dirty { format!("{hash}-dirty") } else { hash })
}

/// The `.git` directory, following a `gitdir:` file in worktrees.
fn git_dir(manifest_dir: &Path) -> Option<PathBuf> {
    if let Some(dir) = env::var_os("GIT_DIR") {
        return Some(PathBuf::from(dir));
    }

    let dot_git = manifest_dir.join(".git");
    if dot_git.is_dir() {
        return Some(dot_git);
    }

    let pointer = fs::read_to_string(&dot_git).ok()?;
    let target = PathBuf::from(pointer.strip_prefix("gitdir:")?.trim());
    Some(if target.is_relative() {
        manifest_dir.join(target)
    } else {
        target
    })
}

fn rerun_if_exists(path: &Path) {
    if path.exists() {
        println!("cargo:rerun-if-changed={}", path.display());
    }
}

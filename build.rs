// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=SHUTTER_VERSION");

    // Packagers can pin the version (e.g. flatpak builds without .git)
    let version = std::env::var("SHUTTER_VERSION")
        .ok()
        .or_else(describe_head)
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// `git describe` output with the leading `v` removed.
///
/// "v0.1.0" on a tag stays "0.1.0"; "v0.1.0-5-gabcdef1" becomes
/// "0.1.0+5.abcdef1" so the About page shows how far past the tag we are.
fn describe_head() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--match", "v*"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let raw = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let raw = raw.strip_prefix('v').unwrap_or(&raw);

    let parts: Vec<&str> = raw.rsplitn(3, '-').collect();
    if let [hash, commits, base] = parts.as_slice() {
        let hash = hash.strip_prefix('g').unwrap_or(hash);
        return Some(format!("{}+{}.{}", base, commits, hash));
    }

    Some(raw.to_string())
}

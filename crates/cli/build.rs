// Build metadata shown by `csvrecon --version`.

use std::env;
use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/index");
    println!("cargo:rerun-if-env-changed=CSVRECON_BUILD_ID");

    // Release pipelines without a checkout pass the revision explicitly
    let revision = env::var("CSVRECON_BUILD_ID")
        .ok()
        .filter(|id| !id.trim().is_empty())
        .or_else(|| git(&["describe", "--always", "--dirty", "--abbrev=7"]))
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=CSVRECON_REVISION={revision}");

    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=CSVRECON_TARGET={target}");

    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=CSVRECON_PROFILE={profile}");
}

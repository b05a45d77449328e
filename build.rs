fn main() {
    // Re-run when HEAD moves or the index changes (commits, checkouts, staging)
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-changed=.git/index");

    let git = |args: &[&str]| {
        std::process::Command::new("git")
            .args(args)
            .output()
            .ok()
            .filter(|o| o.status.success())
    };

    let hash = git(&["rev-parse", "--short", "HEAD"])
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default();
    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .is_some_and(|o| !o.stdout.is_empty());
    let on_tag = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();

    let hash = if dirty && !hash.is_empty() {
        format!("{hash}+dirty")
    } else {
        hash
    };

    println!("cargo:rustc-env=PHOTO_PORTER_GIT_HASH={hash}");
    println!("cargo:rustc-env=PHOTO_PORTER_RELEASE_TAG={on_tag}");
}

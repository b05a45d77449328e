//! Runs the `photo-porter` binary against scratch folders.
//!
//! Every invocation passes `--config-dir` pointing at the scratch folder so
//! a `photo-porter.toml` in the working directory cannot leak in.

use image::{ImageFormat, RgbImage};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn photo_porter(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_photo-porter"))
        .arg("--config-dir")
        .arg(config_dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run photo-porter")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, image::Rgb([10, 120, 240]))
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();
    path
}

fn s(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn gen_config_prints_stock_file() {
    let tmp = TempDir::new().unwrap();
    let out = photo_porter(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("history_limit = 100"));
    assert!(text.contains("verify_on_open = true"));
}

#[test]
fn info_json() {
    let tmp = TempDir::new().unwrap();
    let photo = write_png(tmp.path(), "wide.png", 100, 50);

    let out = photo_porter(tmp.path(), &["info", s(&photo), "--json"]);

    assert!(out.status.success(), "{}", stderr(&out));
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["width"], 100);
    assert_eq!(json["height"], 50);
    assert_eq!(json["format"], "PNG");
    assert_eq!(json["color_mode"], "RGB");
    assert_eq!(json["filename"], "wide.png");
}

#[test]
fn check_reports_invalid_file() {
    let tmp = TempDir::new().unwrap();
    let fake = tmp.path().join("fake.jpg");
    std::fs::write(&fake, b"not a jpeg").unwrap();

    let deep = photo_porter(tmp.path(), &["check", s(&fake)]);
    assert!(!deep.status.success());
    assert!(stdout(&deep).starts_with("INVALID"));

    let shallow = photo_porter(tmp.path(), &["check", s(&fake), "--shallow"]);
    assert!(shallow.status.success());
    assert!(stdout(&shallow).starts_with("OK"));
}

#[test]
fn gray_writes_bw_copy() {
    let tmp = TempDir::new().unwrap();
    let photo = write_png(tmp.path(), "leaf.png", 8, 8);

    let out = photo_porter(tmp.path(), &["gray", s(&photo)]);

    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).contains("leaf_bw.png"));
    assert!(tmp.path().join("leaf_bw.png").exists());
    assert!(photo.exists());
}

#[test]
fn move_uses_config_default_destination() {
    let tmp = TempDir::new().unwrap();
    let dest = tmp.path().join("sorted");
    std::fs::create_dir(&dest).unwrap();
    std::fs::write(
        tmp.path().join("photo-porter.toml"),
        format!("default_destination = {:?}\n", s(&dest)),
    )
    .unwrap();
    let photo = write_png(tmp.path(), "a.png", 4, 4);

    let out = photo_porter(tmp.path(), &["move", s(&photo)]);

    assert!(out.status.success(), "{}", stderr(&out));
    assert!(dest.join("a.png").exists());
    assert!(!photo.exists());
}

#[test]
fn move_without_any_destination_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    let photo = write_png(tmp.path(), "a.png", 4, 4);

    let out = photo_porter(tmp.path(), &["move", s(&photo)]);

    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("No destination given"));
    assert!(photo.exists());
}

#[test]
fn rename_collision_fails_and_keeps_files() {
    let tmp = TempDir::new().unwrap();
    let photo = write_png(tmp.path(), "a.png", 4, 4);
    write_png(tmp.path(), "b.png", 4, 4);

    let out = photo_porter(tmp.path(), &["rename", s(&photo), "b"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("already exists"));
    assert!(photo.exists());
}

#[test]
fn invalid_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("photo-porter.toml"), "history_limit = 0\n").unwrap();
    let photo = write_png(tmp.path(), "a.png", 4, 4);

    let out = photo_porter(tmp.path(), &["info", s(&photo)]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("history_limit"));
}

#[test]
fn shell_reads_commands_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let tmp = TempDir::new().unwrap();
    let photo = write_png(tmp.path(), "a.png", 4, 4);

    let mut child = Command::new(env!("CARGO_BIN_EXE_photo-porter"))
        .arg("--config-dir")
        .arg(tmp.path())
        .arg("shell")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    write!(
        child.stdin.take().unwrap(),
        "open {}\nrename b\nquit\n",
        s(&photo)
    )
    .unwrap();
    let out = child.wait_with_output().unwrap();

    assert!(out.status.success());
    assert!(stdout(&out).contains("Renamed to b.png"));
    assert!(tmp.path().join("b.png").exists());
}

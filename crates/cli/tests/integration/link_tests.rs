//! Link command integration tests.

use std::os::unix::fs::MetadataExt;

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn link_shares_inode() {
  let env = TestEnv::new();
  env.write_file("icon.png", "png");

  env
    .ndm_cmd()
    .args(["link", "icon.png", "dist/a.png", "dist/b.png"])
    .assert()
    .success()
    .stdout(predicate::str::contains("2 targets built"));

  let ino = std::fs::metadata(env.path("icon.png")).unwrap().ino();
  assert_eq!(std::fs::metadata(env.path("dist/a.png")).unwrap().ino(), ino);
  assert_eq!(std::fs::metadata(env.path("dist/b.png")).unwrap().ino(), ino);
}

#[test]
fn link_missing_source_fails() {
  let env = TestEnv::new();

  env
    .ndm_cmd()
    .args(["link", "icon.png", "favicon.png"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("source file missing"));
}

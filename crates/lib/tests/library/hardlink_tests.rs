//! Hard link targets, alone and behind converters.

use std::os::unix::fs::MetadataExt;
use std::sync::Arc;

use ndmake_lib::{AggregateTarget, BuildConfig, HardlinkTarget, TargetRef, update};

use super::common::{SpyRunner, TestEnv, at, copy_of, set_mtime};

fn inode(path: &std::path::Path) -> u64 {
  std::fs::metadata(path).unwrap().ino()
}

#[test]
fn link_shares_the_source_inode() {
  let env = TestEnv::new();
  let png = env.source("icon.png", "png");
  let link_path = env.path("dist/favicon.png");
  let link = HardlinkTarget::new(&link_path, png);

  let report = update(&link, &SpyRunner::new(), &BuildConfig::default()).unwrap();

  assert_eq!(report.updated.len(), 1);
  assert_eq!(inode(&link_path), inode(&env.path("icon.png")));
  assert!(update(&link, &SpyRunner::new(), &BuildConfig::default()).unwrap().is_noop());
}

#[test]
fn relinks_after_source_is_rebuilt() {
  let env = TestEnv::new();
  let svg = env.source("logo.svg", "<svg/>");
  let png_path = env.path("icon.png");
  let png = copy_of(&png_path, vec![svg]);
  let link_path = env.path("dist/icon.png");
  let link: TargetRef = Arc::new(HardlinkTarget::new(&link_path, png));
  let runner = SpyRunner::new();
  let config = BuildConfig::default();

  update(link.as_ref(), &runner, &config).unwrap();
  let first = inode(&link_path);
  set_mtime(&png_path, at(0));
  set_mtime(&env.path("logo.svg"), at(100));

  update(link.as_ref(), &runner, &config).unwrap();

  // The rebuilt output is renamed into place, so it is a new inode.
  assert_ne!(inode(&png_path), first);
  assert_eq!(inode(&link_path), inode(&png_path));
  assert_eq!(runner.count(), 2);
}

#[test]
fn several_links_to_one_source() {
  let env = TestEnv::new();
  let png = env.source("icon.png", "png");
  let links: Vec<TargetRef> = ["a.png", "b.png"]
    .iter()
    .map(|name| Arc::new(HardlinkTarget::new(env.path(name), png.clone())) as TargetRef)
    .collect();
  let all = AggregateTarget::new(links);

  let report = update(&all, &SpyRunner::new(), &BuildConfig::default()).unwrap();

  assert_eq!(report.updated.len(), 2);
  assert_eq!(inode(&env.path("a.png")), inode(&env.path("icon.png")));
  assert_eq!(inode(&env.path("b.png")), inode(&env.path("icon.png")));
}

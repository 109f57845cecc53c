#![allow(clippy::doc_markdown)] // Generated file contains OPT_LEVEL without backticks

use std::sync::LazyLock;

include!(concat!(env!("OUT_DIR"), "/built.rs"));

/// Version string reported by `postrun --version` and logged at startup.
///
/// This is the package version followed by the short git commit when one is known, and a
/// `-dirty` marker when the working tree had uncommitted changes at build time.
pub static VERSION: LazyLock<String> = LazyLock::new(|| {
    let mut version = PKG_VERSION.to_string();
    if let Some(commit) = GIT_COMMIT_HASH_SHORT {
        version.push('-');
        version.push_str(commit);
    }
    if GIT_DIRTY == Some(true) {
        version.push_str("-dirty");
    }
    version
});

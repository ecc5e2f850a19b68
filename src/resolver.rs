use std::path::Path;

use crate::taxonomy::{self, GestureDefinition};

/// Token of a training filename `<token>_<anything>.<ext>`: everything before the first `_`.
///
/// A name without `_` yields the whole name, which matches no training token.
pub fn train_token(name: &str) -> &str {
    name.split('_').next().unwrap_or(name)
}

/// Token of a test filename `<a>-<b>-<token>.<ext>`: the extension is stripped and the
/// remainder after the second `-` is returned. `None` with fewer than two hyphens.
pub fn test_token(name: &str) -> Option<&str> {
    let base = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    base.splitn(3, '-').nth(2)
}

pub fn resolve_train_filename(name: &str) -> Option<&'static GestureDefinition> {
    taxonomy::resolve_train(train_token(name))
}

pub fn resolve_test_filename(name: &str) -> Option<&'static GestureDefinition> {
    test_token(name).and_then(taxonomy::resolve_test)
}

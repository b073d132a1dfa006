//! Recursive file collection shared by the tools.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Collect every file under `dir` accepted by `keep`, sorted by path.
pub fn collect_files(dir: &Path, keep: &dyn Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(dir, keep, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, keep: &dyn Fn(&Path) -> bool, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.context("read entry")?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", path.display()))?;
        if file_type.is_dir() {
            walk(&path, keep, files)?;
        } else if keep(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// True if `path` has one of `extensions` (without the dot).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_nested_files_in_order() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        fs::create_dir_all(root.join("b/nested")).expect("mkdir");
        fs::write(root.join("b/nested/z.json"), "{}").expect("write");
        fs::write(root.join("a.json"), "{}").expect("write");
        fs::write(root.join("notes.txt"), "").expect("write");

        let json = vec!["json".to_string()];
        let files = collect_files(root, &|path| has_extension(path, &json)).expect("collect");
        assert_eq!(files, vec![root.join("a.json"), root.join("b/nested/z.json")]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = collect_files(&temp.path().join("nope"), &|_| true).expect_err("missing dir");
        assert!(err.to_string().starts_with("read "));
    }
}

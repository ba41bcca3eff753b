use super::{ArchiveError, ArchiveResult};
use std::path::{Component, Path, PathBuf};

/// Validate an archive entry name and turn it into a path relative to the
/// extraction root.
///
/// `.` components are dropped. Absolute names, drive prefixes and `..` would
/// escape the destination and make the archive invalid. Returns `None` when
/// nothing is left (e.g. `./`).
pub fn safe_relative_path(name: &Path) -> ArchiveResult<Option<PathBuf>> {
    let mut relative = PathBuf::new();
    for component in name.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ArchiveError::CorruptArchive(format!(
                    "Entry escapes extraction directory: {}",
                    name.display()
                )));
            }
        }
    }

    if relative.as_os_str().is_empty() {
        return Ok(None);
    }
    Ok(Some(relative))
}

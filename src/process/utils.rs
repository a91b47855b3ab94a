use anyhow::{Context, Result};
use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};
use tempfile::{Builder, NamedTempFile};

/// Write `path` through a temporary sibling file, then rename it into place.
///
/// Readers never observe a half-written file, and a crash mid-write leaves
/// the previous contents untouched. An existing target keeps its
/// permissions; a new one gets the same mode a plain `fs::write` would.
pub fn write_atomically<T, F>(path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut dyn Write) -> Result<T>,
{
    let dir = parent_dir(path);
    fs::create_dir_all(dir).with_context(|| format!("creating directory {:?}", dir))?;

    let mut tmp = temp_sibling(dir)?;

    let value = {
        let mut out = BufWriter::new(&mut tmp);
        let value = write(&mut out)?;
        out.flush()
            .with_context(|| format!("flushing temporary file for {:?}", path))?;
        value
    };
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .with_context(|| format!("copying permissions of {:?}", path))?;
    }
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("syncing temporary file for {:?}", path))?;

    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("renaming temporary file onto {:?}", path))?;

    Ok(value)
}

fn temp_sibling(dir: &Path) -> Result<NamedTempFile> {
    let mut builder = Builder::new();
    // tempfile defaults to 0600; ask for 0666 and let the umask trim it
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder
        .tempfile_in(dir)
        .with_context(|| format!("creating temporary file in {:?}", dir))
}

/// Directory holding `path`; `.` for bare file names.
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomically_replaces_contents() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.csv");
        fs::write(&path, "old\n")?;

        let written = write_atomically(&path, |w| {
            w.write_all(b"new\n")?;
            Ok(4)
        })?;

        assert_eq!(written, 4);
        assert_eq!(fs::read_to_string(&path)?, "new\n");
        // only the target remains, no stray temp files
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_failed_write_keeps_original() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.csv");
        fs::write(&path, "keep me\n")?;

        let res: Result<()> = write_atomically(&path, |w| {
            w.write_all(b"partial")?;
            anyhow::bail!("boom")
        });

        assert!(res.is_err());
        assert_eq!(fs::read_to_string(&path)?, "keep me\n");
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_creates_missing_parent() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested/deeper/out.json");
        write_atomically(&path, |w| Ok(w.write_all(b"{}")?))?;
        assert_eq!(fs::read_to_string(&path)?, "{}");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_keeps_existing_mode() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        for mode in [0o644, 0o640] {
            let path = dir.path().join(format!("card_data_{:o}.csv", mode));
            fs::write(&path, "\"Bolt\",2027\n")?;
            fs::set_permissions(&path, fs::Permissions::from_mode(mode))?;

            write_atomically(&path, |w| Ok(w.write_all(b"\"Bolt\",2028\n")?))?;

            assert_eq!(fs::metadata(&path)?.permissions().mode() & 0o777, mode);
        }
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_gets_umask_default() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let plain = dir.path().join("plain.csv");
        fs::write(&plain, "")?;
        let fresh = dir.path().join("fresh.csv");
        write_atomically(&fresh, |w| Ok(w.write_all(b"")?))?;

        let mode = |p: &Path| -> Result<u32> { Ok(fs::metadata(p)?.permissions().mode() & 0o777) };
        assert_eq!(mode(&fresh)?, mode(&plain)?);
        Ok(())
    }

    #[test]
    fn test_parent_dir_of_bare_name() {
        assert_eq!(parent_dir(Path::new("card_data.csv")), Path::new("."));
        assert_eq!(parent_dir(Path::new("data/x.csv")), Path::new("data"));
    }
}

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes `bytes` to `path`, replacing any previous file.
///
/// The data goes to a sibling `.partial` file first and is renamed into place
/// only after it has been flushed and synced, so readers never observe a
/// half-written image. Any stale file at `path` is removed before the rename.
pub fn write_replacing(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let partial = partial_path(path);
    {
        let file = File::create(&partial)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }
    if path.exists() {
        fs::remove_file(path)?;
    }
    fs::rename(&partial, path).inspect_err(|_| {
        let _ = fs::remove_file(&partial);
    })
}

/// `<dir>/<placeholder>.<ext>`, the file name each chart is kept under.
pub fn chart_path(dir: &Path, placeholder: &str, extension: &str) -> PathBuf {
    dir.join(format!("{placeholder}.{extension}"))
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

use std::fs;
use std::path::Path;

pub const IO_BUFFER_SIZE: usize = 256 * 1024; // 256kb

pub fn file_writer<W>(w: W) -> std::io::BufWriter<W>
where
    W: std::io::Write,
{
    std::io::BufWriter::with_capacity(IO_BUFFER_SIZE, w)
}

pub fn file_reader<R>(r: R) -> std::io::BufReader<R>
where
    R: std::io::Read,
{
    std::io::BufReader::with_capacity(IO_BUFFER_SIZE, r)
}

/// Creates the missing parent directories of `path`.
pub fn create_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

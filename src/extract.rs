//! Archive unpacking for release packages.
//!
//! Upstream ships `.tar.gz` for most platforms and `.zip` for Windows (and
//! for some very old releases on other systems too), so the format is
//! sniffed from the leading magic bytes rather than taken from the file name.

use anyhow::{anyhow, Context, Result};
use flate2::read::GzDecoder;
use fs_err as fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tar::Archive;
use zip::ZipArchive;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZIP_MAGIC: [u8; 4] = [b'P', b'K', 0x03, 0x04];

/// Unpack an archive of unknown format into a directory.
pub trait ArchiveExtractor {
    /// Returns the paths written, relative to `destination`.
    fn extract(&self, bytes: &[u8], destination: &Path) -> Result<Vec<PathBuf>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

pub fn detect_format(bytes: &[u8]) -> Option<ArchiveFormat> {
    if bytes.starts_with(&GZIP_MAGIC) {
        Some(ArchiveFormat::TarGz)
    } else if bytes.starts_with(&ZIP_MAGIC) {
        Some(ArchiveFormat::Zip)
    } else {
        None
    }
}

#[derive(Debug, Default)]
pub struct AutoExtractor;

impl ArchiveExtractor for AutoExtractor {
    fn extract(&self, bytes: &[u8], destination: &Path) -> Result<Vec<PathBuf>> {
        match detect_format(bytes) {
            Some(ArchiveFormat::TarGz) => extract_tar_gz(bytes, destination),
            Some(ArchiveFormat::Zip) => extract_zip(bytes, destination),
            None => Err(anyhow!("unrecognised archive format")),
        }
    }
}

fn extract_tar_gz(bytes: &[u8], destination: &Path) -> Result<Vec<PathBuf>> {
    let mut archive = Archive::new(GzDecoder::new(bytes));
    let mut written = Vec::new();
    for entry in archive.entries().with_context(|| "reading tar entries")? {
        let mut entry = entry?;
        let rel = entry.path()?.into_owned();
        // unpack_in refuses entries that would land outside the destination
        if entry
            .unpack_in(destination)
            .with_context(|| format!("unpacking {}", rel.display()))?
        {
            written.push(rel);
        } else {
            tracing::warn!(entry = %rel.display(), "skipped archive entry outside destination");
        }
    }
    Ok(written)
}

fn extract_zip(bytes: &[u8], destination: &Path) -> Result<Vec<PathBuf>> {
    let mut zip = ZipArchive::new(Cursor::new(bytes)).with_context(|| "opening zip archive")?;
    let mut written = Vec::new();
    for i in 0..zip.len() {
        let mut file = zip.by_index(i)?;
        let Some(rel) = file.enclosed_name().map(Path::to_path_buf) else {
            tracing::warn!(entry = file.name(), "skipped archive entry outside destination");
            continue;
        };
        let out_path = destination.join(&rel);
        if file.is_dir() {
            fs::create_dir_all(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = fs::File::create(&out_path)?;
            std::io::copy(&mut file, &mut out)
                .with_context(|| format!("writing {}", out_path.display()))?;
        }
        written.push(rel);
    }
    Ok(written)
}

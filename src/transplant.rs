//! The end-to-end certificate transplant.
//!
//! The output image is the target copied verbatim, its certificate-table
//! directory entry repointed at end-of-file, and the source's certificate
//! block appended there. Its digest will not match the borrowed signature;
//! nothing here verifies or recomputes anything.

use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;
use scroll::Pwrite;

use crate::error::{self, Error};
use crate::pe::data_directories::{DataDirectory, SIZEOF_DATA_DIRECTORY};
use crate::pe::CertificateTable;

/// What a successful transplant wrote.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Transplant {
    /// File offset of the appended certificate block in the output image;
    /// equals the length of the copied target.
    pub certificate_offset: u64,
    /// Length of the block in bytes.
    pub certificate_size: u32,
}

/// Grafts the certificate table of `signed_source` onto a copy of `target`
/// written to `output`.
///
/// Any certificate the target already carries is ignored: its directory
/// entry is overwritten and the old block, if present, is simply orphaned
/// inside the copied bytes.
///
/// Fatal errors abort with no rollback; a partially written output is
/// untrusted until this function returns `Ok`.
pub fn transplant(
    signed_source: impl AsRef<Path>,
    target: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> error::Result<Transplant> {
    let source_bytes = fs::read(signed_source)?;
    let source_table = CertificateTable::parse(&source_bytes)?;
    if !source_table.is_present() {
        return Err(Error::NotSigned);
    }
    let certificate = source_table.certificate_bytes(&source_bytes)?;
    debug!(
        "source certificate block: {:#x} bytes at {:#x}",
        certificate.len(),
        source_table.directory.virtual_address
    );

    let target_bytes = fs::read(target)?;
    let target_table = CertificateTable::parse(&target_bytes)?;
    let file_size = target_bytes.len() as u64;
    if file_size > u64::from(u32::MAX) {
        return Err(Error::ImageTooLarge(file_size));
    }

    let mut out = create_output(output.as_ref())?;
    out.write_all(&target_bytes)?;

    let directory = DataDirectory {
        virtual_address: file_size as u32,
        size: certificate.len() as u32,
    };
    let mut entry = [0u8; SIZEOF_DATA_DIRECTORY];
    entry.pwrite_with(directory, 0, scroll::LE)?;
    out.seek(SeekFrom::Start(target_table.entry_offset))?;
    out.write_all(&entry)?;

    out.seek(SeekFrom::End(0))?;
    out.write_all(certificate)?;
    debug!(
        "patched entry at {:#x}, appended certificate at {:#x}",
        target_table.entry_offset, file_size
    );

    Ok(Transplant {
        certificate_offset: file_size,
        certificate_size: directory.size,
    })
}

#[cfg(unix)]
fn create_output(path: &Path) -> error::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    Ok(OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o755)
        .open(path)?)
}

#[cfg(not(unix))]
fn create_output(path: &Path) -> error::Result<File> {
    Ok(OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?)
}

//! A PE32/PE32+ header walker, just deep enough to locate the attribute
//! certificate table.
//!
//! Missing "MZ" stubs, bad PE signatures and unexpected optional-header
//! magic are reported as warnings and the walk continues on best-effort
//! offsets; truncated structures and unknown optional-header sizes are
//! errors.

pub mod data_directories;
pub mod header;
pub mod optional_header;

use log::warn;
use scroll::Pread;

use crate::error::{self, Error};
use self::data_directories::DataDirectory;
use self::header::{Header, SIZEOF_COFF_HEADER};
use self::optional_header::Variant;

/// The certificate table of one image: where its data directory entry
/// lives, and what that entry currently records.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct CertificateTable {
    /// Absolute file offset of directory entry 4 itself, inside the
    /// image's optional header.
    pub entry_offset: u64,
    /// The entry as recorded in the image. `virtual_address` is a raw file
    /// offset for this entry.
    pub directory: DataDirectory,
}

impl CertificateTable {
    /// Locates the certificate-table directory entry of `bytes`.
    ///
    /// Walks stub → COFF header → optional header, selects the PE32 or
    /// PE32+ layout from `size_of_optional_header`, and reads entry 4 at
    /// its fixed offset within that layout.
    pub fn parse(bytes: &[u8]) -> error::Result<Self> {
        let header = Header::parse(bytes)?;
        let variant =
            Variant::from_size_of_optional_header(header.coff_header.size_of_optional_header)?;
        let optional_offset = header.coff_offset + SIZEOF_COFF_HEADER;
        let required = optional_offset as u64 + variant.size() as u64;
        if required > bytes.len() as u64 {
            return Err(Error::TruncatedImage {
                structure: "optional header",
                required,
                len: bytes.len() as u64,
            });
        }
        let magic: u16 = bytes.pread_with(optional_offset, scroll::LE)?;
        if magic != variant.magic() {
            warn!(
                "optional header has unexpected magic {:#x} (expected {:#x}), continuing",
                magic,
                variant.magic()
            );
        }
        let entry_offset = optional_offset + variant.certificate_table_entry_offset();
        let directory: DataDirectory = bytes.pread_with(entry_offset, scroll::LE)?;
        Ok(CertificateTable {
            entry_offset: entry_offset as u64,
            directory,
        })
    }

    /// Whether the entry actually describes a certificate block. An
    /// all-zero entry means the image is unsigned.
    pub fn is_present(&self) -> bool {
        self.directory.virtual_address != 0 && self.directory.size != 0
    }

    /// The raw certificate block of `bytes`, bounds-checked against the
    /// image length.
    pub fn certificate_bytes<'a>(&self, bytes: &'a [u8]) -> error::Result<&'a [u8]> {
        let start = self.directory.virtual_address as u64;
        let end = start + self.directory.size as u64;
        if end > bytes.len() as u64 {
            return Err(Error::TruncatedImage {
                structure: "certificate block",
                required: end,
                len: bytes.len() as u64,
            });
        }
        Ok(&bytes[start as usize..end as usize])
    }
}

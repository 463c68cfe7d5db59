use log::{debug, warn};
use scroll::{Pread, Pwrite, SizeWith};

use crate::error::{self, Error};

/// Magic number of the legacy DOS header: `[0x5A, 0x4D]`, "MZ" read in
/// little endian.
#[doc(alias("IMAGE_DOS_SIGNATURE"))]
pub const DOS_MAGIC: u16 = 0x5a4d;
/// File offset of the PE header pointer (`e_lfanew`), always 0x3c.
pub const PE_POINTER_OFFSET: usize = 0x3c;
/// Length of the legacy stub region an image must carry before the PE
/// header pointer can be followed.
pub const SIZEOF_DOS_STUB: usize = 96;
/// PE\0\0, little endian.
pub const PE_MAGIC: u32 = 0x0000_4550;
pub const SIZEOF_PE_MAGIC: usize = 4;

/// The two fields of the legacy DOS header the locator reads; the rest of
/// the stub is opaque.
#[derive(Debug, PartialEq, Copy, Clone, Default)]
#[doc(alias("IMAGE_DOS_HEADER"))]
pub struct DosHeader {
    #[doc(alias("e_magic"))]
    pub signature: u16,
    /// File offset of the PE signature.
    #[doc(alias("e_lfanew"))]
    pub pe_pointer: u32,
}

/// COFF file header.
#[repr(C)]
#[derive(Debug, PartialEq, Copy, Clone, Default, Pread, Pwrite, SizeWith)]
#[doc(alias("IMAGE_FILE_HEADER"))]
pub struct CoffHeader {
    pub machine: u16,
    pub number_of_sections: u16,
    pub time_date_stamp: u32,
    pub pointer_to_symbol_table: u32,
    pub number_of_symbol_table: u32,
    /// Selects the PE32 or PE32+ optional header layout.
    pub size_of_optional_header: u16,
    pub characteristics: u16,
}

pub const SIZEOF_COFF_HEADER: usize = 20;

/// The header region of one image, resolved down to its COFF header.
#[derive(Debug, PartialEq, Copy, Clone, Default)]
pub struct Header {
    /// `None` when the image has no "MZ" stub and headers start at offset 0.
    pub dos_header: Option<DosHeader>,
    pub coff_header: CoffHeader,
    /// Absolute file offset of the COFF header.
    pub coff_offset: usize,
}

impl Header {
    /// Walks the legacy stub down to the COFF header.
    ///
    /// Images without an "MZ" signature are treated as starting directly
    /// with the COFF header at offset 0. A missing or mismatched PE
    /// signature is reported as a warning and parsing continues on the
    /// offsets read so far.
    pub fn parse(bytes: &[u8]) -> error::Result<Self> {
        if bytes.len() < SIZEOF_DOS_STUB {
            return Err(Error::TruncatedImage {
                structure: "DOS stub",
                required: SIZEOF_DOS_STUB as u64,
                len: bytes.len() as u64,
            });
        }
        let signature: u16 = bytes.pread_with(0, scroll::LE)?;
        let (dos_header, coff_offset) = if signature == DOS_MAGIC {
            let pe_pointer: u32 = bytes.pread_with(PE_POINTER_OFFSET, scroll::LE)?;
            match bytes.pread_with::<u32>(pe_pointer as usize, scroll::LE) {
                Ok(PE_MAGIC) => (),
                Ok(pe_signature) => warn!(
                    "invalid PE signature {:#x} at offset {:#x}, continuing",
                    pe_signature, pe_pointer
                ),
                Err(_) => warn!(
                    "PE signature pointer {:#x} lies outside the image, continuing",
                    pe_pointer
                ),
            }
            let dos_header = DosHeader {
                signature,
                pe_pointer,
            };
            (
                Some(dos_header),
                pe_pointer as u64 + SIZEOF_PE_MAGIC as u64,
            )
        } else {
            debug!("no MZ signature, assuming headers start at offset 0");
            (None, 0)
        };
        let required = coff_offset + SIZEOF_COFF_HEADER as u64;
        if required > bytes.len() as u64 {
            return Err(Error::TruncatedImage {
                structure: "COFF header",
                required,
                len: bytes.len() as u64,
            });
        }
        let coff_offset = coff_offset as usize;
        let coff_header: CoffHeader = bytes.pread_with(coff_offset, scroll::LE)?;
        debug!(
            "COFF header at {:#x}: machine {:#x}, optional header size {:#x}",
            coff_offset, coff_header.machine, coff_header.size_of_optional_header
        );
        Ok(Header {
            dos_header,
            coff_header,
            coff_offset,
        })
    }
}

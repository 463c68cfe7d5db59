use crate::error::{self, Error};
use crate::pe::data_directories::{CERTIFICATE_TABLE, SIZEOF_DATA_DIRECTORY};

/// Optional header magic number for a 32-bit binary.
pub const MAGIC_32: u16 = 0x10b;
/// Optional header magic number for a 64-bit binary.
pub const MAGIC_64: u16 = 0x20b;

/// Total size of the PE32 optional header, the 16-entry data directory
/// array included. This is the value a 32-bit image carries in
/// `size_of_optional_header`.
pub const SIZEOF_OPTIONAL_HEADER_32: usize = 224;
/// Total size of the PE32+ optional header, data directories included.
pub const SIZEOF_OPTIONAL_HEADER_64: usize = 240;

/// Standard plus windows-specific fields of the PE32 layout; the data
/// directory array starts immediately after.
pub const SIZEOF_FIXED_FIELDS_32: usize = 96;
/// Standard plus windows-specific fields of the PE32+ layout.
pub const SIZEOF_FIXED_FIELDS_64: usize = 112;

/// The two optional header layouts.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Variant {
    /// 32-bit layout, magic 0x10b.
    Pe32,
    /// 64-bit layout (PE32+), magic 0x20b.
    Pe32Plus,
}

impl Variant {
    /// Selects the layout recorded in the COFF header's
    /// `size_of_optional_header`.
    ///
    /// A size matching neither layout means the image cannot be walked at
    /// all, and is an error rather than a guess.
    pub fn from_size_of_optional_header(size: u16) -> error::Result<Self> {
        match size as usize {
            SIZEOF_OPTIONAL_HEADER_32 => Ok(Variant::Pe32),
            SIZEOF_OPTIONAL_HEADER_64 => Ok(Variant::Pe32Plus),
            _ => Err(Error::UnsupportedOptionalHeaderSize(size)),
        }
    }

    /// Expected value of the optional header's `magic` field.
    pub fn magic(&self) -> u16 {
        match self {
            Variant::Pe32 => MAGIC_32,
            Variant::Pe32Plus => MAGIC_64,
        }
    }

    /// Size in bytes of this layout's optional header.
    pub fn size(&self) -> usize {
        match self {
            Variant::Pe32 => SIZEOF_OPTIONAL_HEADER_32,
            Variant::Pe32Plus => SIZEOF_OPTIONAL_HEADER_64,
        }
    }

    /// Byte offset of the certificate-table directory entry from the start
    /// of the optional header: the fixed fields, then four earlier entries.
    pub fn certificate_table_entry_offset(&self) -> usize {
        let fixed_fields = match self {
            Variant::Pe32 => SIZEOF_FIXED_FIELDS_32,
            Variant::Pe32Plus => SIZEOF_FIXED_FIELDS_64,
        };
        fixed_fields + CERTIFICATE_TABLE * SIZEOF_DATA_DIRECTORY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_table_entry_offsets() {
        assert_eq!(Variant::Pe32.certificate_table_entry_offset(), 128);
        assert_eq!(Variant::Pe32Plus.certificate_table_entry_offset(), 144);
    }

    #[test]
    fn variant_from_size() {
        assert_eq!(
            Variant::from_size_of_optional_header(224).unwrap(),
            Variant::Pe32
        );
        assert_eq!(
            Variant::from_size_of_optional_header(240).unwrap(),
            Variant::Pe32Plus
        );
    }

    #[test]
    fn unrecognized_sizes_are_errors() {
        for size in [0u16, 28, 96, 223, 225, 0xffff] {
            assert!(matches!(
                Variant::from_size_of_optional_header(size),
                Err(Error::UnsupportedOptionalHeaderSize(s)) if s == size
            ));
        }
    }
}

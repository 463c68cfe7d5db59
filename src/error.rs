use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Open/read/write/seek failure on one of the image files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Byte-level decode or encode of a header record failed.
    #[error(transparent)]
    Scroll(#[from] scroll::Error),
    /// A fixed-size structure, or the recorded certificate block, extends
    /// past the end of the image.
    #[error("image truncated: {structure} requires {required:#x} bytes, image has {len:#x}")]
    TruncatedImage {
        structure: &'static str,
        required: u64,
        len: u64,
    },
    /// `size_of_optional_header` matches neither the PE32 nor the PE32+
    /// layout.
    #[error("unrecognized optional header size {0:#x}: image is neither PE32 nor PE32+")]
    UnsupportedOptionalHeaderSize(u16),
    /// The image length cannot be written into a directory entry's 32-bit
    /// `virtual_address` field.
    #[error("image is {0} bytes, more than a directory entry can address")]
    ImageTooLarge(u64),
    /// The image's certificate-table entry is all zero.
    #[error("image carries no certificate table")]
    NotSigned,
}

//! Transplant the Authenticode certificate table of one PE image onto
//! another.
//!
//! The crate parses just enough of an image's DOS, COFF and optional
//! headers to find data directory entry 4 — the attribute certificate
//! table, the one directory entry whose `virtual_address` is a raw file
//! offset — then grafts the block it describes onto a second image: the
//! target is copied verbatim, its own entry 4 is repointed at end-of-file,
//! and the borrowed block is appended there.
//!
//! Nothing is verified or re-hashed. The output is structurally signed but
//! cryptographically meaningless, which is the point: it exists for
//! fault-injection and signature-parser testing.
//!
//! ```no_run
//! let grafted = certgraft::transplant("signed.exe", "unsigned.exe", "out.exe")?;
//! println!(
//!     "{} certificate bytes at {:#x}",
//!     grafted.certificate_size, grafted.certificate_offset
//! );
//! # Ok::<(), certgraft::Error>(())
//! ```

pub mod error;
pub mod pe;
pub mod transplant;

pub use crate::error::{Error, Result};
pub use crate::pe::CertificateTable;
pub use crate::transplant::{transplant, Transplant};

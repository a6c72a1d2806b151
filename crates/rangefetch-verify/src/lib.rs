//! Content verification primitives for downloaded artifacts.
//!
//! Provides incremental hashing over a fixed set of digest algorithms and a
//! [`Checksum`] value that streams a reader to its end and compares digests,
//! without ever holding the whole artifact in memory.
//!
//! # Example
//!
//! ```
//! use rangefetch_verify::Checksum;
//!
//! let checksum = Checksum::parse(
//!     "sha256",
//!     "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
//! )
//! .unwrap();
//!
//! checksum.verify_reader(&b"hello world"[..]).unwrap();
//! ```

pub use self::checksum::Checksum;
pub use self::error::{Result, VerifyError};
pub use self::hasher::{
    Algorithm, AnyHasher, DigestHasher, Hasher, Md5Hasher, Sha1Hasher, Sha256Hasher, Sha512Hasher,
};
pub use self::reader::HashingReader;

mod checksum;
mod error;
mod hasher;
mod reader;

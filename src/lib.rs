//! Additional, more convenient, functionality, which leverages the Rust
//! standard library, layered on top of [`knit_core`].
//!
//! This crate:
//!
//! * Re-exports all of [`knit_core`].
//!
//! * Provides ready-made functions, in [`common`](common/index.html), for the
//! common basic parsing applications of in-memory strings and of readers.
//!
//! * Provides [`SourceStream`] types for any `Iterator` of `char`s and for any
//! [`Read`]er of UTF-8 bytes.  The latter decodes incrementally, so streamed
//! input is parsed as it arrives and never needs to be entirely in memory.
//!
//! * Provides a canonical [printer](printer/index.html) that renders any tree
//! as text that reparses to a structurally-equal tree.
//!
//! * Provides [loading](config_file/index.html) of configurations from JSON.
//!
//! Unlike [`knit_core`], this crate's purpose mostly is to provide premade
//! implementations intended for ready use.  So, instead of placing such items
//! in sub-modules named `premade`, they are placed at the top of their
//! respective modules, including for the premade items re-exported from
//! `knit_core`.
//!
//! [`knit_core`]: ../knit_core/index.html
//! [`SourceStream`]: ../knit_core/trait.SourceStream.html
//! [`Read`]: http://doc.rust-lang.org/std/io/trait.Read.html


#![forbid(unsafe_code)]


// Re-export everything from the core crate.
#[doc(no_inline)]
pub use knit_core::*;

/// Parse functions provided for convenience, for common basic parsing
/// applications.
pub mod common {
    mod helper;
    pub mod inmem;
    pub mod stream;
}

/// `SourceStream` types that use the `std` library.  Also re-exports the core
/// crate's premades.
pub mod source_stream {
    #[doc(no_inline)]
    pub use knit_core::premade::*;

    mod char_iter_src_strm;
    pub use char_iter_src_strm::*;

    mod read_src_strm;
    pub use read_src_strm::*;
}

pub mod printer;

pub mod config_file;

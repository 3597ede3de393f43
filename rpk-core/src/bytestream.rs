//! A simple implementation of a bytestream reader
//! and writer.
//!
//! The reader borrows a slice of bytes and hands them out
//! one byte or one big endian integer at a time, the writer
//! owns a growable byte sink that encoders append to. The
//! rpk wire format is big endian only, so no little endian
//! surface exists here.
pub use reader::ZByteReader;
pub use writer::ZByteWriter;

mod reader;
mod writer;

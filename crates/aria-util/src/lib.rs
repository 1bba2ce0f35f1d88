//! Small building blocks shared by the audio path.

pub mod ring_buffer;
pub mod zip_many;

pub use ring_buffer::RingBuffer;
pub use zip_many::{zip_many, ZipMany};

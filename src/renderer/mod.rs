//! Monochrome rendering
//!
//! All drawing is solid rectangles, pixels and 6x10 text into a one-bit buffer.

pub mod framebuffer;

pub use framebuffer::FrameBuffer;

#![no_std]

pub mod framebuffer;
pub mod header;
pub mod packer;
pub mod threshold;

extern crate alloc;

#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod codec;
mod command;
mod frame;
mod transport;

// CAN message present, Standard, DLC = 3 | ID 0x19F | data 12 34 56 | 1 message | SPI write CANCTRL = 0
// 83 33 E0 00 00 12 34 56 .. [52] 01 .. [58] 00 .. [60] 02 0F 00 00

/// Every transfer with the bridge is exactly this many bytes
pub const FRAME_SIZE: usize = 64;

pub use command::*;
pub use frame::*;
pub use transport::*;

pub use embedded_can::{ExtendedId, Id, StandardId};

use crate::FRAME_SIZE;

/// A run of bits inside a single frame byte, described by the byte index, the
/// position of its least significant bit and its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub index: usize,
    pub shift: u8,
    pub width: u8,
}

impl Field {
    /// A field covering a whole byte
    pub const fn byte(index: usize) -> Self {
        Self {
            index,
            shift: 0,
            width: 8,
        }
    }

    pub const fn bits(index: usize, shift: u8, width: u8) -> Self {
        Self {
            index,
            shift,
            width,
        }
    }

    /// Mask of the field before shifting it into place
    pub const fn mask(&self) -> u8 {
        ((1u16 << self.width) - 1) as u8
    }

    pub fn read(&self, frame: &[u8; FRAME_SIZE]) -> u8 {
        (frame[self.index] >> self.shift) & self.mask()
    }

    pub fn write(&self, frame: &mut [u8; FRAME_SIZE], value: u8) {
        let mask = self.mask() << self.shift;

        frame[self.index] = (frame[self.index] & !mask) | ((value & self.mask()) << self.shift);
    }

    pub fn read_flag(&self, frame: &[u8; FRAME_SIZE]) -> bool {
        self.read(frame) != 0
    }

    pub fn write_flag(&self, frame: &mut [u8; FRAME_SIZE], value: bool) {
        self.write(frame, value as u8)
    }
}

/* CAN message header (byte 0) */

pub const MESSAGE_PRESENT: Field = Field::bits(0, 7, 1);
pub const EXTENDED_ID: Field = Field::bits(0, 5, 1);
pub const REMOTE_REQUEST: Field = Field::bits(0, 4, 1);
pub const DATA_LENGTH: Field = Field::bits(0, 0, 4);

/* Identifier, most significant field first (mirrors SIDH/SIDL/EID8/EID0) */

pub const STANDARD_ID_FIELDS: [Field; 2] = [Field::byte(1), Field::bits(2, 5, 3)];

pub const EXTENDED_ID_FIELDS: [Field; 5] = [
    Field::byte(1),
    Field::bits(2, 5, 3),
    Field::bits(2, 0, 2),
    Field::byte(3),
    Field::byte(4),
];

/* Message data */

pub const DATA_OFFSET: usize = 5;
pub const MAX_DATA_LENGTH: usize = 8;

/// End (exclusive) of the region reserved for CAN messages
pub const MESSAGE_AREA_END: usize = 52;

/* USB trailer */

pub const MESSAGE_COUNT: Field = Field::byte(52);
pub const CONTROL_MODE: Field = Field::byte(58);
pub const SPI_OPCODE: Field = Field::byte(60);
pub const SPI_REGISTER: Field = Field::byte(61);
pub const SPI_DATA: Field = Field::byte(62);

/// Total number of bits covered by a field list
pub const fn width_of(fields: &[Field]) -> u32 {
    let mut width = 0;
    let mut i = 0;

    while i < fields.len() {
        width += fields[i].width as u32;
        i += 1;
    }

    width
}

/// Scatters `value` over `fields`, consuming its bits from the most
/// significant end. Bits above the combined width are dropped, so callers
/// validate the range beforehand.
pub fn pack_bits(frame: &mut [u8; FRAME_SIZE], fields: &[Field], value: u32) {
    let mut remaining = width_of(fields);

    for field in fields {
        remaining -= field.width as u32;
        field.write(frame, (value >> remaining) as u8);
    }
}

/// Gathers the bits of `fields` back into a single value, first field being
/// the most significant.
pub fn unpack_bits(frame: &[u8; FRAME_SIZE], fields: &[Field]) -> u32 {
    fields.iter().fold(0u32, |value, field| {
        (value << field.width) | field.read(frame) as u32
    })
}

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::MalformedFrameError;

/// MCP2515 register addresses commonly targeted through the USB bridge
pub mod register {
    /// CAN status register
    pub const CANSTAT: u8 = 0x0E;
    /// CAN control register, the top three bits request an operating mode
    pub const CANCTRL: u8 = 0x0F;
}

/// An SPI instruction forwarded by the bridge to the CAN controller.
///
/// Register commands carry the register address and a data byte. For
/// [`SpiCommand::WriteRegister`] the data is the value to write; for
/// [`SpiCommand::ReadRegister`] it is zero on requests and holds the register
/// value in the device's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiCommand {
    Reset,
    ReadRegister { register: u8, data: u8 },
    WriteRegister { register: u8, data: u8 },
    RequestToSend,
    ReadStatus,
    ReadFirmwareVersion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[num_enum(error_type(name = MalformedFrameError, constructor = MalformedFrameError::UnknownOpcode))]
#[repr(u8)]
pub enum SpiOpcode {
    Reset = 0xC0,
    ReadRegister = 0x03,
    WriteRegister = 0x02,
    RequestToSend = 0x80,
    ReadStatus = 0xB0,
    ReadFirmwareVersion = 0xD0,
}

impl SpiCommand {
    /// Requests the value of `register`
    pub fn read(register: u8) -> Self {
        Self::ReadRegister { register, data: 0 }
    }

    /// Writes `data` into `register`
    pub fn write(register: u8, data: u8) -> Self {
        Self::WriteRegister { register, data }
    }

    pub fn opcode(&self) -> SpiOpcode {
        match self {
            Self::Reset => SpiOpcode::Reset,
            Self::ReadRegister { .. } => SpiOpcode::ReadRegister,
            Self::WriteRegister { .. } => SpiOpcode::WriteRegister,
            Self::RequestToSend => SpiOpcode::RequestToSend,
            Self::ReadStatus => SpiOpcode::ReadStatus,
            Self::ReadFirmwareVersion => SpiOpcode::ReadFirmwareVersion,
        }
    }

    /// The register and data bytes of the command, `(0, 0)` for commands
    /// without operands
    pub fn operands(&self) -> (u8, u8) {
        match *self {
            Self::ReadRegister { register, data } | Self::WriteRegister { register, data } => {
                (register, data)
            }
            _ => (0, 0),
        }
    }

    /// Rebuilds a command from the raw opcode, register and data bytes of a
    /// frame. An opcode of zero means no command was carried. Operands of
    /// commands which take none are ignored here; reserved-bit checks happen
    /// at the frame level.
    pub fn from_raw(
        opcode: u8,
        register: u8,
        data: u8,
    ) -> Result<Option<Self>, MalformedFrameError> {
        if opcode == 0 {
            return Ok(None);
        }

        let opcode: SpiOpcode = opcode.try_into()?;

        Ok(Some(match opcode {
            SpiOpcode::Reset => Self::Reset,
            SpiOpcode::ReadRegister => Self::ReadRegister { register, data },
            SpiOpcode::WriteRegister => Self::WriteRegister { register, data },
            SpiOpcode::RequestToSend => Self::RequestToSend,
            SpiOpcode::ReadStatus => Self::ReadStatus,
            SpiOpcode::ReadFirmwareVersion => Self::ReadFirmwareVersion,
        }))
    }
}

/// Operating modes requested through the REQOP bits (7..5) of `CANCTRL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OperatingMode {
    /// Default mode where the controller sends and receives frames on the bus
    #[default]
    Normal = 0x00,
    Sleep = 0x20,
    Loopback = 0x40,
    ListenOnly = 0x60,
    Configuration = 0x80,
}

impl OperatingMode {
    const REQOP_MASK: u8 = 0b1110_0000;

    /// Extracts the requested mode from a raw `CANCTRL` value, ignoring the
    /// clock and one-shot bits. Returns `None` for the invalid REQOP patterns.
    pub fn from_control(control: u8) -> Option<Self> {
        Self::try_from(control & Self::REQOP_MASK).ok()
    }
}

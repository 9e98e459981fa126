use embedded_can::{ExtendedId, Id, StandardId};
use heapless::Vec;

use crate::{
    codec::{
        pack_bits, unpack_bits, CONTROL_MODE, DATA_LENGTH, DATA_OFFSET, EXTENDED_ID,
        EXTENDED_ID_FIELDS, MAX_DATA_LENGTH, MESSAGE_AREA_END, MESSAGE_COUNT, MESSAGE_PRESENT,
        REMOTE_REQUEST, SPI_DATA, SPI_OPCODE, SPI_REGISTER, STANDARD_ID_FIELDS,
    },
    command::{OperatingMode, SpiCommand},
    FRAME_SIZE,
};

/// Errors raised while building frame contents from out-of-range values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    #[error("CAN Standard ID ({0:?}) is out of the valid range (0..=0x7FF)")]
    StandardIdOutOfRange(u16),
    #[error("CAN Extended ID ({0:?}) is out of the valid range (0..=0x1FFFFFFF)")]
    ExtendedIdOutOfRange(u32),
    #[error("Message data length ({0:?}) is out of the valid range (0..=8)")]
    DataTooLong(usize),
    #[error("Remote frame was given ({0:?}) bytes of data (should be empty)")]
    DataInRemoteFrame(usize),
    #[error("Message count ({0:?}) is out of the valid range (0..=1)")]
    InvalidMessageCount(u8),
}

/// Errors raised while decoding a buffer received from the device.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MalformedFrameError {
    #[error("Received a buffer of ({0:?}) bytes but frames are exactly 64 bytes")]
    InvalidLength(usize),
    #[error("Received an unrecognized SPI opcode ({0:?})")]
    UnknownOpcode(u8),
    #[error("Received a message count ({0:?}) that was out of the valid range (0..=1)")]
    InvalidMessageCount(u8),
    #[error("Received a data length ({0:?}) that was out of the valid range (0..=8)")]
    InvalidDataLength(u8),
    #[error("Received a remote frame declaring ({0:?}) bytes of data (should be empty)")]
    DataInRemoteFrame(u8),
    #[error("Received non-zero reserved bits ({value:#04x}) in byte {index:?}")]
    NonZeroReservedBits { index: usize, value: u8 },
}

/// A CAN 2.0 message carried in the first bytes of a USB frame.
///
/// Remote (RTR) messages never carry data, so their data length is always
/// zero. Data messages hold up to 8 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CanMessage {
    #[cfg_attr(feature = "defmt", defmt(Debug2Format))]
    id: Id,
    remote: bool,
    #[cfg_attr(feature = "defmt", defmt(Debug2Format))]
    data: Vec<u8, MAX_DATA_LENGTH>,
}

impl CanMessage {
    /// Creates a message, checking that `data` fits in 8 bytes and is empty
    /// for remote requests.
    pub fn new(id: impl Into<Id>, remote: bool, data: &[u8]) -> Result<Self, ValidationError> {
        if remote && !data.is_empty() {
            return Err(ValidationError::DataInRemoteFrame(data.len()));
        }

        let data = Vec::from_slice(data).map_err(|_| ValidationError::DataTooLong(data.len()))?;

        Ok(Self {
            id: id.into(),
            remote,
            data,
        })
    }

    /// Creates a data message
    pub fn new_data(id: impl Into<Id>, data: &[u8]) -> Result<Self, ValidationError> {
        Self::new(id, false, data)
    }

    /// Creates a remote transmission request
    pub fn new_remote(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            remote: true,
            data: Vec::new(),
        }
    }

    /// Creates a data message with an 11-bit identifier given as a raw value
    pub fn standard(raw_id: u16, data: &[u8]) -> Result<Self, ValidationError> {
        Self::new_data(standard_id(raw_id)?, data)
    }

    /// Creates a data message with a 29-bit identifier given as a raw value
    pub fn extended(raw_id: u32, data: &[u8]) -> Result<Self, ValidationError> {
        Self::new_data(extended_id(raw_id)?, data)
    }

    /// Gets the message ID
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    pub fn is_remote(&self) -> bool {
        self.remote
    }

    /// Gets the data length, which always matches the length of [`Self::data`]
    pub fn dlc(&self) -> usize {
        self.data.len()
    }

    /// Gets the message data (empty for remote requests)
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Validates a raw 11-bit identifier
pub fn standard_id(raw: u16) -> Result<StandardId, ValidationError> {
    StandardId::new(raw).ok_or(ValidationError::StandardIdOutOfRange(raw))
}

/// Validates a raw 29-bit identifier
pub fn extended_id(raw: u32) -> Result<ExtendedId, ValidationError> {
    ExtendedId::new(raw).ok_or(ValidationError::ExtendedIdOutOfRange(raw))
}

/// The logical payload of one USB frame, in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameContents {
    /// The CAN message to transmit, or the one received from the bus
    pub can_message: Option<CanMessage>,
    /// Number of CAN messages carried (0 or 1)
    pub message_count: u8,
    /// Raw `CANCTRL` value, 0 selects normal mode
    pub control_mode: u8,
    /// The SPI instruction (echoed back by the device in responses)
    pub spi_command: Option<SpiCommand>,
}

impl FrameContents {
    /// Contents carrying a single CAN message, with the message count set
    pub fn with_message(message: CanMessage) -> Self {
        Self {
            can_message: Some(message),
            message_count: 1,
            ..Default::default()
        }
    }

    /// Contents carrying only an SPI command
    pub fn with_command(command: SpiCommand) -> Self {
        Self {
            spi_command: Some(command),
            ..Default::default()
        }
    }

    /// Consumes self and returns a new self with the supplied control byte
    pub fn with_control_mode(mut self, control_mode: u8) -> Self {
        self.control_mode = control_mode;
        self
    }

    /// Consumes self and returns a new self with the supplied SPI command
    pub fn with_spi_command(mut self, command: SpiCommand) -> Self {
        self.spi_command = Some(command);
        self
    }

    /// The operating mode requested by the control byte, if valid
    pub fn operating_mode(&self) -> Option<OperatingMode> {
        OperatingMode::from_control(self.control_mode)
    }
}

/// A raw 64-byte USB transfer, always fully initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsbFrame([u8; FRAME_SIZE]);

impl Default for UsbFrame {
    fn default() -> Self {
        Self([0; FRAME_SIZE])
    }
}

impl UsbFrame {
    /// Copies a received buffer into a frame. The buffer must be exactly 64
    /// bytes long.
    pub fn from_bytes(buffer: &[u8]) -> Result<Self, MalformedFrameError> {
        <[u8; FRAME_SIZE]>::try_from(buffer)
            .map(Self)
            .map_err(|_| MalformedFrameError::InvalidLength(buffer.len()))
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; FRAME_SIZE] {
        self.0
    }
}

impl From<[u8; FRAME_SIZE]> for UsbFrame {
    fn from(bytes: [u8; FRAME_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for UsbFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Converts between [`FrameContents`] and [`UsbFrame`].
///
/// The codec holds no state besides its decoding options, so a single
/// instance can be shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameCodec {
    strict_padding: bool,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCodec {
    /// Creates a codec which rejects frames with non-zero reserved bits
    pub const fn new() -> Self {
        Self {
            strict_padding: true,
        }
    }

    /// Consumes self and returns a new self with the supplied padding policy.
    /// When disabled, bits outside the active fields are ignored on decode.
    pub const fn with_strict_padding(mut self, strict_padding: bool) -> Self {
        self.strict_padding = strict_padding;
        self
    }

    pub fn is_strict_padding(&self) -> bool {
        self.strict_padding
    }

    pub fn encode(&self, contents: &FrameContents) -> Result<UsbFrame, ValidationError> {
        if contents.message_count > 1 {
            return Err(ValidationError::InvalidMessageCount(contents.message_count));
        }

        let mut frame = [0u8; FRAME_SIZE];

        if let Some(message) = &contents.can_message {
            MESSAGE_PRESENT.write_flag(&mut frame, true);
            REMOTE_REQUEST.write_flag(&mut frame, message.is_remote());
            DATA_LENGTH.write(&mut frame, message.dlc() as u8);

            match message.id() {
                Id::Standard(id) => {
                    pack_bits(&mut frame, &STANDARD_ID_FIELDS, id.as_raw() as u32);
                }
                Id::Extended(id) => {
                    EXTENDED_ID.write_flag(&mut frame, true);
                    pack_bits(&mut frame, &EXTENDED_ID_FIELDS, id.as_raw());
                }
            }

            frame[DATA_OFFSET..DATA_OFFSET + message.dlc()].copy_from_slice(message.data());
        }

        MESSAGE_COUNT.write(&mut frame, contents.message_count);
        CONTROL_MODE.write(&mut frame, contents.control_mode);

        if let Some(command) = &contents.spi_command {
            let (register, data) = command.operands();

            SPI_OPCODE.write(&mut frame, command.opcode().into());
            SPI_REGISTER.write(&mut frame, register);
            SPI_DATA.write(&mut frame, data);
        }

        Ok(UsbFrame(frame))
    }

    /// Decodes a raw buffer, which must be exactly 64 bytes long
    pub fn decode(&self, buffer: &[u8]) -> Result<FrameContents, MalformedFrameError> {
        let frame = UsbFrame::from_bytes(buffer)?;

        self.decode_frame(&frame)
    }

    pub fn decode_frame(&self, frame: &UsbFrame) -> Result<FrameContents, MalformedFrameError> {
        let bytes = frame.as_bytes();

        let can_message = if MESSAGE_PRESENT.read_flag(bytes) {
            Some(decode_message(bytes)?)
        } else {
            None
        };

        let message_count = MESSAGE_COUNT.read(bytes);

        if message_count > 1 {
            return Err(MalformedFrameError::InvalidMessageCount(message_count));
        }

        let spi_command = SpiCommand::from_raw(
            SPI_OPCODE.read(bytes),
            SPI_REGISTER.read(bytes),
            SPI_DATA.read(bytes),
        )?;

        let contents = FrameContents {
            can_message,
            message_count,
            control_mode: CONTROL_MODE.read(bytes),
            spi_command,
        };

        if self.strict_padding {
            check_reserved_bits(frame, &contents)?;
        }

        Ok(contents)
    }
}

fn decode_message(bytes: &[u8; FRAME_SIZE]) -> Result<CanMessage, MalformedFrameError> {
    let dlc = DATA_LENGTH.read(bytes);

    if dlc as usize > MAX_DATA_LENGTH {
        return Err(MalformedFrameError::InvalidDataLength(dlc));
    }

    // The field tables are exactly 11 and 29 bits wide, the fallbacks are unreachable
    let id: Id = if EXTENDED_ID.read_flag(bytes) {
        ExtendedId::new(unpack_bits(bytes, &EXTENDED_ID_FIELDS))
            .unwrap_or(ExtendedId::MAX)
            .into()
    } else {
        StandardId::new(unpack_bits(bytes, &STANDARD_ID_FIELDS) as u16)
            .unwrap_or(StandardId::MAX)
            .into()
    };

    if REMOTE_REQUEST.read_flag(bytes) {
        if dlc != 0 {
            return Err(MalformedFrameError::DataInRemoteFrame(dlc));
        }

        return Ok(CanMessage::new_remote(id));
    }

    let data = &bytes[DATA_OFFSET..DATA_OFFSET + dlc as usize];

    CanMessage::new_data(id, data).map_err(|_| MalformedFrameError::InvalidDataLength(dlc))
}

/// Re-encodes the decoded contents and reports the first byte where the
/// original frame carries bits the fields do not account for.
fn check_reserved_bits(
    frame: &UsbFrame,
    contents: &FrameContents,
) -> Result<(), MalformedFrameError> {
    // Decoded values are already range checked
    let expected = FrameCodec::new()
        .encode(contents)
        .map_err(|_| MalformedFrameError::InvalidMessageCount(contents.message_count))?;

    match frame
        .as_bytes()
        .iter()
        .zip(expected.as_bytes())
        .position(|(actual, expected)| actual != expected)
    {
        Some(index) => Err(MalformedFrameError::NonZeroReservedBits {
            index,
            value: frame.as_bytes()[index] ^ expected.as_bytes()[index],
        }),
        None => Ok(()),
    }
}

/// Encodes `contents` with the default codec
pub fn encode(contents: &FrameContents) -> Result<UsbFrame, ValidationError> {
    FrameCodec::new().encode(contents)
}

/// Decodes a 64-byte buffer with the default (strict) codec
pub fn decode(buffer: &[u8]) -> Result<FrameContents, MalformedFrameError> {
    FrameCodec::new().decode(buffer)
}

const _: () = assert!(DATA_OFFSET + MAX_DATA_LENGTH <= MESSAGE_AREA_END);

#[cfg(test)]
mod tests {
    use embedded_can::{ExtendedId, Id, StandardId};
    use heapless::Vec;

    use crate::{
        command::register, decode, encode, CanMessage, FrameCodec, FrameContents,
        MalformedFrameError, OperatingMode, SpiCommand, UsbFrame, ValidationError, FRAME_SIZE,
    };

    fn canctrl_write_frame() -> [u8; FRAME_SIZE] {
        let mut frame = [0u8; FRAME_SIZE];

        frame[0] = 0x83;
        frame[1] = 0x33;
        frame[2] = 0xE0;
        frame[5] = 0x12;
        frame[6] = 0x34;
        frame[7] = 0x56;
        frame[52] = 1;
        frame[58] = 0;
        frame[60] = 0x02;
        frame[61] = 0x0f;
        frame[62] = 0;

        frame
    }

    fn canctrl_write_contents() -> FrameContents {
        FrameContents::with_message(CanMessage::standard(0x19F, &[0x12, 0x34, 0x56]).unwrap())
            .with_control_mode(0)
            .with_spi_command(SpiCommand::write(register::CANCTRL, 0))
    }

    #[test]
    fn encode_canctrl_write_with_message() {
        let frame = encode(&canctrl_write_contents()).unwrap();

        assert_eq!(frame.as_bytes(), &canctrl_write_frame());
        assert_eq!(frame.as_bytes().len(), 64);
    }

    #[test]
    fn decode_canctrl_write_with_message() {
        assert_eq!(decode(&canctrl_write_frame()), Ok(canctrl_write_contents()));
    }

    #[test]
    fn round_trips() {
        let cases = [
            FrameContents::default(),
            canctrl_write_contents(),
            FrameContents::with_message(CanMessage::new_data(StandardId::ZERO, &[]).unwrap()),
            FrameContents::with_message(
                CanMessage::new_data(StandardId::MAX, &[0, 1, 2, 3, 4, 5, 6, 7]).unwrap(),
            ),
            FrameContents::with_message(
                CanMessage::new_data(ExtendedId::MAX, &[0xFF; 8]).unwrap(),
            ),
            FrameContents::with_message(CanMessage::extended(0x1234_5678, &[0xAA]).unwrap()),
            FrameContents::with_message(CanMessage::new_remote(StandardId::MAX)),
            FrameContents::with_message(CanMessage::new_remote(ExtendedId::ZERO)),
            FrameContents::with_command(SpiCommand::Reset),
            FrameContents::with_command(SpiCommand::ReadStatus),
            FrameContents::with_command(SpiCommand::RequestToSend),
            FrameContents::with_command(SpiCommand::ReadFirmwareVersion),
            FrameContents::with_command(SpiCommand::ReadRegister {
                register: register::CANSTAT,
                data: 0x87,
            }),
            FrameContents::with_command(SpiCommand::write(register::CANCTRL, 0x80))
                .with_control_mode(OperatingMode::Configuration.into()),
            FrameContents {
                can_message: None,
                message_count: 1,
                control_mode: 0xFF,
                spi_command: None,
            },
        ];

        for contents in cases {
            let frame = encode(&contents).unwrap();

            assert_eq!(frame.as_bytes().len(), FRAME_SIZE);
            assert_eq!(decode(frame.as_bytes()), Ok(contents));
        }
    }

    #[test]
    fn round_trips_every_length_and_id_kind() {
        const DATA: [u8; 8] = [0x00, 0xFF, 0x5A, 0xA5, 0x01, 0x80, 0x7F, 0xFE];

        let standard_ids = [0x000, 0x001, 0x19F, 0x400, 0x555, 0x7FF];
        let extended_ids = [0x0000_0000, 0x0000_0001, 0x0003_0000, 0x1234_5678, 0x1FFF_FFFF];

        let mut ids: Vec<Id, 16> = Vec::new();

        for raw in standard_ids {
            ids.push(StandardId::new(raw).unwrap().into()).unwrap();
        }

        for raw in extended_ids {
            ids.push(ExtendedId::new(raw).unwrap().into()).unwrap();
        }

        for id in ids {
            let remote = FrameContents::with_message(CanMessage::new_remote(id));
            let frame = encode(&remote).unwrap();

            assert_eq!(decode(frame.as_bytes()), Ok(remote));

            for len in 0..=8 {
                let contents =
                    FrameContents::with_message(CanMessage::new_data(id, &DATA[..len]).unwrap());
                let frame = encode(&contents).unwrap();

                assert_eq!(frame.as_bytes()[0] & 0x0F, len as u8);
                assert_eq!(decode(frame.as_bytes()), Ok(contents));
            }
        }
    }

    #[test]
    fn identifier_boundaries() {
        assert!(CanMessage::standard(0x7FF, &[]).is_ok());
        assert_eq!(
            CanMessage::standard(0x800, &[]),
            Err(ValidationError::StandardIdOutOfRange(0x800))
        );

        assert!(CanMessage::extended(0x1FFF_FFFF, &[]).is_ok());
        assert_eq!(
            CanMessage::extended(0x2000_0000, &[]),
            Err(ValidationError::ExtendedIdOutOfRange(0x2000_0000))
        );

        let frame = encode(&FrameContents::with_message(
            CanMessage::extended(0x1FFF_FFFF, &[]).unwrap(),
        ))
        .unwrap();

        assert_eq!(&frame.as_bytes()[..5], &[0xA0, 0xFF, 0xE3, 0xFF, 0xFF]);
    }

    #[test]
    fn message_validation() {
        assert_eq!(
            CanMessage::new(StandardId::ZERO, true, &[1]),
            Err(ValidationError::DataInRemoteFrame(1))
        );

        assert_eq!(
            CanMessage::new_data(StandardId::ZERO, &[0; 9]),
            Err(ValidationError::DataTooLong(9))
        );

        let remote = CanMessage::new(StandardId::ZERO, true, &[]).unwrap();

        assert!(remote.is_remote());
        assert_eq!(remote.dlc(), 0);
        assert_eq!(remote.data(), &[] as &[u8]);
    }

    #[test]
    fn encode_rejects_message_count() {
        let contents = FrameContents {
            message_count: 2,
            ..Default::default()
        };

        assert_eq!(encode(&contents), Err(ValidationError::InvalidMessageCount(2)));
    }

    #[test]
    fn remote_frame_layout() {
        let frame = encode(&FrameContents::with_message(CanMessage::new_remote(
            StandardId::new(0x123).unwrap(),
        )))
        .unwrap();

        assert_eq!(&frame.as_bytes()[..3], &[0x90, 0x24, 0x60]);
        assert!(frame.as_bytes()[3..52].iter().all(|b| *b == 0));
        assert_eq!(frame.as_bytes()[52], 1);
        assert!(frame.as_bytes()[53..].iter().all(|b| *b == 0));
    }

    #[test]
    fn decode_rejects_bad_lengths() {
        assert_eq!(decode(&[0; 63]), Err(MalformedFrameError::InvalidLength(63)));
        assert_eq!(decode(&[0; 65]), Err(MalformedFrameError::InvalidLength(65)));
        assert_eq!(decode(&[]), Err(MalformedFrameError::InvalidLength(0)));
        assert_eq!(
            UsbFrame::from_bytes(&[0; 10]),
            Err(MalformedFrameError::InvalidLength(10))
        );
    }

    #[test]
    fn decode_errors() {
        let mut frame = [0u8; FRAME_SIZE];
        frame[60] = 0x42;
        assert_eq!(decode(&frame), Err(MalformedFrameError::UnknownOpcode(0x42)));

        let mut frame = [0u8; FRAME_SIZE];
        frame[52] = 2;
        assert_eq!(decode(&frame), Err(MalformedFrameError::InvalidMessageCount(2)));

        let mut frame = [0u8; FRAME_SIZE];
        frame[0] = 0x89;
        assert_eq!(decode(&frame), Err(MalformedFrameError::InvalidDataLength(9)));

        let mut frame = [0u8; FRAME_SIZE];
        frame[0] = 0x8F;
        assert_eq!(decode(&frame), Err(MalformedFrameError::InvalidDataLength(15)));

        let mut frame = [0u8; FRAME_SIZE];
        frame[0] = 0x92;
        assert_eq!(decode(&frame), Err(MalformedFrameError::DataInRemoteFrame(2)));
    }

    #[test]
    fn strict_padding() {
        // Data byte past the declared length
        let mut frame = canctrl_write_frame();
        frame[8] = 0x78;
        assert_eq!(
            decode(&frame),
            Err(MalformedFrameError::NonZeroReservedBits {
                index: 8,
                value: 0x78
            })
        );

        // Unused bits of byte 2 in standard mode
        let mut frame = canctrl_write_frame();
        frame[2] = 0xE3;
        assert_eq!(
            decode(&frame),
            Err(MalformedFrameError::NonZeroReservedBits {
                index: 2,
                value: 0x03
            })
        );

        // Unused bits 4..2 of byte 2 in extended mode
        let mut frame = encode(&FrameContents::with_message(
            CanMessage::extended(0x1FFF_FFFF, &[]).unwrap(),
        ))
        .unwrap()
        .into_bytes();
        frame[2] |= 0x1C;
        assert_eq!(
            decode(&frame),
            Err(MalformedFrameError::NonZeroReservedBits {
                index: 2,
                value: 0x1C
            })
        );

        // Operands on a command which takes none
        let mut frame = [0u8; FRAME_SIZE];
        frame[60] = 0xB0;
        frame[62] = 0x11;
        assert_eq!(
            decode(&frame),
            Err(MalformedFrameError::NonZeroReservedBits {
                index: 62,
                value: 0x11
            })
        );

        // CAN area without the presence bit
        let mut frame = [0u8; FRAME_SIZE];
        frame[1] = 0x01;
        assert_eq!(
            decode(&frame),
            Err(MalformedFrameError::NonZeroReservedBits {
                index: 1,
                value: 0x01
            })
        );

        // Trailer bytes outside the known fields
        let mut frame = [0u8; FRAME_SIZE];
        frame[63] = 0xFF;
        assert_eq!(
            decode(&frame),
            Err(MalformedFrameError::NonZeroReservedBits {
                index: 63,
                value: 0xFF
            })
        );
    }

    #[test]
    fn lenient_padding() {
        let codec = FrameCodec::new().with_strict_padding(false);

        assert!(!codec.is_strict_padding());

        let mut frame = canctrl_write_frame();
        frame[2] = 0xE3;
        frame[8] = 0x78;
        frame[63] = 0xFF;

        assert_eq!(codec.decode(&frame), Ok(canctrl_write_contents()));

        let mut frame = [0u8; FRAME_SIZE];
        frame[60] = 0xB0;
        frame[62] = 0x11;

        assert_eq!(
            codec.decode(&frame),
            Ok(FrameContents::with_command(SpiCommand::ReadStatus))
        );

        // Field validation still applies
        let mut frame = [0u8; FRAME_SIZE];
        frame[60] = 0x01;

        assert_eq!(codec.decode(&frame), Err(MalformedFrameError::UnknownOpcode(0x01)));
    }

    #[test]
    fn operating_mode_of_contents() {
        let contents = FrameContents::default().with_control_mode(0x60);

        assert_eq!(contents.operating_mode(), Some(OperatingMode::ListenOnly));
        assert_eq!(FrameContents::default().operating_mode(), Some(OperatingMode::Normal));
    }
}

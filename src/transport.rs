use crate::{
    command::{register, OperatingMode, SpiCommand},
    frame::{CanMessage, FrameCodec, FrameContents, MalformedFrameError, ValidationError},
    FRAME_SIZE,
};

/// Blocking byte-stream handle to the USB bridge (usually the opened character
/// device). Opening, configuring and closing the handle is up to the caller.
pub trait Transport {
    type Error: core::fmt::Debug;

    /// Writes `frame` and returns the number of bytes accepted
    fn write(&mut self, frame: &[u8]) -> Result<usize, Self::Error>;

    /// Reads up to `buffer.len()` bytes and returns how many were read
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn write(&mut self, frame: &[u8]) -> Result<usize, Self::Error> {
        (**self).write(frame)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buffer)
    }
}

/// Errors which can arise while exchanging frames with the device
#[derive(Debug, thiserror::Error)]
pub enum TransactionError<E: core::fmt::Debug> {
    #[error("Transport failure: {0:?}")]
    Io(E),
    #[error("Device accepted ({0:?}) of the 64 frame bytes")]
    IncompleteWrite(usize),
    #[error("Device answered with an unexpected SPI command ({0:?})")]
    UnexpectedResponse(Option<SpiCommand>),

    #[error("Failed to encode frame contents")]
    Validation(#[from] ValidationError),
    #[error("Failed to decode device response")]
    Malformed(#[from] MalformedFrameError),
}

/// Runs request/response transactions against the bridge, one frame each way.
///
/// Taking `&mut self` on every call keeps at most one transaction outstanding
/// per handle, as the bridge protocol has no pipelining.
#[derive(Debug)]
pub struct Device<T> {
    transport: T,
    codec: FrameCodec,
}

impl<T: Transport> Device<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            codec: FrameCodec::new(),
        }
    }

    /// Consumes self and returns a new self decoding with the supplied codec
    pub fn with_codec(mut self, codec: FrameCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn codec(&self) -> &FrameCodec {
        &self.codec
    }

    /// Releases the underlying transport
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Encodes and writes a single frame
    pub fn send(&mut self, contents: &FrameContents) -> Result<(), TransactionError<T::Error>> {
        let frame = self.codec.encode(contents)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("Writing frame {}", frame);

        let written = self
            .transport
            .write(frame.as_bytes())
            .map_err(TransactionError::Io)?;

        if written != FRAME_SIZE {
            #[cfg(feature = "defmt")]
            defmt::warn!("Short write: {} of {} bytes", written, FRAME_SIZE);

            return Err(TransactionError::IncompleteWrite(written));
        }

        Ok(())
    }

    /// Reads and decodes a single frame
    pub fn receive(&mut self) -> Result<FrameContents, TransactionError<T::Error>> {
        let mut buffer = [0u8; FRAME_SIZE];

        let read = self
            .transport
            .read(&mut buffer)
            .map_err(TransactionError::Io)?;

        // Counts beyond the buffer cannot be sliced
        if read > FRAME_SIZE {
            return Err(MalformedFrameError::InvalidLength(read).into());
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("Read {} bytes: {}", read, &buffer[..read]);

        let contents = self.codec.decode(&buffer[..read])?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Decoded response {}", contents);

        Ok(contents)
    }

    /// Sends `contents` and waits for the device's response frame
    pub fn transact(
        &mut self,
        contents: &FrameContents,
    ) -> Result<FrameContents, TransactionError<T::Error>> {
        self.send(contents)?;
        self.receive()
    }

    /// Queues a single CAN message for transmission
    pub fn transmit(&mut self, message: CanMessage) -> Result<(), TransactionError<T::Error>> {
        self.send(&FrameContents::with_message(message))
    }

    pub fn reset(&mut self) -> Result<(), TransactionError<T::Error>> {
        self.send(&FrameContents::with_command(SpiCommand::Reset))
    }

    pub fn write_register(
        &mut self,
        register: u8,
        value: u8,
    ) -> Result<(), TransactionError<T::Error>> {
        self.send(&FrameContents::with_command(SpiCommand::write(
            register, value,
        )))
    }

    /// Reads a controller register. The response must echo the read command
    /// for the same register.
    pub fn read_register(&mut self, register: u8) -> Result<u8, TransactionError<T::Error>> {
        let response = self.transact(&FrameContents::with_command(SpiCommand::read(register)))?;

        match response.spi_command {
            Some(SpiCommand::ReadRegister {
                register: echoed,
                data,
            }) if echoed == register => Ok(data),
            other => Err(TransactionError::UnexpectedResponse(other)),
        }
    }

    /// Requests an operating mode by writing `CANCTRL`, mirroring the value in
    /// the frame's control byte.
    pub fn set_operating_mode(
        &mut self,
        mode: OperatingMode,
    ) -> Result<(), TransactionError<T::Error>> {
        let value: u8 = mode.into();

        self.send(
            &FrameContents::with_command(SpiCommand::write(register::CANCTRL, value))
                .with_control_mode(value),
        )
    }
}

/// Adapts any blocking `std::io` handle, such as an opened `/dev/nr_driver0`
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoTransport<T>(pub T);

#[cfg(feature = "std")]
impl<T: std::io::Read + std::io::Write> Transport for IoTransport<T> {
    type Error = std::io::Error;

    fn write(&mut self, frame: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write(&mut self.0, frame)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(&mut self.0, buffer)
    }
}

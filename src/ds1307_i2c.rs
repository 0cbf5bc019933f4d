//! Bus access for the DS1307.
//!
//! The driver only ever talks to the chip through [`I2cBusDs1307`]. Two bindings
//! are provided for embedded-hal 1.0 I2C peripherals, one async and one blocking.

use embedded_hal_1::i2c::I2c as BlockingI2c;
use embedded_hal_async::i2c::I2c as AsyncI2c;

/// Custom I2c Trait that _only_ supports the bus operations the DS1307 needs.
/// Implementors own (or borrow) the bus for the duration of each call; sharing
/// the bus between devices is up to the implementor.
pub trait I2cBusDs1307 {
    /// Error reported by the underlying bus.
    type Error;

    /// Sends `write` to the device at `address` in one transaction.
    /// For register writes the first byte is the register pointer.
    async fn send(&mut self, address: u8, write: &[u8]) -> Result<(), Self::Error>;

    /// Reads `read.len()` bytes from the device at `address`, starting at the
    /// current register pointer.
    async fn receive(&mut self, address: u8, read: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: I2cBusDs1307> I2cBusDs1307 for &mut T {
    type Error = T::Error;

    async fn send(&mut self, address: u8, write: &[u8]) -> Result<(), Self::Error> {
        (**self).send(address, write).await
    }

    async fn receive(&mut self, address: u8, read: &mut [u8]) -> Result<(), Self::Error> {
        (**self).receive(address, read).await
    }
}

/// Binds any async embedded-hal I2C peripheral (or shared bus device) to the driver.
pub struct I2cDs1307<I2C> {
    i2c: I2C,
}

impl<I2C> I2cDs1307<I2C>
where
    I2C: AsyncI2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> I2cBusDs1307 for I2cDs1307<I2C>
where
    I2C: AsyncI2c,
{
    type Error = I2C::Error;

    async fn send(&mut self, address: u8, write: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, write).await
    }

    async fn receive(&mut self, address: u8, read: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.read(address, read).await
    }
}

/// Binds a blocking embedded-hal I2C peripheral to the driver.
/// The futures it returns complete on first poll, so any `block_on` will do.
pub struct BlockingI2cDs1307<I2C> {
    i2c: I2C,
}

impl<I2C> BlockingI2cDs1307<I2C>
where
    I2C: BlockingI2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> I2cBusDs1307 for BlockingI2cDs1307<I2C>
where
    I2C: BlockingI2c,
{
    type Error = I2C::Error;

    async fn send(&mut self, address: u8, write: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, write)
    }

    async fn receive(&mut self, address: u8, read: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.read(address, read)
    }
}

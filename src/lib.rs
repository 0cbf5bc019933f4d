//! Async driver for the DS1307 I2C real-time clock.
//!
//! The chip keeps time, date and 56 bytes of battery backed RAM. The driver
//! converts between the chip's BCD registers and plain binary values, and talks
//! to the chip only through [`I2cBusDs1307`], so it works with any bus binding.
//!
//! ```ignore
//! use ds1307::{BlockingI2cDs1307, Ds1307, SquareWave, Time, TimeFormat};
//!
//! let mut rtc = Ds1307::new(BlockingI2cDs1307::new(i2c));
//! if block_on(rtc.init())? {
//!     // oscillator was stopped, the time on the chip is stale
//!     block_on(rtc.set_time(&Time::new(8, 0, 0, TimeFormat::Hour24)))?;
//! }
//! block_on(rtc.set_square_wave(SquareWave::Freq1Hz))?;
//! let now = block_on(rtc.get_time())?;
//! ```

#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

mod ds1307;
mod ds1307_i2c;

pub use crate::ds1307::{
    bcd_to_u8, u8_to_bcd, Date, Ds1307, SquareWave, Time, TimeFormat, Weekday, DS1307_ADDRESS,
    RAM_END, RAM_START,
};
pub use crate::ds1307_i2c::{BlockingI2cDs1307, I2cBusDs1307, I2cDs1307};

//! ds1307 RTC implementation
//! Registers on the chip are BCD coded, everything handed to or returned from
//! the driver is plain binary.
//!

use core::fmt;

use log::{debug, info, trace};

use crate::ds1307_i2c::I2cBusDs1307;

/// 7 bit bus address of the DS1307. Fixed in silicon.
pub const DS1307_ADDRESS: u8 = 0x68;

/// First battery backed general purpose register.
pub const RAM_START: u8 = 0x08;
/// Last battery backed general purpose register.
pub const RAM_END: u8 = 0x3F;

// Register addresses
const ADDR_SECONDS: u8 = 0x00;
#[allow(dead_code)]
const ADDR_MINUTES: u8 = 0x01;
const ADDR_HOURS: u8 = 0x02;
const ADDR_DAY: u8 = 0x03;
#[allow(dead_code)]
const ADDR_DATE: u8 = 0x04;
#[allow(dead_code)]
const ADDR_MONTH: u8 = 0x05;
const ADDR_YEAR: u8 = 0x06;
const ADDR_CONTROL: u8 = 0x07;

const CLOCK_HALT: u8 = 1 << 7; // seconds register
const HOUR12: u8 = 1 << 6; // hours register, set = 12 h system
const PM: u8 = 1 << 5; // hours register, only in 12 h system

const NUM_TIME_REGISTERS: usize = (ADDR_HOURS - ADDR_SECONDS + 1) as usize;
const NUM_DATE_REGISTERS: usize = (ADDR_YEAR - ADDR_DAY + 1) as usize;
// Largest register write plus the register pointer byte.
const MAX_WRITE: usize = NUM_DATE_REGISTERS + 1;

/// How the hours register is to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeFormat {
    Hour24,
    Hour12Am,
    Hour12Pm,
}

impl TimeFormat {
    /// Format flagged by the 12/24 and AM/PM bits of a raw hours register.
    pub fn from_hours_register(hours: u8) -> Self {
        if hours & HOUR12 == 0 {
            TimeFormat::Hour24
        } else if hours & PM > 0 {
            TimeFormat::Hour12Pm
        } else {
            TimeFormat::Hour12Am
        }
    }

    /// Raw hours register for `hours` in this format.
    /// In 24 h mode bit 5 belongs to the tens digit and is left alone.
    pub fn encode_hours(self, hours: u8) -> u8 {
        let bcd = u8_to_bcd(hours);
        match self {
            TimeFormat::Hour24 => bcd & !HOUR12,
            TimeFormat::Hour12Am => (bcd | HOUR12) & !PM,
            TimeFormat::Hour12Pm => bcd | HOUR12 | PM,
        }
    }

    /// Hours value of a raw hours register read in this format.
    pub fn decode_hours(self, hours: u8) -> u8 {
        match self {
            TimeFormat::Hour24 => bcd_to_u8(hours & 0x3F),
            TimeFormat::Hour12Am | TimeFormat::Hour12Pm => bcd_to_u8(hours & 0x1F),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Time {
    pub seconds: u8,
    pub minutes: u8,
    /// 0-23 for [`TimeFormat::Hour24`], 1-12 otherwise.
    pub hours: u8,
    pub format: TimeFormat,
}

impl Time {
    pub fn new(hours: u8, minutes: u8, seconds: u8, format: TimeFormat) -> Self {
        Time {
            seconds,
            minutes,
            hours,
            format,
        }
    }

    /// Seconds, minutes and hours registers. Never sets the clock halt bit.
    pub fn to_registers(&self) -> [u8; NUM_TIME_REGISTERS] {
        [
            u8_to_bcd(self.seconds) & !CLOCK_HALT,
            u8_to_bcd(self.minutes),
            self.format.encode_hours(self.hours),
        ]
    }

    /// Decodes the seconds, minutes and hours registers, ignoring the clock halt bit.
    pub fn from_registers(regs: [u8; NUM_TIME_REGISTERS]) -> Self {
        let format = TimeFormat::from_hours_register(regs[2]);
        Time {
            seconds: bcd_to_u8(regs[0] & !CLOCK_HALT),
            minutes: bcd_to_u8(regs[1]),
            hours: format.decode_hours(regs[2]),
            format,
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)?;
        match self.format {
            TimeFormat::Hour24 => Ok(()),
            TimeFormat::Hour12Am => f.write_str(" AM"),
            TimeFormat::Hour12Pm => f.write_str(" PM"),
        }
    }
}

/// Calendar registers as stored on the chip. Nothing is range checked and
/// there is no century, `year` is the two digit year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Date {
    /// Day of week, 1 = Sunday .. 7 = Saturday
    pub day: u8,
    /// Day of month
    pub date: u8,
    pub month: u8,
    pub year: u8,
}

impl Date {
    pub fn new(day: u8, date: u8, month: u8, year: u8) -> Self {
        Date {
            day,
            date,
            month,
            year,
        }
    }

    /// `None` if the day register holds something outside 1-7.
    pub fn weekday(&self) -> Option<Weekday> {
        Weekday::try_from(self.day).ok()
    }

    pub fn to_registers(&self) -> [u8; NUM_DATE_REGISTERS] {
        [
            u8_to_bcd(self.day),
            u8_to_bcd(self.date),
            u8_to_bcd(self.month),
            u8_to_bcd(self.year),
        ]
    }

    pub fn from_registers(regs: [u8; NUM_DATE_REGISTERS]) -> Self {
        Date {
            day: bcd_to_u8(regs[0]),
            date: bcd_to_u8(regs[1]),
            month: bcd_to_u8(regs[2]),
            year: bcd_to_u8(regs[3]),
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}.{:02}", self.date, self.month, self.year)
    }
}

/// Day of week as counted by the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Weekday {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl TryFrom<u8> for Weekday {
    type Error = u8;

    fn try_from(day: u8) -> Result<Self, Self::Error> {
        match day {
            1 => Ok(Weekday::Sunday),
            2 => Ok(Weekday::Monday),
            3 => Ok(Weekday::Tuesday),
            4 => Ok(Weekday::Wednesday),
            5 => Ok(Weekday::Thursday),
            6 => Ok(Weekday::Friday),
            7 => Ok(Weekday::Saturday),
            other => Err(other),
        }
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> u8 {
        day as u8
    }
}

/// What the SQW/OUT pin does. The value is the whole control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SquareWave {
    /// Output driven low
    Low = 0x00,
    Freq1Hz = 0x10,
    /// 4.096 kHz
    Freq4kHz = 0x11,
    /// 8.192 kHz
    Freq8kHz = 0x12,
    /// 32.768 kHz
    Freq32kHz = 0x13,
    /// Output driven high
    High = 0x80,
}

impl SquareWave {
    pub fn control_register(self) -> u8 {
        self as u8
    }
}

pub struct Ds1307<I2C> {
    i2c: I2C,
}

impl<I2C> Ds1307<I2C>
where
    I2C: I2cBusDs1307,
{
    pub fn new(i2c: I2C) -> Self {
        Ds1307 { i2c }
    }

    /// Gives the bus binding back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Restarts the oscillator if the clock halt bit is set.
    /// Restarting also zeroes the seconds. Returns `true` if the clock was
    /// halted, i.e. the time on the chip can not be trusted and should be set.
    pub async fn init(&mut self) -> Result<bool, I2C::Error> {
        let mut seconds = [0u8];
        self.read_registers(ADDR_SECONDS, &mut seconds).await?;

        let halted = seconds[0] & CLOCK_HALT > 0;
        if halted {
            info!("DS1307 clock halted, restarting oscillator");
            self.write_registers(ADDR_SECONDS, [0x00]).await?;
        }
        Ok(halted)
    }

    pub async fn set_time(&mut self, time: &Time) -> Result<(), I2C::Error> {
        self.write_registers(ADDR_SECONDS, time.to_registers()).await
    }

    pub async fn get_time(&mut self) -> Result<Time, I2C::Error> {
        let mut data = [0u8; NUM_TIME_REGISTERS];
        self.read_registers(ADDR_SECONDS, &mut data).await?;
        let time = Time::from_registers(data);
        debug!("DS1307 time {:?}", time);
        Ok(time)
    }

    pub async fn set_date(&mut self, date: &Date) -> Result<(), I2C::Error> {
        self.write_registers(ADDR_DAY, date.to_registers()).await
    }

    pub async fn get_date(&mut self) -> Result<Date, I2C::Error> {
        let mut data = [0u8; NUM_DATE_REGISTERS];
        self.read_registers(ADDR_DAY, &mut data).await?;
        let date = Date::from_registers(data);
        debug!("DS1307 date {:?}", date);
        Ok(date)
    }

    pub async fn set_square_wave(&mut self, mode: SquareWave) -> Result<(), I2C::Error> {
        self.write_registers(ADDR_CONTROL, [mode.control_register()]).await
    }

    /// Reads `data.len()` general purpose registers starting at `addr`.
    /// The address is not checked against [`RAM_START`]..=[`RAM_END`].
    pub async fn ram_read(&mut self, addr: u8, data: &mut [u8]) -> Result<(), I2C::Error> {
        self.read_registers(addr, data).await
    }

    /// Sets the register pointer to `addr`, then sends `data` as a second,
    /// separate transaction.
    ///
    /// The two sends are not atomic. If the second one fails the pointer has
    /// moved but nothing was written. The chip also treats the first byte of
    /// every write transaction as a register pointer, so the first byte of
    /// `data` selects where the remaining bytes land.
    pub async fn ram_write(&mut self, addr: u8, data: &[u8]) -> Result<(), I2C::Error> {
        trace!("DS1307 ram write {:#04x} len {}", addr, data.len());
        self.i2c.send(DS1307_ADDRESS, &[addr]).await?;
        self.i2c.send(DS1307_ADDRESS, data).await
    }

    /// One transaction: register pointer followed by `values`.
    async fn write_registers<const N: usize>(
        &mut self,
        reg: u8,
        values: [u8; N],
    ) -> Result<(), I2C::Error> {
        const { assert!(N < MAX_WRITE) };
        let mut write = [0u8; MAX_WRITE];
        write[0] = reg;
        write[1..=N].copy_from_slice(&values);
        trace!("DS1307 write {:#04x} {:02x?}", reg, values);
        self.i2c.send(DS1307_ADDRESS, &write[..=N]).await
    }

    /// Register pointer write, then a read of `data.len()` bytes.
    async fn read_registers(&mut self, reg: u8, data: &mut [u8]) -> Result<(), I2C::Error> {
        self.i2c.send(DS1307_ADDRESS, &[reg]).await?;
        self.i2c.receive(DS1307_ADDRESS, data).await?;
        trace!("DS1307 read {:#04x} {:02x?}", reg, data);
        Ok(())
    }
}

pub fn bcd_to_u8(bcd: u8) -> u8 {
    ((bcd & 0xF0) >> 4) * 10 + (bcd & 0x0F)
}

/// Only meaningful for 0-99, larger values give a garbage byte.
pub fn u8_to_bcd(val: u8) -> u8 {
    let tio = val / 10;
    (tio << 4) | (val % 10)
}

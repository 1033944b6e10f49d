//! A platform-agnostic driver for the DS3231 precision real-time
//! clock, built on the `embedded-hal` I2C traits.
//!
//! The DS3231 keeps time, two alarms and a die temperature in 19
//! battery-backed registers behind a fixed I2C address. This driver
//! owns no state of its own: every operation is one or two bus
//! transactions against those registers, and all encode/decode logic
//! (BCD packing, 12/24-hour handling, alarm match masks) lives in the
//! conversion modules.
//!
//! # Features
//!
//! - Date/time access as chrono `NaiveDateTime` (timezone and DST
//!   handling stay with the caller)
//! - Both alarms written in a single bus transaction, with type-safe
//!   match granularities
//! - Generic read-modify-write access to any register, plus thin
//!   wrappers for the oscillator, 32kHz output, square wave output
//!   and alarm interrupts
//! - Temperature as integer, integer+hundredths, or `f32` (with the
//!   `temperature_f32` feature)
//! - Optional `async` support via `embedded-hal-async` (see
//!   [`asynch`])
//!
//! # Example
//!
//! ```rust,ignore
//! use ds3231_rtc::{Alarm1Config, DS3231, DEFAULT_ADDRESS};
//!
//! let mut rtc = DS3231::new(i2c, DEFAULT_ADDRESS);
//! rtc.set_datetime(&datetime)?;
//! rtc.set_alarms(
//!     Some(&Alarm1Config::AtTime { hours: 6, minutes: 30, seconds: 0 }),
//!     None,
//! )?;
//! rtc.enable_alarm_interrupts(AlarmSelect::Alarm1)?;
//! ```
//!
//! # Concurrency
//!
//! The driver is fully synchronous and keeps no cache: register state
//! lives on the chip. The read-modify-write helpers are not atomic;
//! callers sharing the bus across threads must serialize access
//! externally.

#![no_std]

#[macro_use]
mod macros;

pub mod alarm;
mod bcd;
mod datetime;
mod registers;

#[cfg(feature = "async")]
pub mod asynch;

use chrono::NaiveDateTime;
use embedded_hal::i2c::I2c;
use paste::paste;

pub use crate::alarm::{Alarm1Config, Alarm2Config, AlarmError};
use crate::datetime::DS3231DateTime;
pub use crate::datetime::DS3231DateTimeError;
pub use crate::registers::{
    AgingOffset, Control, Hours, InterruptControl, Month, Oscillator, RegAddr,
    SquareWaveFrequency, Status, Temperature, TemperatureFraction, TimeRepresentation,
};

/// Factory-fixed 7-bit I2C address of the DS3231.
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Device configuration applied by [`DS3231::configure`].
pub struct Config {
    /// Square wave output frequency (RS2:RS1)
    pub square_wave_frequency: SquareWaveFrequency,
    /// INT/SQW pin function (square wave or alarm interrupt)
    pub interrupt_control: InterruptControl,
    /// Keep the square wave running on battery power
    pub battery_backed_square_wave: bool,
    /// Oscillator behavior on battery power
    pub oscillator_enable: Oscillator,
}

/// How [`DS3231::update_register`] combines the given bits with the
/// current register value.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterOp {
    /// OR the bits into the register
    Set,
    /// AND-NOT the bits out of the register
    Clear,
    /// Overwrite the register with the bits
    Replace,
}

/// Selects alarm 1, alarm 2 or both for flag and interrupt
/// operations.
///
/// The discriminants line up with the A1F/A2F status bits and the
/// A1IE/A2IE control bits, which share bit positions 0 and 1.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmSelect {
    /// Alarm 1 only
    Alarm1 = 0b01,
    /// Alarm 2 only
    Alarm2 = 0b10,
    /// Both alarms
    Both = 0b11,
}

impl AlarmSelect {
    fn mask(self) -> u8 {
        self as u8
    }
}

/// Errors returned by the driver.
#[derive(Debug)]
pub enum DS3231Error<I2CE> {
    /// The underlying bus transaction failed
    I2c(I2CE),
    /// Date/time conversion failed
    DateTime(DS3231DateTimeError),
    /// Alarm configuration was invalid
    Alarm(AlarmError),
}

impl<I2CE> From<I2CE> for DS3231Error<I2CE> {
    fn from(e: I2CE) -> Self {
        DS3231Error::I2c(e)
    }
}

/// DS3231 Real-Time Clock driver.
pub struct DS3231<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> DS3231<I2C> {
    /// Creates a new driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus implementation
    /// * `address` - The I2C address of the device (typically
    ///   [`DEFAULT_ADDRESS`])
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Configures oscillator, square wave and interrupt behavior in
    /// one read-modify-write of the control register.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub fn configure(&mut self, config: &Config) -> Result<(), DS3231Error<I2C::Error>> {
        let mut control = self.control()?;
        control.set_oscillator_enable(config.oscillator_enable);
        control.set_battery_backed_square_wave(config.battery_backed_square_wave);
        control.set_square_wave_frequency(config.square_wave_frequency);
        control.set_interrupt_control(config.interrupt_control);
        debug!("control: {:?}", control);
        self.set_control(control)?;
        Ok(())
    }

    /// Reads a register and returns `byte & mask`. A mask of `0xFF`
    /// returns the raw byte.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus read fails.
    pub fn read_register(&mut self, reg: RegAddr, mask: u8) -> Result<u8, DS3231Error<I2C::Error>> {
        let mut data = [0];
        self.i2c
            .write_read(self.address, &[reg as u8], &mut data)?;
        Ok(data[0] & mask)
    }

    /// Read-modify-writes a register: reads the current byte, applies
    /// `bits` according to `op` and writes the result back.
    ///
    /// The two phases are separate bus transactions; the operation is
    /// not atomic with respect to other bus masters.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub fn update_register(
        &mut self,
        reg: RegAddr,
        bits: u8,
        op: RegisterOp,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let current = self.read_register(reg, 0xFF)?;
        let value = match op {
            RegisterOp::Set => current | bits,
            RegisterOp::Clear => current & !bits,
            RegisterOp::Replace => bits,
        };
        self.i2c.write(self.address, &[reg as u8, value])?;
        Ok(())
    }

    /// Gets the current date and time.
    ///
    /// Reads the 7 date/time registers in one transaction. Both
    /// 12-hour and 24-hour register layouts decode correctly.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus read fails or the registers hold
    /// an invalid date/time.
    pub fn datetime(&mut self) -> Result<NaiveDateTime, DS3231Error<I2C::Error>> {
        let mut data = [0; 7];
        self.i2c
            .write_read(self.address, &[RegAddr::Seconds as u8], &mut data)?;
        DS3231DateTime::from(data)
            .into_datetime()
            .map_err(DS3231Error::DateTime)
    }

    /// Sets the date and time, always in 24-hour representation.
    ///
    /// All 7 registers are written in a single transaction so the
    /// chip's countdown chain resets consistently.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is outside 2000-2099 or the bus
    /// write fails.
    pub fn set_datetime(&mut self, datetime: &NaiveDateTime) -> Result<(), DS3231Error<I2C::Error>> {
        let raw = DS3231DateTime::from_datetime(datetime).map_err(DS3231Error::DateTime)?;
        let data: [u8; 7] = (&raw).into();
        self.i2c.write(
            self.address,
            &[
                RegAddr::Seconds as u8,
                data[0],
                data[1],
                data[2],
                data[3],
                data[4],
                data[5],
                data[6],
            ],
        )?;
        Ok(())
    }

    /// Writes one or both alarm configurations in a single bus
    /// transaction.
    ///
    /// The chip auto-increments its register pointer within a write,
    /// so the alarm 1 and alarm 2 blocks are packed contiguously:
    /// alarm 1 alone writes 4 register bytes starting at 0x07, alarm
    /// 2 alone writes 3 bytes starting at 0x0B, and both write all 7.
    /// An alarm passed as `None` keeps its current register contents.
    /// Passing `None` for both performs no bus traffic.
    ///
    /// Alarm interrupts are not touched; see
    /// [`enable_alarm_interrupts`](Self::enable_alarm_interrupts).
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration fails validation or the
    /// bus write fails.
    pub fn set_alarms(
        &mut self,
        alarm1: Option<&Alarm1Config>,
        alarm2: Option<&Alarm2Config>,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let mut data = [0u8; 8];
        let mut len = 1;
        data[0] = if alarm1.is_none() {
            RegAddr::Alarm2Minutes
        } else {
            RegAddr::Alarm1Seconds
        } as u8;
        if let Some(config) = alarm1 {
            let bytes = config.encode().map_err(DS3231Error::Alarm)?;
            data[len..len + 4].copy_from_slice(&bytes);
            len += 4;
        }
        if let Some(config) = alarm2 {
            let bytes = config.encode().map_err(DS3231Error::Alarm)?;
            data[len..len + 3].copy_from_slice(&bytes);
            len += 3;
        }
        if len == 1 {
            return Ok(());
        }
        self.i2c.write(self.address, &data[..len])?;
        Ok(())
    }

    /// Reads the status register masked to the two alarm-fired flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus read fails.
    pub fn alarm_flags(&mut self) -> Result<Status, DS3231Error<I2C::Error>> {
        let bits =
            self.read_register(RegAddr::ControlStatus, Status::ALARM1_FLAG | Status::ALARM2_FLAG)?;
        Ok(Status(bits))
    }

    /// Clears the fired flag of the selected alarm(s). A fired flag
    /// must be cleared before the alarm can interrupt again.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub fn clear_alarm_flags(&mut self, select: AlarmSelect) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(RegAddr::ControlStatus, select.mask(), RegisterOp::Clear)
    }

    /// Enables interrupt output for the selected alarm(s).
    ///
    /// Sets INTCN along with the selected A1IE/A2IE bits, which
    /// routes alarm interrupts to the INT/SQW pin instead of the
    /// square wave. Clear any stale fired flags first or the
    /// interrupt asserts immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub fn enable_alarm_interrupts(
        &mut self,
        select: AlarmSelect,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::Control,
            Control::INTERRUPT_CONTROL | select.mask(),
            RegisterOp::Set,
        )
    }

    /// Disables interrupt output for the selected alarm(s).
    ///
    /// Clears only the selected A1IE/A2IE bits; INTCN is left alone
    /// so this does not re-enable the square wave output.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub fn disable_alarm_interrupts(
        &mut self,
        select: AlarmSelect,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(RegAddr::Control, select.mask(), RegisterOp::Clear)
    }

    /// Enables the 32kHz output pin.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub fn enable_32khz_output(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::ControlStatus,
            Status::ENABLE_32KHZ_OUTPUT,
            RegisterOp::Set,
        )
    }

    /// Disables the 32kHz output pin.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub fn disable_32khz_output(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::ControlStatus,
            Status::ENABLE_32KHZ_OUTPUT,
            RegisterOp::Clear,
        )
    }

    /// Enables the square wave output by clearing INTCN.
    ///
    /// The hardware routes the INT/SQW pin to either the square wave
    /// or alarm interrupts, never both; this driver only toggles the
    /// documented bit and does not touch the A1IE/A2IE enables.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub fn enable_square_wave(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::Control,
            Control::INTERRUPT_CONTROL,
            RegisterOp::Clear,
        )
    }

    /// Disables the square wave output by setting INTCN, which hands
    /// the INT/SQW pin back to the alarm interrupts.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub fn disable_square_wave(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::Control,
            Control::INTERRUPT_CONTROL,
            RegisterOp::Set,
        )
    }

    /// Sets the square wave output frequency without enabling the
    /// output.
    ///
    /// Only the RS2:RS1 rate field changes; every other control bit
    /// is preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if any bus transaction fails.
    pub fn set_square_wave_frequency(
        &mut self,
        frequency: SquareWaveFrequency,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let control = self.read_register(RegAddr::Control, 0xFF)?;
        let value = (control & !Control::SQUARE_WAVE_RATE) | frequency.rate_bits();
        self.update_register(RegAddr::Control, value, RegisterOp::Replace)
    }

    /// Lets the oscillator run on battery power (clears EOSC).
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub fn enable_oscillator(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::Control,
            Control::OSCILLATOR_DISABLE,
            RegisterOp::Clear,
        )
    }

    /// Stops the oscillator on battery power (sets EOSC).
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub fn disable_oscillator(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::Control,
            Control::OSCILLATOR_DISABLE,
            RegisterOp::Set,
        )
    }

    /// Checks whether the oscillator has stopped at some point (e.g.
    /// first power-up or battery failure), which means the time is
    /// not trustworthy.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus read fails.
    pub fn oscillator_stop_flag(&mut self) -> Result<bool, DS3231Error<I2C::Error>> {
        let bits = self.read_register(RegAddr::ControlStatus, Status::OSCILLATOR_STOP_FLAG)?;
        Ok(bits != 0)
    }

    /// Clears the oscillator stop flag, typically after setting a
    /// fresh time.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub fn clear_oscillator_stop_flag(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::ControlStatus,
            Status::OSCILLATOR_STOP_FLAG,
            RegisterOp::Clear,
        )
    }

    /// Gets the temperature rounded down to whole degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus read fails.
    pub fn temperature(&mut self) -> Result<i8, DS3231Error<I2C::Error>> {
        let mut data = [0];
        self.i2c
            .write_read(self.address, &[RegAddr::MSBTemp as u8], &mut data)?;
        Ok(Temperature(data[0]).temperature())
    }

    /// Gets the temperature as whole degrees Celsius plus the
    /// fraction in hundredths (0, 25, 50 or 75); the hardware
    /// resolves quarter degrees only.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus read fails.
    pub fn temperature_split(&mut self) -> Result<(i8, u8), DS3231Error<I2C::Error>> {
        let mut data = [0; 2];
        self.i2c
            .write_read(self.address, &[RegAddr::MSBTemp as u8], &mut data)?;
        Ok((
            Temperature(data[0]).temperature(),
            TemperatureFraction(data[1]).hundredths(),
        ))
    }

    /// Gets the temperature in degrees Celsius with quarter-degree
    /// resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus read fails.
    #[cfg(feature = "temperature_f32")]
    pub fn temperature_f32(&mut self) -> Result<f32, DS3231Error<I2C::Error>> {
        let mut data = [0; 2];
        self.i2c
            .write_read(self.address, &[RegAddr::MSBTemp as u8], &mut data)?;
        let integer = Temperature(data[0]).temperature();
        let quarters = TemperatureFraction(data[1]).quarters();
        Ok(f32::from(integer) + f32::from(quarters) * 0.25)
    }
}

// Typed single-register accessors, generated in get/set pairs.
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        impl<I2C: I2c> DS3231<I2C> {
            $(
                paste! {
                    #[doc = concat!("Gets the value of the ", stringify!($name), " register.")]
                    #[doc = "\n\n# Errors"]
                    #[doc = "\nReturns an error if the bus read fails."]
                    pub fn $name(&mut self) -> Result<$typ, DS3231Error<I2C::Error>> {
                        let mut data = [0];
                        self.i2c
                            .write_read(self.address, &[$regaddr as u8], &mut data)?;
                        Ok($typ(data[0]))
                    }

                    #[doc = concat!("Sets the value of the ", stringify!($name), " register.")]
                    #[doc = "\n\n# Errors"]
                    #[doc = "\nReturns an error if the bus write fails."]
                    pub fn [<set_ $name>](&mut self, value: $typ) -> Result<(), DS3231Error<I2C::Error>> {
                        self.i2c.write(
                            self.address,
                            &[$regaddr as u8, value.into()],
                        )?;
                        Ok(())
                    }
                }
            )+
        }
    }
}

impl_register_access!(
    (control, RegAddr::Control, Control),
    (status, RegAddr::ControlStatus, Status),
    (aging_offset, RegAddr::AgingOffset, AgingOffset)
);

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::vec;
    use chrono::{NaiveDate, Timelike};
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const DEVICE_ADDRESS: u8 = 0x68;

    #[test]
    fn configure_applies_control_bits() {
        let config = Config {
            square_wave_frequency: SquareWaveFrequency::Hz1,
            interrupt_control: InterruptControl::Interrupt,
            battery_backed_square_wave: false,
            oscillator_enable: Oscillator::Enabled,
        };
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x18]),
            // rate field overwritten to Hz1, INTCN set
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x04]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        dev.configure(&config).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn reads_datetime() {
        // 2024-03-14 15:30:00, a Thursday
        let registers = [0x00, 0x30, 0x15, 0x05, 0x14, 0x03, 0x24];
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            registers.to_vec(),
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        let dt = dev.datetime().unwrap();
        assert_eq!(
            dt,
            NaiveDate::from_ymd_opt(2024, 3, 14)
                .unwrap()
                .and_hms_opt(15, 30, 0)
                .unwrap()
        );
        dev.i2c.done();
    }

    #[test]
    fn reads_datetime_stored_in_12_hour_mode() {
        // hours register 0x65: 12-hour flag, PM, hour field 5 -> 17:00
        let registers = [0x00, 0x00, 0x65, 0x05, 0x14, 0x03, 0x24];
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            registers.to_vec(),
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        assert_eq!(dev.datetime().unwrap().hour(), 17);
        dev.i2c.done();
    }

    #[test]
    fn writes_datetime_as_one_block() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();
        let mock = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![
                RegAddr::Seconds as u8,
                0x00, // seconds
                0x30, // minutes
                0x15, // hours, 24-hour mode
                0x05, // Thursday, 1-based
                0x14, // date
                0x03, // month
                0x24, // year
            ],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.set_datetime(&dt).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn set_then_get_datetime_roundtrips() {
        let dt = NaiveDate::from_ymd_opt(2025, 8, 7)
            .unwrap()
            .and_hms_opt(23, 59, 58)
            .unwrap();
        // a register store that echoes what was written
        let written = vec![0x58, 0x59, 0x23, 0x05, 0x07, 0x08, 0x25];
        let mut write = vec![RegAddr::Seconds as u8];
        write.extend_from_slice(&written);
        let mock = I2cMock::new(&[
            I2cTrans::write(DEVICE_ADDRESS, write),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Seconds as u8], written),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.set_datetime(&dt).unwrap();
        assert_eq!(dev.datetime().unwrap(), dt);
        dev.i2c.done();
    }

    #[test]
    fn set_alarm1_alone_writes_five_bytes() {
        let config = Alarm1Config::AtMinutesSeconds {
            minutes: 30,
            seconds: 15,
        };
        // start address + 4 alarm 1 fields, day/date left not-set;
        // alarm 2 registers are never touched
        let mock = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![RegAddr::Alarm1Seconds as u8, 0x15, 0x30, 0x80, 0x80],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.set_alarms(Some(&config), None).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn set_alarm2_alone_starts_at_alarm2_base() {
        let config = Alarm2Config::AtTime {
            hours: 18,
            minutes: 45,
        };
        let mock = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![RegAddr::Alarm2Minutes as u8, 0x45, 0x18, 0x80],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.set_alarms(None, Some(&config)).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn set_both_alarms_in_one_transaction() {
        let alarm1 = Alarm1Config::AtTimeOnDay {
            hours: 6,
            minutes: 30,
            seconds: 0,
            day: 2,
        };
        let alarm2 = Alarm2Config::EveryMinute;
        let mock = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![
                RegAddr::Alarm1Seconds as u8,
                0x00,
                0x30,
                0x06,
                0x42, // weekday match, Monday
                0x80,
                0x80,
                0x80,
            ],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.set_alarms(Some(&alarm1), Some(&alarm2)).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn set_no_alarms_performs_no_bus_traffic() {
        let mock = I2cMock::new(&[]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.set_alarms(None, None).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn invalid_alarm_config_fails_before_the_bus() {
        let config = Alarm1Config::AtSeconds { seconds: 60 };
        let mock = I2cMock::new(&[]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        assert!(matches!(
            dev.set_alarms(Some(&config), None),
            Err(DS3231Error::Alarm(AlarmError::InvalidTime(_)))
        ));
        dev.i2c.done();
    }

    #[test]
    fn alarm_flags_are_masked_from_status() {
        // OSF and EN32kHz set alongside A1F; only alarm bits survive
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::ControlStatus as u8],
            vec![0x89],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        let flags = dev.alarm_flags().unwrap();
        assert!(flags.alarm1_flag());
        assert!(!flags.alarm2_flag());
        assert!(!flags.oscillator_stop_flag());
        dev.i2c.done();
    }

    #[test]
    fn clear_alarm_flags_preserves_other_status_bits() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x8B],
            ),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x88]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.clear_alarm_flags(AlarmSelect::Both).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn clear_single_alarm_flag_leaves_the_other() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x03],
            ),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x02]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.clear_alarm_flags(AlarmSelect::Alarm1).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn enable_alarm_interrupts_sets_intcn_and_selected_bits() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x05]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.enable_alarm_interrupts(AlarmSelect::Alarm1).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn disable_alarm_interrupts_keeps_intcn() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x07]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x04]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.disable_alarm_interrupts(AlarmSelect::Both).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn square_wave_enable_disable_toggle_intcn_only() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x1D]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x19]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x19]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x1D]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.enable_square_wave().unwrap();
        dev.disable_square_wave().unwrap();
        dev.i2c.done();
    }

    #[test]
    fn square_wave_frequency_preserves_other_control_bits() {
        // two calls on an initial control byte of 0x00: all non-rate
        // bits stay untouched and the rate field ends up at the
        // second call's value
        let mock = I2cMock::new(&[
            // first call: Hz4096
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x00]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x10]),
            // second call: Hz1024
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x10]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x10]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x08]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.set_square_wave_frequency(SquareWaveFrequency::Hz4096)
            .unwrap();
        dev.set_square_wave_frequency(SquareWaveFrequency::Hz1024)
            .unwrap();
        dev.i2c.done();
    }

    #[test]
    fn square_wave_frequency_on_busy_control_byte() {
        // EOSC, BBSQW and A1IE set; only the rate field may change
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0xC9]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0xC9]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0xD1]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.set_square_wave_frequency(SquareWaveFrequency::Hz4096)
            .unwrap();
        dev.i2c.done();
    }

    #[test]
    fn enable_32khz_output_sets_status_bit() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x00],
            ),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x08]),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x88],
            ),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x80]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.enable_32khz_output().unwrap();
        dev.disable_32khz_output().unwrap();
        dev.i2c.done();
    }

    #[test]
    fn oscillator_enable_disable() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x80]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x00]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x80]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.enable_oscillator().unwrap();
        dev.disable_oscillator().unwrap();
        dev.i2c.done();
    }

    #[test]
    fn oscillator_stop_flag_reads_and_clears() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x88],
            ),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x88],
            ),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x08]),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x08],
            ),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        assert!(dev.oscillator_stop_flag().unwrap());
        dev.clear_oscillator_stop_flag().unwrap();
        assert!(!dev.oscillator_stop_flag().unwrap());
        dev.i2c.done();
    }

    #[test]
    fn read_register_applies_mask() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x8F],
            ),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x8F],
            ),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        // mask 0xFF returns the raw byte
        assert_eq!(dev.read_register(RegAddr::ControlStatus, 0xFF).unwrap(), 0x8F);
        // a narrower mask zeroes unselected bit positions
        assert_eq!(dev.read_register(RegAddr::ControlStatus, 0x03).unwrap(), 0x03);
        dev.i2c.done();
    }

    #[test]
    fn update_register_set_clear_replace() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x40]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x44]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x44]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x40]),
            // replace still performs the read phase first
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x40]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x1C]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.update_register(RegAddr::Control, 0x04, RegisterOp::Set)
            .unwrap();
        dev.update_register(RegAddr::Control, 0x04, RegisterOp::Clear)
            .unwrap();
        dev.update_register(RegAddr::Control, 0x1C, RegisterOp::Replace)
            .unwrap();
        dev.i2c.done();
    }

    #[test]
    fn reads_temperature_views() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::MSBTemp as u8], vec![0x19]),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::MSBTemp as u8],
                vec![0x19, 0x40],
            ),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::MSBTemp as u8],
                vec![0xF6, 0xC0],
            ),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        assert_eq!(dev.temperature().unwrap(), 25);
        assert_eq!(dev.temperature_split().unwrap(), (25, 25));
        assert_eq!(dev.temperature_split().unwrap(), (-10, 75));
        dev.i2c.done();
    }

    #[cfg(feature = "temperature_f32")]
    #[test]
    fn reads_temperature_as_f32() {
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::MSBTemp as u8],
            vec![0x19, 0x80],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        let temp = dev.temperature_f32().unwrap();
        assert!((temp - 25.5).abs() < f32::EPSILON);
        dev.i2c.done();
    }

    #[test]
    fn typed_register_accessors() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x1C]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x00]),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x80],
            ),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::AgingOffset as u8], vec![0xF6]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        let control = dev.control().unwrap();
        assert_eq!(control.square_wave_frequency(), SquareWaveFrequency::Hz8192);
        dev.set_control(Control(0x00)).unwrap();

        let status = dev.status().unwrap();
        assert!(status.oscillator_stop_flag());

        assert_eq!(dev.aging_offset().unwrap().aging_offset(), -10);
        dev.i2c.done();
    }
}

//! Async implementation of the DS3231 driver.
//!
//! Mirrors the blocking driver in the crate root over
//! `embedded-hal-async` I2C traits. Only available when the `async`
//! feature is enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use ds3231_rtc::asynch::DS3231;
//!
//! let mut rtc = DS3231::new(i2c, ds3231_rtc::DEFAULT_ADDRESS);
//! rtc.configure(&config).await?;
//! let datetime = rtc.datetime().await?;
//! ```

use chrono::NaiveDateTime;
use embedded_hal_async::i2c::I2c;
use paste::paste;

use crate::datetime::DS3231DateTime;
use crate::{
    AgingOffset, Alarm1Config, Alarm2Config, AlarmSelect, Config, Control, DS3231Error, RegAddr,
    RegisterOp, SquareWaveFrequency, Status, Temperature, TemperatureFraction,
};

/// DS3231 Real-Time Clock async driver.
pub struct DS3231<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> DS3231<I2C> {
    /// Creates a new async driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The async I2C bus implementation
    /// * `address` - The I2C address of the device (typically
    ///   [`crate::DEFAULT_ADDRESS`])
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Configures oscillator, square wave and interrupt behavior in
    /// one read-modify-write of the control register.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub async fn configure(&mut self, config: &Config) -> Result<(), DS3231Error<I2C::Error>> {
        let mut control = self.control().await?;
        control.set_oscillator_enable(config.oscillator_enable);
        control.set_battery_backed_square_wave(config.battery_backed_square_wave);
        control.set_square_wave_frequency(config.square_wave_frequency);
        control.set_interrupt_control(config.interrupt_control);
        debug!("control: {:?}", control);
        self.set_control(control).await?;
        Ok(())
    }

    /// Reads a register and returns `byte & mask`. A mask of `0xFF`
    /// returns the raw byte.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus read fails.
    pub async fn read_register(
        &mut self,
        reg: RegAddr,
        mask: u8,
    ) -> Result<u8, DS3231Error<I2C::Error>> {
        let mut data = [0];
        self.i2c
            .write_read(self.address, &[reg as u8], &mut data)
            .await?;
        Ok(data[0] & mask)
    }

    /// Read-modify-writes a register: reads the current byte, applies
    /// `bits` according to `op` and writes the result back.
    ///
    /// Not atomic with respect to other bus masters.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub async fn update_register(
        &mut self,
        reg: RegAddr,
        bits: u8,
        op: RegisterOp,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let current = self.read_register(reg, 0xFF).await?;
        let value = match op {
            RegisterOp::Set => current | bits,
            RegisterOp::Clear => current & !bits,
            RegisterOp::Replace => bits,
        };
        self.i2c.write(self.address, &[reg as u8, value]).await?;
        Ok(())
    }

    /// Gets the current date and time.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus read fails or the registers hold
    /// an invalid date/time.
    pub async fn datetime(&mut self) -> Result<NaiveDateTime, DS3231Error<I2C::Error>> {
        let mut data = [0; 7];
        self.i2c
            .write_read(self.address, &[RegAddr::Seconds as u8], &mut data)
            .await?;
        DS3231DateTime::from(data)
            .into_datetime()
            .map_err(DS3231Error::DateTime)
    }

    /// Sets the date and time, always in 24-hour representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is outside 2000-2099 or the bus
    /// write fails.
    pub async fn set_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let raw = DS3231DateTime::from_datetime(datetime).map_err(DS3231Error::DateTime)?;
        let data: [u8; 7] = (&raw).into();
        self.i2c
            .write(
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
            )
            .await?;
        Ok(())
    }

    /// Writes one or both alarm configurations in a single bus
    /// transaction; see the blocking
    /// [`set_alarms`](crate::DS3231::set_alarms) for the packing
    /// rules.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration fails validation or the
    /// bus write fails.
    pub async fn set_alarms(
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
        self.i2c.write(self.address, &data[..len]).await?;
        Ok(())
    }

    /// Reads the status register masked to the two alarm-fired flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus read fails.
    pub async fn alarm_flags(&mut self) -> Result<Status, DS3231Error<I2C::Error>> {
        let bits = self
            .read_register(RegAddr::ControlStatus, Status::ALARM1_FLAG | Status::ALARM2_FLAG)
            .await?;
        Ok(Status(bits))
    }

    /// Clears the fired flag of the selected alarm(s).
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub async fn clear_alarm_flags(
        &mut self,
        select: AlarmSelect,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(RegAddr::ControlStatus, select.mask(), RegisterOp::Clear)
            .await
    }

    /// Enables interrupt output for the selected alarm(s), setting
    /// INTCN along with the selected A1IE/A2IE bits.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub async fn enable_alarm_interrupts(
        &mut self,
        select: AlarmSelect,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::Control,
            Control::INTERRUPT_CONTROL | select.mask(),
            RegisterOp::Set,
        )
        .await
    }

    /// Disables interrupt output for the selected alarm(s); INTCN is
    /// left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub async fn disable_alarm_interrupts(
        &mut self,
        select: AlarmSelect,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(RegAddr::Control, select.mask(), RegisterOp::Clear)
            .await
    }

    /// Enables the 32kHz output pin.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub async fn enable_32khz_output(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::ControlStatus,
            Status::ENABLE_32KHZ_OUTPUT,
            RegisterOp::Set,
        )
        .await
    }

    /// Disables the 32kHz output pin.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub async fn disable_32khz_output(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::ControlStatus,
            Status::ENABLE_32KHZ_OUTPUT,
            RegisterOp::Clear,
        )
        .await
    }

    /// Enables the square wave output by clearing INTCN.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub async fn enable_square_wave(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::Control,
            Control::INTERRUPT_CONTROL,
            RegisterOp::Clear,
        )
        .await
    }

    /// Disables the square wave output by setting INTCN.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub async fn disable_square_wave(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::Control,
            Control::INTERRUPT_CONTROL,
            RegisterOp::Set,
        )
        .await
    }

    /// Sets the square wave output frequency, preserving every other
    /// control bit.
    ///
    /// # Errors
    ///
    /// Returns an error if any bus transaction fails.
    pub async fn set_square_wave_frequency(
        &mut self,
        frequency: SquareWaveFrequency,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let control = self.read_register(RegAddr::Control, 0xFF).await?;
        let value = (control & !Control::SQUARE_WAVE_RATE) | frequency.rate_bits();
        self.update_register(RegAddr::Control, value, RegisterOp::Replace)
            .await
    }

    /// Lets the oscillator run on battery power (clears EOSC).
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub async fn enable_oscillator(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::Control,
            Control::OSCILLATOR_DISABLE,
            RegisterOp::Clear,
        )
        .await
    }

    /// Stops the oscillator on battery power (sets EOSC).
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub async fn disable_oscillator(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::Control,
            Control::OSCILLATOR_DISABLE,
            RegisterOp::Set,
        )
        .await
    }

    /// Checks whether the oscillator has stopped at some point.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus read fails.
    pub async fn oscillator_stop_flag(&mut self) -> Result<bool, DS3231Error<I2C::Error>> {
        let bits = self
            .read_register(RegAddr::ControlStatus, Status::OSCILLATOR_STOP_FLAG)
            .await?;
        Ok(bits != 0)
    }

    /// Clears the oscillator stop flag.
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub async fn clear_oscillator_stop_flag(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register(
            RegAddr::ControlStatus,
            Status::OSCILLATOR_STOP_FLAG,
            RegisterOp::Clear,
        )
        .await
    }

    /// Gets the temperature rounded down to whole degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus read fails.
    pub async fn temperature(&mut self) -> Result<i8, DS3231Error<I2C::Error>> {
        let mut data = [0];
        self.i2c
            .write_read(self.address, &[RegAddr::MSBTemp as u8], &mut data)
            .await?;
        Ok(Temperature(data[0]).temperature())
    }

    /// Gets the temperature as whole degrees Celsius plus the
    /// fraction in hundredths (0, 25, 50 or 75).
    ///
    /// # Errors
    ///
    /// Returns an error if the bus read fails.
    pub async fn temperature_split(&mut self) -> Result<(i8, u8), DS3231Error<I2C::Error>> {
        let mut data = [0; 2];
        self.i2c
            .write_read(self.address, &[RegAddr::MSBTemp as u8], &mut data)
            .await?;
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
    pub async fn temperature_f32(&mut self) -> Result<f32, DS3231Error<I2C::Error>> {
        let mut data = [0; 2];
        self.i2c
            .write_read(self.address, &[RegAddr::MSBTemp as u8], &mut data)
            .await?;
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
                    pub async fn $name(&mut self) -> Result<$typ, DS3231Error<I2C::Error>> {
                        let mut data = [0];
                        self.i2c
                            .write_read(self.address, &[$regaddr as u8], &mut data)
                            .await?;
                        Ok($typ(data[0]))
                    }

                    #[doc = concat!("Sets the value of the ", stringify!($name), " register.")]
                    #[doc = "\n\n# Errors"]
                    #[doc = "\nReturns an error if the bus write fails."]
                    pub async fn [<set_ $name>](&mut self, value: $typ) -> Result<(), DS3231Error<I2C::Error>> {
                        self.i2c.write(
                            self.address,
                            &[$regaddr as u8, value.into()],
                        ).await?;
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

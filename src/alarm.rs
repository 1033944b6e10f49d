//! Alarm match configuration for the DS3231's two alarms.
//!
//! Each alarm register holds a BCD time field plus a mask bit in bit
//! 7; a masked field is ignored when the chip compares the alarm
//! against the running time. The enums here name the useful mask
//! combinations instead of exposing the bits directly:
//!
//! - Alarm 1 matches down to seconds: every second, at seconds, at
//!   minutes:seconds, at a time of day, or at a time on a day of week
//!   or date of month.
//! - Alarm 2 has no seconds register and fires at 00 seconds of the
//!   matching minute, with the equivalent coarser combinations.
//!
//! The day-of-week and date-of-month matches are mutually exclusive:
//! a weekday match ORs [`MATCH_WEEKDAY`] into the day/date register,
//! a date match writes plain BCD. Alarm times are always encoded in
//! 24-hour form.

use crate::bcd;

/// Mask bit; a field written as this value is ignored during alarm
/// matching.
pub const NOT_SET: u8 = 0x80;

/// DY/DT bit; set in the day/date register to compare against the day
/// of week instead of the date of month.
pub const MATCH_WEEKDAY: u8 = 0x40;

/// Error type for alarm configuration operations.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmError {
    /// Invalid time component value
    InvalidTime(&'static str),
    /// Invalid day of week (must be 1-7, 1=Sunday)
    InvalidDayOfWeek,
    /// Invalid date of month (must be 1-31)
    InvalidDateOfMonth,
}

/// Alarm 1 match configurations (seconds precision).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm1Config {
    /// Trigger every second (all fields masked)
    EverySecond,

    /// Trigger when seconds match
    AtSeconds {
        /// Seconds value (0-59)
        seconds: u8,
    },

    /// Trigger when minutes and seconds match
    AtMinutesSeconds {
        /// Minutes value (0-59)
        minutes: u8,
        /// Seconds value (0-59)
        seconds: u8,
    },

    /// Trigger when hours, minutes and seconds match (daily alarm)
    AtTime {
        /// Hours value (0-23)
        hours: u8,
        /// Minutes value (0-59)
        minutes: u8,
        /// Seconds value (0-59)
        seconds: u8,
    },

    /// Trigger at a time on a specific day of week
    AtTimeOnDay {
        /// Hours value (0-23)
        hours: u8,
        /// Minutes value (0-59)
        minutes: u8,
        /// Seconds value (0-59)
        seconds: u8,
        /// Day of week (1-7, 1=Sunday)
        day: u8,
    },

    /// Trigger at a time on a specific date of month
    AtTimeOnDate {
        /// Hours value (0-23)
        hours: u8,
        /// Minutes value (0-59)
        minutes: u8,
        /// Seconds value (0-59)
        seconds: u8,
        /// Date of month (1-31)
        date: u8,
    },
}

/// Alarm 2 match configurations (minute precision, fires at 00
/// seconds).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm2Config {
    /// Trigger every minute (all fields masked)
    EveryMinute,

    /// Trigger when minutes match
    AtMinutes {
        /// Minutes value (0-59)
        minutes: u8,
    },

    /// Trigger when hours and minutes match (daily alarm)
    AtTime {
        /// Hours value (0-23)
        hours: u8,
        /// Minutes value (0-59)
        minutes: u8,
    },

    /// Trigger at a time on a specific day of week
    AtTimeOnDay {
        /// Hours value (0-23)
        hours: u8,
        /// Minutes value (0-59)
        minutes: u8,
        /// Day of week (1-7, 1=Sunday)
        day: u8,
    },

    /// Trigger at a time on a specific date of month
    AtTimeOnDate {
        /// Hours value (0-23)
        hours: u8,
        /// Minutes value (0-59)
        minutes: u8,
        /// Date of month (1-31)
        date: u8,
    },
}

fn check_seconds(seconds: u8) -> Result<(), AlarmError> {
    if seconds > 59 {
        return Err(AlarmError::InvalidTime("seconds must be 0-59"));
    }
    Ok(())
}

fn check_minutes(minutes: u8) -> Result<(), AlarmError> {
    if minutes > 59 {
        return Err(AlarmError::InvalidTime("minutes must be 0-59"));
    }
    Ok(())
}

fn check_hours(hours: u8) -> Result<(), AlarmError> {
    if hours > 23 {
        return Err(AlarmError::InvalidTime("hours must be 0-23"));
    }
    Ok(())
}

/// Encodes the day/date register byte for the coarsest match field.
fn encode_day_date(day_or_date: u8, is_weekday: bool) -> Result<u8, AlarmError> {
    if is_weekday {
        if day_or_date == 0 || day_or_date > 7 {
            return Err(AlarmError::InvalidDayOfWeek);
        }
        Ok(MATCH_WEEKDAY | day_or_date)
    } else {
        if day_or_date == 0 || day_or_date > 31 {
            return Err(AlarmError::InvalidDateOfMonth);
        }
        Ok(bcd::decimal_to_bcd(day_or_date))
    }
}

impl Alarm1Config {
    /// Validates the alarm configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any time component is out of valid range.
    pub fn validate(&self) -> Result<(), AlarmError> {
        match self {
            Alarm1Config::EverySecond => Ok(()),
            Alarm1Config::AtSeconds { seconds } => check_seconds(*seconds),
            Alarm1Config::AtMinutesSeconds { minutes, seconds } => {
                check_minutes(*minutes)?;
                check_seconds(*seconds)
            }
            Alarm1Config::AtTime {
                hours,
                minutes,
                seconds,
            } => {
                check_hours(*hours)?;
                check_minutes(*minutes)?;
                check_seconds(*seconds)
            }
            Alarm1Config::AtTimeOnDay {
                hours,
                minutes,
                seconds,
                day,
            } => {
                check_hours(*hours)?;
                check_minutes(*minutes)?;
                check_seconds(*seconds)?;
                if *day == 0 || *day > 7 {
                    return Err(AlarmError::InvalidDayOfWeek);
                }
                Ok(())
            }
            Alarm1Config::AtTimeOnDate {
                hours,
                minutes,
                seconds,
                date,
            } => {
                check_hours(*hours)?;
                check_minutes(*minutes)?;
                check_seconds(*seconds)?;
                if *date == 0 || *date > 31 {
                    return Err(AlarmError::InvalidDateOfMonth);
                }
                Ok(())
            }
        }
    }

    /// Encodes the four alarm 1 register bytes (seconds, minutes,
    /// hours, day/date). Fields the match granularity does not use
    /// are written as [`NOT_SET`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub(crate) fn encode(&self) -> Result<[u8; 4], AlarmError> {
        self.validate()?;
        Ok(match *self {
            Alarm1Config::EverySecond => [NOT_SET, NOT_SET, NOT_SET, NOT_SET],
            Alarm1Config::AtSeconds { seconds } => {
                [bcd::decimal_to_bcd(seconds), NOT_SET, NOT_SET, NOT_SET]
            }
            Alarm1Config::AtMinutesSeconds { minutes, seconds } => [
                bcd::decimal_to_bcd(seconds),
                bcd::decimal_to_bcd(minutes),
                NOT_SET,
                NOT_SET,
            ],
            Alarm1Config::AtTime {
                hours,
                minutes,
                seconds,
            } => [
                bcd::decimal_to_bcd(seconds),
                bcd::decimal_to_bcd(minutes),
                bcd::decimal_to_bcd(hours),
                NOT_SET,
            ],
            Alarm1Config::AtTimeOnDay {
                hours,
                minutes,
                seconds,
                day,
            } => [
                bcd::decimal_to_bcd(seconds),
                bcd::decimal_to_bcd(minutes),
                bcd::decimal_to_bcd(hours),
                encode_day_date(day, true)?,
            ],
            Alarm1Config::AtTimeOnDate {
                hours,
                minutes,
                seconds,
                date,
            } => [
                bcd::decimal_to_bcd(seconds),
                bcd::decimal_to_bcd(minutes),
                bcd::decimal_to_bcd(hours),
                encode_day_date(date, false)?,
            ],
        })
    }
}

impl Alarm2Config {
    /// Validates the alarm configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any time component is out of valid range.
    pub fn validate(&self) -> Result<(), AlarmError> {
        match self {
            Alarm2Config::EveryMinute => Ok(()),
            Alarm2Config::AtMinutes { minutes } => check_minutes(*minutes),
            Alarm2Config::AtTime { hours, minutes } => {
                check_hours(*hours)?;
                check_minutes(*minutes)
            }
            Alarm2Config::AtTimeOnDay {
                hours,
                minutes,
                day,
            } => {
                check_hours(*hours)?;
                check_minutes(*minutes)?;
                if *day == 0 || *day > 7 {
                    return Err(AlarmError::InvalidDayOfWeek);
                }
                Ok(())
            }
            Alarm2Config::AtTimeOnDate {
                hours,
                minutes,
                date,
            } => {
                check_hours(*hours)?;
                check_minutes(*minutes)?;
                if *date == 0 || *date > 31 {
                    return Err(AlarmError::InvalidDateOfMonth);
                }
                Ok(())
            }
        }
    }

    /// Encodes the three alarm 2 register bytes (minutes, hours,
    /// day/date). Fields the match granularity does not use are
    /// written as [`NOT_SET`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub(crate) fn encode(&self) -> Result<[u8; 3], AlarmError> {
        self.validate()?;
        Ok(match *self {
            Alarm2Config::EveryMinute => [NOT_SET, NOT_SET, NOT_SET],
            Alarm2Config::AtMinutes { minutes } => {
                [bcd::decimal_to_bcd(minutes), NOT_SET, NOT_SET]
            }
            Alarm2Config::AtTime { hours, minutes } => [
                bcd::decimal_to_bcd(minutes),
                bcd::decimal_to_bcd(hours),
                NOT_SET,
            ],
            Alarm2Config::AtTimeOnDay {
                hours,
                minutes,
                day,
            } => [
                bcd::decimal_to_bcd(minutes),
                bcd::decimal_to_bcd(hours),
                encode_day_date(day, true)?,
            ],
            Alarm2Config::AtTimeOnDate {
                hours,
                minutes,
                date,
            } => [
                bcd::decimal_to_bcd(minutes),
                bcd::decimal_to_bcd(hours),
                encode_day_date(date, false)?,
            ],
        })
    }
}

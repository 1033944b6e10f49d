//! Calendar conversion for the DS3231 date/time register block.
//!
//! The chip stores the date and time in 7 consecutive BCD registers
//! (seconds, minutes, hours, day, date, month, year). This module
//! converts that block to and from chrono's `NaiveDateTime`, which is
//! deliberately zone- and DST-free: the driver stores whatever wall
//! time the caller hands it and applying timezones is the caller's
//! business.
//!
//! Writes always use 24-hour representation. Reads decode both the
//! 12-hour and 24-hour layouts of the hours register, so a chip that
//! was configured by other software remains readable.
//!
//! Conversion errors are reported via [`DS3231DateTimeError`].

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::bcd;
use crate::{Hours, Month, TimeRepresentation};

/// The supported year range; the year register is a two-digit offset
/// from 2000 and the century bits are not used.
const YEAR_BASE: i32 = 2000;

/// Raw image of the 7 date/time registers.
///
/// Seconds, minutes, date and year are plain BCD bytes; hours and
/// month keep their bitfield wrappers because they carry mode and
/// century bits on top of the payload. The day register is a 1-based
/// weekday (1 = Sunday).
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct DS3231DateTime {
    seconds: u8,
    minutes: u8,
    hours: Hours,
    day: u8,
    date: u8,
    month: Month,
    year: u8,
}

impl DS3231DateTime {
    /// Encodes a `NaiveDateTime` into register bytes, always in
    /// 24-hour representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the year falls outside 2000-2099.
    pub(crate) fn from_datetime(datetime: &NaiveDateTime) -> Result<Self, DS3231DateTimeError> {
        let year = datetime.year();
        if year < YEAR_BASE {
            error!("Year {} is too early! must be after 1999", year);
            return Err(DS3231DateTimeError::YearNotAfter1999);
        }
        if year > YEAR_BASE + 99 {
            error!("Year {} is too late! must be before 2100", year);
            return Err(DS3231DateTimeError::YearNotBefore2100);
        }

        let second = u8::try_from(datetime.second()).map_err(|_| DS3231DateTimeError::InvalidDateTime)?;
        let minute = u8::try_from(datetime.minute()).map_err(|_| DS3231DateTimeError::InvalidDateTime)?;
        let hour = u8::try_from(datetime.hour()).map_err(|_| DS3231DateTimeError::InvalidDateTime)?;
        let date = u8::try_from(datetime.day()).map_err(|_| DS3231DateTimeError::InvalidDateTime)?;
        let month = u8::try_from(datetime.month()).map_err(|_| DS3231DateTimeError::InvalidDateTime)?;
        let weekday = u8::try_from(datetime.weekday().num_days_from_sunday())
            .map_err(|_| DS3231DateTimeError::InvalidDateTime)?;

        // Leap seconds surface from chrono as second() == 59 with a
        // nanosecond overflow, so second is already <= 59 here. In
        // 24-hour mode the twenty-hours flag coincides with the BCD
        // tens nibble, so straight BCD is the correct byte image.
        Ok(DS3231DateTime {
            seconds: bcd::decimal_to_bcd(second),
            minutes: bcd::decimal_to_bcd(minute),
            hours: Hours(bcd::decimal_to_bcd(hour)),
            day: weekday + 1,
            date: bcd::decimal_to_bcd(date),
            month: Month(bcd::decimal_to_bcd(month)),
            year: bcd::decimal_to_bcd((year - YEAR_BASE) as u8),
        })
    }

    /// Decodes the register bytes into a `NaiveDateTime`.
    ///
    /// The stored weekday is redundant (it follows from the date) and
    /// is ignored; the century bits of the month register are masked
    /// off.
    ///
    /// # Errors
    ///
    /// Returns an error if any register holds malformed BCD or an
    /// out-of-range value.
    pub(crate) fn into_datetime(self) -> Result<NaiveDateTime, DS3231DateTimeError> {
        let seconds = u32::from(bcd::bcd_to_decimal(self.seconds));
        let minutes = u32::from(bcd::bcd_to_decimal(self.minutes));
        let hours = u32::from(self.decode_hours()?);

        let month = 10 * u32::from(self.month.ten_month()) + u32::from(self.month.month());
        let date = u32::from(bcd::bcd_to_decimal(self.date));
        let year = YEAR_BASE + i32::from(bcd::bcd_to_decimal(self.year));

        NaiveDate::from_ymd_opt(year, month, date)
            .and_then(|d| d.and_hms_opt(hours, minutes, seconds))
            .ok_or(DS3231DateTimeError::InvalidDateTime)
    }

    /// Decodes the hours register, branching on the 12/24-hour mode
    /// bit.
    fn decode_hours(&self) -> Result<u8, DS3231DateTimeError> {
        let hours = 10 * self.hours.ten_hours() + self.hours.hours();
        match self.hours.time_representation() {
            TimeRepresentation::TwentyFourHour => {
                Ok(hours + 20 * self.hours.pm_or_twenty_hours())
            }
            TimeRepresentation::TwelveHour => {
                if hours == 0 || hours > 12 {
                    return Err(DS3231DateTimeError::InvalidDateTime);
                }
                let is_pm = self.hours.pm_or_twenty_hours() != 0;
                Ok(match (hours, is_pm) {
                    (12, false) => 0,    // 12 AM
                    (12, true) => 12,    // 12 PM
                    (h, false) => h,     // 1-11 AM
                    (h, true) => h + 12, // 1-11 PM
                })
            }
        }
    }
}

impl From<[u8; 7]> for DS3231DateTime {
    fn from(data: [u8; 7]) -> Self {
        DS3231DateTime {
            seconds: data[0],
            minutes: data[1],
            hours: Hours(data[2]),
            day: data[3],
            date: data[4],
            month: Month(data[5]),
            year: data[6],
        }
    }
}

impl From<&DS3231DateTime> for [u8; 7] {
    fn from(dt: &DS3231DateTime) -> [u8; 7] {
        [
            dt.seconds,
            dt.minutes,
            dt.hours.0,
            dt.day,
            dt.date,
            dt.month.0,
            dt.year,
        ]
    }
}

/// Errors that can occur during DS3231 date/time conversion.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DS3231DateTimeError {
    /// The provided or decoded date/time is invalid (out of range or
    /// not representable)
    InvalidDateTime,
    /// The year is not before 2100 (this driver does not use the
    /// century bits)
    YearNotBefore2100,
    /// The year is not after 1999 (the year register is an offset
    /// from 2000)
    YearNotAfter1999,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn encodes_24_hour_wire_image() {
        // 2024-03-14 is a Thursday (weekday 4, stored 1-based as 5)
        let raw = DS3231DateTime::from_datetime(&datetime(2024, 3, 14, 15, 30, 0)).unwrap();
        let bytes: [u8; 7] = (&raw).into();
        assert_eq!(bytes, [0x00, 0x30, 0x15, 0x05, 0x14, 0x03, 0x24]);

        // 22:00 exercises the twenty-hours bit of the hours register
        let raw = DS3231DateTime::from_datetime(&datetime(2025, 12, 31, 22, 59, 58)).unwrap();
        let bytes: [u8; 7] = (&raw).into();
        assert_eq!(bytes, [0x58, 0x59, 0x22, 0x04, 0x31, 0x12, 0x25]);
    }

    #[test]
    fn roundtrips_through_register_bytes() {
        for dt in [
            datetime(2000, 1, 1, 0, 0, 0),
            datetime(2024, 2, 29, 12, 0, 0), // leap day
            datetime(2024, 6, 15, 10, 25, 45),
            datetime(2099, 12, 31, 23, 59, 59),
        ] {
            let raw = DS3231DateTime::from_datetime(&dt).unwrap();
            let bytes: [u8; 7] = (&raw).into();
            let decoded = DS3231DateTime::from(bytes).into_datetime().unwrap();
            assert_eq!(dt, decoded);
        }
    }

    #[test]
    fn decodes_12_hour_mode() {
        // 12-hour flag set, hour field 5, PM flag set -> 17:00
        let raw = DS3231DateTime::from([0x00, 0x00, 0x65, 0x01, 0x01, 0x01, 0x24]);
        assert_eq!(raw.into_datetime().unwrap().hour(), 17);

        // same byte without the PM flag -> 05:00
        let raw = DS3231DateTime::from([0x00, 0x00, 0x45, 0x01, 0x01, 0x01, 0x24]);
        assert_eq!(raw.into_datetime().unwrap().hour(), 5);

        // 12 AM and 12 PM wrap correctly
        let raw = DS3231DateTime::from([0x00, 0x00, 0x52, 0x01, 0x01, 0x01, 0x24]);
        assert_eq!(raw.into_datetime().unwrap().hour(), 0);
        let raw = DS3231DateTime::from([0x00, 0x00, 0x72, 0x01, 0x01, 0x01, 0x24]);
        assert_eq!(raw.into_datetime().unwrap().hour(), 12);
    }

    #[test]
    fn decodes_24_hour_mode() {
        let raw = DS3231DateTime::from([0x00, 0x00, 0x22, 0x01, 0x01, 0x01, 0x24]);
        assert_eq!(raw.into_datetime().unwrap().hour(), 22);

        let raw = DS3231DateTime::from([0x00, 0x00, 0x09, 0x01, 0x01, 0x01, 0x24]);
        assert_eq!(raw.into_datetime().unwrap().hour(), 9);
    }

    #[test]
    fn masks_century_bits_on_read() {
        let raw = DS3231DateTime::from([0x00, 0x00, 0x00, 0x01, 0x01, 0x83, 0x24]);
        let dt = raw.into_datetime().unwrap();
        assert_eq!(dt.month(), 3);
        assert_eq!(dt.year(), 2024);
    }

    #[test]
    fn stores_weekday_one_based() {
        // 2024-03-10 is a Sunday
        let raw = DS3231DateTime::from_datetime(&datetime(2024, 3, 10, 0, 0, 0)).unwrap();
        let bytes: [u8; 7] = (&raw).into();
        assert_eq!(bytes[3], 1);

        // 2024-03-16 is a Saturday
        let raw = DS3231DateTime::from_datetime(&datetime(2024, 3, 16, 0, 0, 0)).unwrap();
        let bytes: [u8; 7] = (&raw).into();
        assert_eq!(bytes[3], 7);
    }

    #[test]
    fn rejects_years_outside_register_range() {
        let err = DS3231DateTime::from_datetime(&datetime(1999, 12, 31, 23, 59, 59)).unwrap_err();
        assert!(matches!(err, DS3231DateTimeError::YearNotAfter1999));

        let err = DS3231DateTime::from_datetime(&datetime(2100, 1, 1, 0, 0, 0)).unwrap_err();
        assert!(matches!(err, DS3231DateTimeError::YearNotBefore2100));

        assert!(DS3231DateTime::from_datetime(&datetime(2000, 1, 1, 0, 0, 0)).is_ok());
        assert!(DS3231DateTime::from_datetime(&datetime(2099, 12, 31, 23, 59, 59)).is_ok());
    }

    #[test]
    fn rejects_malformed_register_values() {
        // seconds register holds non-BCD garbage (0x6A decodes to 70)
        let raw = DS3231DateTime::from([0x6A, 0x00, 0x00, 0x01, 0x01, 0x01, 0x24]);
        assert!(raw.into_datetime().is_err());

        // month 0x13 decodes to 13
        let raw = DS3231DateTime::from([0x00, 0x00, 0x00, 0x01, 0x01, 0x13, 0x24]);
        assert!(raw.into_datetime().is_err());

        // date 0x32 decodes to 32
        let raw = DS3231DateTime::from([0x00, 0x00, 0x00, 0x01, 0x32, 0x01, 0x24]);
        assert!(raw.into_datetime().is_err());

        // hour field 0 is invalid in 12-hour mode
        let raw = DS3231DateTime::from([0x00, 0x00, 0x40, 0x01, 0x01, 0x01, 0x24]);
        assert!(raw.into_datetime().is_err());
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! ISO-8601 timestamps for the `Processing Date` text chunk
use web_time::{SystemTime, UNIX_EPOCH};

const MILLIS_PER_DAY: u64 = 86_400_000;

/// The current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn iso8601_now() -> String {
    // a clock before 1970 is reported as the epoch
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|x| u64::try_from(x.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0);

    format_iso8601(millis)
}

/// Format milliseconds since the unix epoch as `YYYY-MM-DDTHH:MM:SS.mmmZ`
///
/// ```
/// use retrobit_image::metadata::format_iso8601;
///
/// assert_eq!(format_iso8601(0), "1970-01-01T00:00:00.000Z");
/// assert_eq!(format_iso8601(1_704_067_200_000), "2024-01-01T00:00:00.000Z");
/// ```
pub fn format_iso8601(millis: u64) -> String {
    let days = millis / MILLIS_PER_DAY;
    let in_day = millis % MILLIS_PER_DAY;

    let (year, month, day) = civil_from_days(days);

    let hours = in_day / 3_600_000;
    let minutes = (in_day / 60_000) % 60;
    let seconds = (in_day / 1000) % 60;
    let millis = in_day % 1000;

    format!("{year:04}-{month:02}-{day:02}T{hours:02}:{minutes:02}:{seconds:02}.{millis:03}Z")
}

/// Convert days since 1970-01-01 into a (year, month, day) proleptic
/// Gregorian date, see Howard Hinnant's `civil_from_days`
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn civil_from_days(days: u64) -> (i64, u64, u64) {
    let z = days as i64 + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;

    let day = (doy - (153 * mp + 2) / 5 + 1) as u64;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u64;
    let year = yoe + era * 400 + i64::from(month <= 2);

    (year, month, day)
}

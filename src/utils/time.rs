use chrono::Timelike;

/// Seconds from the given wall-clock time until 00:30 the following day.
///
/// The panel refreshes shortly after midnight so the grid flips to the new
/// date while nobody is looking at it. Always positive for a valid clock.
pub fn seconds_until_half_past_midnight<T: Timelike>(now: &T) -> u64 {
    let hour = now.hour() as u64;
    let minute = now.minute() as u64;
    let second = now.second() as u64;

    (23 - hour) * 3600 + (59 - minute) * 60 + (60 - second) + 1800
}

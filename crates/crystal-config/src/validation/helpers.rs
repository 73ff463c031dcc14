//! Range checks shared by the section validators.

use std::fmt::Display;
use std::ops::RangeInclusive;

/// Record an error when `value` falls outside `range`. NaN never passes.
pub(crate) fn check_range<T: PartialOrd + Display>(
    errors: &mut Vec<String>,
    name: &str,
    value: T,
    range: RangeInclusive<T>,
) {
    if !range.contains(&value) {
        errors.push(format!(
            "{name} = {value} is out of range [{}, {}]",
            range.start(),
            range.end()
        ));
    }
}

/// Each RGB channel must be within `0..=1`.
pub(crate) fn check_color(errors: &mut Vec<String>, name: &str, color: [f32; 3]) {
    for (channel, value) in ["r", "g", "b"].into_iter().zip(color) {
        check_range(errors, &format!("{name}.{channel}"), value, 0.0..=1.0);
    }
}

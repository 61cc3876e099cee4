use std::borrow::Cow;

pub const PID_MARKER: &str = "$$";

/// Replace every `$$` in `line` with the decimal `pid`, scanning left to right.
///
/// Occurrences do not overlap, so `$$$` becomes `<pid>$` and `$$$$` becomes
/// `<pid><pid>`. A line without the marker is returned borrowed and untouched.
pub fn expand_pid(line: &str, pid: i32) -> Cow<'_, str> {
    if !line.contains(PID_MARKER) { return Cow::Borrowed(line); }
    Cow::Owned(line.replace(PID_MARKER, &pid.to_string()))
}

use jiff::Timestamp;

/// Separator between the segments of a tree node id.
pub const ID_SEP: &str = ":";

/// Text of a value the source left undefined.
pub const UNDEFINED: &str = "undefined";

/// Time since `ts` relative to `now`, as kubectl prints it in the AGE column.
///
/// Absent timestamps and the Unix epoch (the zero-time sentinel) render as
/// `<unknown>`.
pub fn translate_timestamp_since(ts: Option<&Timestamp>, now: &Timestamp) -> String {
    match ts {
        Some(ts) if *ts != Timestamp::UNIX_EPOCH => {
            human_duration(now.as_millisecond() - ts.as_millisecond())
        }
        _ => "<unknown>".to_string(),
    }
}

/// Render a millisecond delta with at most two units, e.g. `1d16h`.
pub fn human_duration(millis: i64) -> String {
    let mut seconds = millis / 1000;
    if seconds < -1 {
        return "<invalid>".to_string();
    } else if seconds < 0 {
        return "0s".to_string();
    } else if seconds < 60 {
        return format!("{}s", seconds);
    }

    let mut minutes = seconds / 60;
    seconds %= 60;
    if minutes < 60 {
        return format!("{}m{}s", minutes, seconds);
    }

    let mut hours = minutes / 60;
    minutes %= 60;
    if hours < 24 {
        return format!("{}h{}m", hours, minutes);
    }

    let mut days = hours / 24;
    hours %= 24;
    if days < 365 {
        return format!("{}d{}h", days, hours);
    }

    let years = days / 365;
    days %= 365;
    format!("{}y{}d", years, days)
}

/// Map arbitrary label text onto the id charset `[A-Za-z0-9\-_:.]`.
///
/// Unlike the HTML name token grammar this is modeled on, the first character
/// is not forced to be a letter.
pub fn correct_id(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | ':' | '.' => c,
            _ => '_',
        })
        .collect()
}

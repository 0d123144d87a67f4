/// File rotation strategy selected by the `rotate_policy` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotatePolicy {
    /// Roll over once the active file reaches a size limit.
    Size,
    /// Roll over every 24 hours, one file per day.
    Daily,
    /// Roll over every `rotate_time` hours.
    Time,
}

impl RotatePolicy {
    /// Maps a policy tag onto a strategy.
    ///
    /// Empty and `"size"` select [`RotatePolicy::Size`], `"daily"` selects [`RotatePolicy::Daily`].
    /// Every other tag falls back to interval rotation.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "" | "size" => RotatePolicy::Size,
            "daily" => RotatePolicy::Daily,
            _ => RotatePolicy::Time,
        }
    }

    /// Suffix appended to the log file path to build dated file names.
    pub fn pattern_suffix(&self) -> Option<&'static str> {
        match self {
            RotatePolicy::Size => None,
            RotatePolicy::Daily => Some(".%Y%m%d"),
            RotatePolicy::Time => Some(".%Y%m%d%H%M"),
        }
    }

    /// Rotation interval in hours for time based strategies.
    pub fn interval_hours(&self, rotate_time: u32) -> u32 {
        match self {
            RotatePolicy::Size => 0,
            RotatePolicy::Daily => 24,
            RotatePolicy::Time => rotate_time,
        }
    }
}

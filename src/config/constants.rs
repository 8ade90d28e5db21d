use std::time::Duration;

/// How long a notice stays active when the message does not carry its
/// own duration.
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(3000);

pub const LOG_FILE_PATH: &str = "/tmp/taskwise.log";

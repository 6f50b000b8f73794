//! Fixed names and defaults shared across modules.

/// Skip budget a runner starts each race with.
pub const DEFAULT_MAX_CHANCES: i32 = 3;

/// Entries kept on the leaderboard.
pub const LEADERBOARD_MAX_ENTRIES: usize = 10;

/// Player-prefs style keys used by the leaderboard store.
pub mod leaderboard_keys {
    pub const COUNT: &str = "LB_Count";
    pub const NAME_PREFIX: &str = "LB_Name_";
    pub const TIME_PREFIX: &str = "LB_Time_";
}

/// Placeholder name for a row whose name key is missing.
pub const MISSING_NAME: &str = "---";

/// Placeholder time for a row whose time key is missing.
pub const MISSING_TIME: f32 = 9999.0;

/// Name saved when the player submits a blank name.
pub const ANONYMOUS_NAME: &str = "???";

/// Characters kept from a submitted name.
pub const NAME_LENGTH: usize = 3;

/// Key id doors and pickups use unless configured otherwise.
pub const DEFAULT_KEY_ID: &str = "KeyA";

/// Localization keys read by the finish screen.
pub mod text_keys {
    pub const FINISH_SUCCESS: &str = "finish.success";
    pub const FINISH_FAILED: &str = "finish.failed";
    pub const FINISH_TIME: &str = "finish.time";
    pub const LEADERBOARD_EMPTY: &str = "leaderboard.empty";
}

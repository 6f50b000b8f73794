//! Game session: pause state, the session clock, and the finish screen.
//!
//! The session receives the race's terminal result, freezes time and offers
//! score submission. Scene changes are returned as [`SceneRequest`]s for the
//! host to carry out.

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::constants::text_keys;
use crate::leaderboard::{self, LeaderboardEntry, ScoreStore};
use crate::localization::Localizer;
use crate::race::{RaceResult, RaceResultSink};

/// Scene change the host should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneRequest {
    /// Reload the game scene (fresh route load and race).
    Restart,
    /// Return to the title menu.
    Title,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    elapsed: f32,
    running: bool,
    paused: bool,
    result: Option<RaceResult>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            elapsed: 0.0,
            running: true,
            paused: false,
            result: None,
        }
    }

    /// Advance the session clock by one frame.
    pub fn tick(&mut self, dt: f32) {
        if self.running && !self.paused {
            self.elapsed += dt;
        }
    }

    /// 0.0 while paused or after the finish, 1.0 otherwise.
    pub fn time_scale(&self) -> f32 {
        if self.paused {
            0.0
        } else {
            1.0
        }
    }

    /// Flip pause. Has no effect once the race is over.
    pub fn toggle_pause(&mut self) {
        if !self.running {
            return;
        }
        self.paused = !self.paused;
        log::debug!("Pause {}", if self.paused { "on" } else { "off" });
    }

    /// Resume button on the pause menu.
    pub fn resume(&mut self) {
        if self.running && self.paused {
            self.toggle_pause();
        }
    }

    /// Record the race outcome. Only the first call takes effect.
    pub fn finish(&mut self, success: bool, final_time: f32) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.paused = true;
        self.result = Some(RaceResult {
            success,
            elapsed_seconds: final_time,
        });
        log::info!(
            "Session over: {} in {}",
            if success { "finished" } else { "failed" },
            format_time(final_time)
        );
        true
    }

    /// Reaching the exit volume counts as a success at the session's time.
    pub fn finish_at_exit(&mut self) -> bool {
        self.finish(true, self.elapsed)
    }

    /// Finish panel text, or `None` while the race is still on.
    pub fn finish_text(&self, localizer: &Localizer) -> Option<String> {
        let result = self.result?;
        let label = if result.success {
            localizer.get(text_keys::FINISH_SUCCESS, "FINISH")
        } else {
            localizer.get(text_keys::FINISH_FAILED, "FAILED")
        };
        let time_label = localizer.get(text_keys::FINISH_TIME, "Time: ");
        Some(format!(
            "{}\n{}{}",
            label,
            time_label,
            format_time(result.elapsed_seconds)
        ))
    }

    /// Save the session time under the player's name and head back to the title.
    pub fn submit_score(
        &self,
        raw_name: Option<&str>,
        store: &mut impl ScoreStore,
        max_entries: usize,
    ) -> (SceneRequest, Vec<LeaderboardEntry>) {
        let name = sanitize_name(
            raw_name.unwrap_or(self.config.anonymous_name.as_str()),
            self.config.name_length,
            &self.config.anonymous_name,
        );
        log::info!("Submitting score {} for {}", format_time(self.elapsed), name);
        let board = leaderboard::save_score(store, &name, self.elapsed, max_entries);
        (SceneRequest::Title, board)
    }

    pub fn restart(&self) -> SceneRequest {
        SceneRequest::Restart
    }

    pub fn exit_to_title(&self) -> SceneRequest {
        SceneRequest::Title
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn result(&self) -> Option<RaceResult> {
        self.result
    }
}

impl RaceResultSink for GameSession {
    fn report_race_result(&mut self, success: bool, elapsed_seconds: f32) {
        self.finish(success, elapsed_seconds);
    }
}

/// `MM:SS.ss`, minutes floored.
pub fn format_time(seconds: f32) -> String {
    let minutes = (seconds / 60.0).floor() as i32;
    let rest = seconds % 60.0;
    format!("{:02}:{:05.2}", minutes, rest)
}

/// Blank → `anonymous`; otherwise trimmed, uppercased, cut to `len` chars.
pub fn sanitize_name(raw: &str, len: usize, anonymous: &str) -> String {
    let name = if raw.trim().is_empty() { anonymous } else { raw };
    name.trim().to_uppercase().chars().take(len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::{load_scores, MemoryStore};
    use crate::localization::{Language, LocalizationDatabase, LocalizationEntry};

    #[test]
    fn clock_runs_until_paused() {
        let mut s = GameSession::default();
        s.tick(1.0);
        s.toggle_pause();
        s.tick(5.0);
        assert_eq!(s.elapsed(), 1.0);
        assert_eq!(s.time_scale(), 0.0);
        s.resume();
        s.tick(0.5);
        assert_eq!(s.elapsed(), 1.5);
        assert_eq!(s.time_scale(), 1.0);
    }

    #[test]
    fn first_finish_wins() {
        let mut s = GameSession::default();
        assert!(s.finish(false, 12.0));
        assert!(!s.finish(true, 99.0));
        assert_eq!(
            s.result(),
            Some(RaceResult {
                success: false,
                elapsed_seconds: 12.0
            })
        );
    }

    #[test]
    fn finish_freezes_time_and_pause() {
        let mut s = GameSession::default();
        s.tick(3.0);
        s.report_race_result(true, 2.5);
        assert!(!s.is_running());
        assert_eq!(s.time_scale(), 0.0);
        s.toggle_pause();
        assert!(s.is_paused(), "pause is locked after finish");
        s.tick(10.0);
        assert_eq!(s.elapsed(), 3.0);
    }

    #[test]
    fn exit_finish_uses_session_clock() {
        let mut s = GameSession::default();
        s.tick(4.25);
        assert!(s.finish_at_exit());
        assert_eq!(s.result().unwrap().elapsed_seconds, 4.25);
        assert!(s.result().unwrap().success);
    }

    #[test]
    fn finish_text_fallbacks() {
        let loc = Localizer::empty();
        let mut s = GameSession::default();
        assert_eq!(s.finish_text(&loc), None);
        s.finish(true, 65.5);
        assert_eq!(s.finish_text(&loc).unwrap(), "FINISH\nTime: 01:05.50");

        let mut failed = GameSession::default();
        failed.finish(false, 3.0);
        assert_eq!(failed.finish_text(&loc).unwrap(), "FAILED\nTime: 00:03.00");
    }

    #[test]
    fn finish_text_localized() {
        let loc = Localizer::new(LocalizationDatabase {
            languages: vec![Language {
                name: "Deutsch".into(),
                entries: vec![
                    LocalizationEntry {
                        key: text_keys::FINISH_SUCCESS.into(),
                        value: "ZIEL".into(),
                    },
                    LocalizationEntry {
                        key: text_keys::FINISH_TIME.into(),
                        value: "Zeit: ".into(),
                    },
                ],
            }],
            default_language: 0,
        });
        let mut s = GameSession::default();
        s.finish(true, 1.0);
        assert_eq!(s.finish_text(&loc).unwrap(), "ZIEL\nZeit: 00:01.00");
    }

    #[test]
    fn formats_times() {
        assert_eq!(format_time(0.0), "00:00.00");
        assert_eq!(format_time(9.5), "00:09.50");
        assert_eq!(format_time(61.25), "01:01.25");
        assert_eq!(format_time(754.0), "12:34.00");
    }

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_name("  bob  ", 3, "???"), "BOB");
        assert_eq!(sanitize_name("alexander", 3, "???"), "ALE");
        assert_eq!(sanitize_name("   ", 3, "???"), "???");
        assert_eq!(sanitize_name("", 3, "???"), "???");
        assert_eq!(sanitize_name("jo", 3, "???"), "JO");
    }

    #[test]
    fn submit_saves_session_time() {
        let mut s = GameSession::default();
        s.tick(42.0);
        s.finish(true, 41.0);
        let mut store = MemoryStore::new();
        let (scene, board) = s.submit_score(Some("zed"), &mut store, 10);
        assert_eq!(scene, SceneRequest::Title);
        assert_eq!(board, vec![LeaderboardEntry::new("ZED", 42.0)]);
        assert_eq!(load_scores(&store), board);
    }

    #[test]
    fn submit_without_name_field_is_anonymous() {
        let s = GameSession::default();
        let mut store = MemoryStore::new();
        let (_, board) = s.submit_score(None, &mut store, 10);
        assert_eq!(board[0].name, "???");
    }

    #[test]
    fn scene_requests() {
        let s = GameSession::default();
        assert_eq!(s.restart(), SceneRequest::Restart);
        assert_eq!(s.exit_to_title(), SceneRequest::Title);
    }
}

//! Background music playlist.
//!
//! Only track sequencing lives here. Decoding and mixing belong to whatever
//! [`AudioOutput`] the host provides.

use rand::Rng;

use crate::config::PlaylistConfig;

/// The engine's music source.
pub trait AudioOutput {
    fn play(&mut self, track: usize);
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn is_playing(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    track_count: usize,
    current: usize,
    play_in_order: bool,
    loop_playlist: bool,
    muted: bool,
    stopped: bool,
    /// Set once a track has been handed to the output.
    loaded: bool,
}

impl Playlist {
    pub fn new(track_count: usize, cfg: &PlaylistConfig) -> Self {
        Self {
            track_count,
            current: 0,
            play_in_order: cfg.play_in_order,
            loop_playlist: cfg.loop_playlist,
            muted: false,
            stopped: false,
            loaded: false,
        }
    }

    /// Begin with the first track.
    pub fn start(&mut self, out: &mut impl AudioOutput) {
        if self.track_count == 0 {
            return;
        }
        self.current = 0;
        self.play_current(out);
    }

    /// Per-frame check: move on when the current track has ended.
    pub fn tick(&mut self, out: &mut impl AudioOutput, rng: &mut impl Rng) {
        if self.loaded && !self.muted && !self.stopped && !out.is_playing() {
            self.next(out, rng);
        }
    }

    pub fn next(&mut self, out: &mut impl AudioOutput, rng: &mut impl Rng) {
        if self.track_count == 0 {
            return;
        }
        if self.play_in_order {
            if self.current + 1 >= self.track_count {
                if !self.loop_playlist {
                    return;
                }
                self.current = 0;
            } else {
                self.current += 1;
            }
        } else {
            self.current = rng.gen_range(0..self.track_count);
        }
        self.play_current(out);
    }

    pub fn previous(&mut self, out: &mut impl AudioOutput) {
        if self.track_count == 0 {
            return;
        }
        self.current = match self.current {
            0 => self.track_count - 1,
            n => n - 1,
        };
        self.play_current(out);
    }

    pub fn toggle_mute(&mut self, out: &mut impl AudioOutput) {
        self.muted = !self.muted;
        if self.muted {
            out.pause();
        } else {
            out.resume();
        }
    }

    pub fn set_volume(&mut self, out: &mut impl AudioOutput, volume: f32) {
        out.set_volume(volume.clamp(0.0, 1.0));
    }

    /// Stop the music for good; `tick` will not restart it.
    pub fn stop(&mut self, out: &mut impl AudioOutput) {
        self.stopped = true;
        out.stop();
    }

    fn play_current(&mut self, out: &mut impl AudioOutput) {
        self.loaded = true;
        self.stopped = false;
        out.play(self.current);
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct FakeOutput {
        played: Vec<usize>,
        playing: bool,
        paused: bool,
        volume: f32,
    }

    impl AudioOutput for FakeOutput {
        fn play(&mut self, track: usize) {
            self.played.push(track);
            self.playing = true;
        }
        fn pause(&mut self) {
            self.paused = true;
            self.playing = false;
        }
        fn resume(&mut self) {
            self.paused = false;
            self.playing = true;
        }
        fn stop(&mut self) {
            self.playing = false;
        }
        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }
        fn is_playing(&self) -> bool {
            self.playing
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn plays_in_order_and_loops() {
        let mut out = FakeOutput::default();
        let mut list = Playlist::new(3, &PlaylistConfig::default());
        let mut rng = rng();
        list.start(&mut out);
        for _ in 0..3 {
            out.playing = false; // track ended
            list.tick(&mut out, &mut rng);
        }
        assert_eq!(out.played, vec![0, 1, 2, 0]);
    }

    #[test]
    fn stops_at_end_without_loop() {
        let cfg = PlaylistConfig {
            loop_playlist: false,
            ..PlaylistConfig::default()
        };
        let mut out = FakeOutput::default();
        let mut list = Playlist::new(2, &cfg);
        let mut rng = rng();
        list.start(&mut out);
        list.next(&mut out, &mut rng);
        list.next(&mut out, &mut rng);
        assert_eq!(out.played, vec![0, 1]);
        assert_eq!(list.current(), 1);
    }

    #[test]
    fn shuffle_stays_in_range() {
        let cfg = PlaylistConfig {
            play_in_order: false,
            ..PlaylistConfig::default()
        };
        let mut out = FakeOutput::default();
        let mut list = Playlist::new(4, &cfg);
        let mut rng = rng();
        for _ in 0..50 {
            list.next(&mut out, &mut rng);
        }
        assert_eq!(out.played.len(), 50);
        assert!(out.played.iter().all(|&t| t < 4));
    }

    #[test]
    fn previous_wraps_to_last() {
        let mut out = FakeOutput::default();
        let mut list = Playlist::new(3, &PlaylistConfig::default());
        list.start(&mut out);
        list.previous(&mut out);
        assert_eq!(list.current(), 2);
    }

    #[test]
    fn muted_player_does_not_advance() {
        let mut out = FakeOutput::default();
        let mut list = Playlist::new(3, &PlaylistConfig::default());
        let mut rng = rng();
        list.start(&mut out);
        list.toggle_mute(&mut out);
        assert!(list.is_muted());
        assert!(out.paused);
        list.tick(&mut out, &mut rng);
        assert_eq!(out.played, vec![0]);
        list.toggle_mute(&mut out);
        assert!(!list.is_muted());
        assert!(out.playing);
    }

    #[test]
    fn stop_is_sticky() {
        let mut out = FakeOutput::default();
        let mut list = Playlist::new(3, &PlaylistConfig::default());
        let mut rng = rng();
        list.start(&mut out);
        list.stop(&mut out);
        list.tick(&mut out, &mut rng);
        assert!(list.is_stopped());
        assert_eq!(out.played, vec![0]);
    }

    #[test]
    fn empty_playlist_is_silent() {
        let mut out = FakeOutput::default();
        let mut list = Playlist::new(0, &PlaylistConfig::default());
        let mut rng = rng();
        list.start(&mut out);
        list.next(&mut out, &mut rng);
        list.previous(&mut out);
        list.tick(&mut out, &mut rng);
        assert!(out.played.is_empty());
    }

    #[test]
    fn idle_before_start_does_not_play() {
        let mut out = FakeOutput::default();
        let mut list = Playlist::new(2, &PlaylistConfig::default());
        list.tick(&mut out, &mut rng());
        assert!(out.played.is_empty());
    }

    #[test]
    fn volume_is_clamped() {
        let mut out = FakeOutput::default();
        let mut list = Playlist::new(1, &PlaylistConfig::default());
        list.set_volume(&mut out, 1.7);
        assert_eq!(out.volume, 1.0);
    }
}

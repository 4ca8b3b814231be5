// Frame gate: decides, once per tick, whether the compositor runs and with
// which time. The clock comes from the host (ms since start); pausing just
// stops handing it out, so the picture freezes and later jumps forward.

use crate::config::Config;

#[derive(Default)]
pub struct Driver {
    last_time: Option<f64>,
    ticks: u64,
    drawn: u64,
}

impl Driver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time to draw this tick with, or `None` while `animate` is off.
    /// Never hands out a time smaller than the previous one.
    pub fn tick(&mut self, config: &Config, now_ms: f64) -> Option<f64> {
        self.ticks += 1;
        if !config.animate {
            return None;
        }
        let time = match self.last_time {
            Some(last) if now_ms < last => last,
            _ => now_ms,
        };
        self.last_time = Some(time);
        self.drawn += 1;
        Some(time)
    }

    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }

    /// (ticks seen, ticks that produced a frame)
    pub fn counts(&self) -> (u64, u64) {
        (self.ticks, self.drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_ticks_draw_nothing() {
        let mut d = Driver::new();
        let config = Config { animate: false, ..Config::default() };
        for t in 0..10 {
            assert_eq!(d.tick(&config, t as f64 * 16.0), None);
        }
        assert_eq!(d.counts(), (10, 0));
        assert_eq!(d.last_time(), None);
    }

    #[test]
    fn toggle_takes_effect_next_tick() {
        let mut d = Driver::new();
        let mut config = Config::default();
        assert_eq!(d.tick(&config, 0.0), Some(0.0));
        config.animate = false;
        assert_eq!(d.tick(&config, 16.0), None);
        config.animate = true;
        assert_eq!(d.tick(&config, 32.0), Some(32.0));
    }

    #[test]
    fn resume_never_goes_back_in_time() {
        let mut d = Driver::new();
        let mut config = Config::default();
        d.tick(&config, 100.0);
        config.animate = false;
        for t in [116.0, 132.0, 148.0] {
            d.tick(&config, t);
        }
        config.animate = true;
        let resumed = d.tick(&config, 164.0).unwrap();
        assert!(resumed >= 100.0);
        assert_eq!(resumed, 164.0);

        // A clock that steps backwards is held at the last value.
        assert_eq!(d.tick(&config, 50.0), Some(164.0));
    }
}

//! At most one narration playing at a time.

use std::time::Duration;

use events::{Event, EventBus};
use lens_core::AudioBrief;
use tracing::debug;

/// Something that can be stopped once started
pub trait Playback: Send {
    fn duration(&self) -> Duration;

    fn stop(&mut self);
}

impl Playback for Box<dyn Playback> {
    fn duration(&self) -> Duration {
        (**self).duration()
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}

/// Audio brief loaded for playback without an output device
#[derive(Debug)]
pub struct Clip {
    brief: AudioBrief,
    stopped: bool,
}

impl Clip {
    pub fn new(brief: AudioBrief) -> Self {
        Self {
            brief,
            stopped: false,
        }
    }

    pub fn brief(&self) -> &AudioBrief {
        &self.brief
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl Playback for Clip {
    fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.brief.duration_secs())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

/// Holds the active playback; starting another stops it first
pub struct AudioSlot<P: Playback> {
    current: Option<P>,
    event_bus: Option<EventBus>,
}

impl<P: Playback> AudioSlot<P> {
    pub fn new(event_bus: Option<EventBus>) -> Self {
        Self {
            current: None,
            event_bus,
        }
    }

    pub fn start(&mut self, playback: P) {
        self.stop();

        let duration_ms = playback.duration().as_millis() as u64;
        debug!(duration_ms, "Audio playback started");
        self.publish(Event::AudioStarted { duration_ms });
        self.current = Some(playback);
    }

    /// Stops the active playback; returns whether anything was playing
    pub fn stop(&mut self) -> bool {
        let Some(mut playback) = self.current.take() else {
            return false;
        };

        playback.stop();
        debug!("Audio playback stopped");
        self.publish(Event::AudioStopped);
        true
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    fn publish(&self, event: Event) {
        if let Some(ref bus) = self.event_bus {
            bus.emit(event);
        }
    }
}

impl<P: Playback> Drop for AudioSlot<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

//! Single-slot guards that keep one call per feature in flight.
//!
//! A caller acquires a [`FeaturePermit`] before contacting the backend and
//! holds it for the duration of the call. The slot is released when the
//! permit is dropped, even if the call panics or is cancelled.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use events::{Event, EventBus};
use tracing::{debug, warn};

/// Independently guarded generation feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Research,
    Infographic,
    Edit,
    Risk,
    Board,
    BoardChat,
    StrategyMap,
    Pitch,
    Competitors,
    Financials,
    Mockup,
    AudioBrief,
    Optimize,
}

impl Feature {
    pub const ALL: [Self; 13] = [
        Self::Research,
        Self::Infographic,
        Self::Edit,
        Self::Risk,
        Self::Board,
        Self::BoardChat,
        Self::StrategyMap,
        Self::Pitch,
        Self::Competitors,
        Self::Financials,
        Self::Mockup,
        Self::AudioBrief,
        Self::Optimize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Infographic => "infographic",
            Self::Edit => "edit",
            Self::Risk => "risk",
            Self::Board => "board",
            Self::BoardChat => "board_chat",
            Self::StrategyMap => "strategy_map",
            Self::Pitch => "pitch",
            Self::Competitors => "competitors",
            Self::Financials => "financials",
            Self::Mockup => "mockup",
            Self::AudioBrief => "audio_brief",
            Self::Optimize => "optimize",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Busy flag for one feature
#[derive(Debug)]
pub struct FeatureGuard {
    feature: Feature,
    busy: AtomicBool,
}

impl FeatureGuard {
    pub fn new(feature: Feature) -> Self {
        Self {
            feature,
            busy: AtomicBool::new(false),
        }
    }

    pub fn feature(&self) -> Feature {
        self.feature
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claims the slot for a call made under `generation`.
    ///
    /// Returns `None` when another call already holds it; a skip event is
    /// published in that case.
    pub fn try_acquire(
        self: &Arc<Self>,
        generation: u64,
        event_bus: Option<EventBus>,
    ) -> Option<FeaturePermit> {
        self.try_acquire_with(event_bus, || generation)
    }

    /// Like [`FeatureGuard::try_acquire`], but the generation is produced
    /// only once the slot is held.
    ///
    /// `generation` is not called when the feature is busy, so a rejected
    /// call leaves no trace beyond the skip event.
    pub fn try_acquire_with(
        self: &Arc<Self>,
        event_bus: Option<EventBus>,
        generation: impl FnOnce() -> u64,
    ) -> Option<FeaturePermit> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(feature = %self.feature, "Feature already in flight, skipping");
            if let Some(ref bus) = event_bus {
                bus.emit(Event::FeatureSkipped {
                    feature: self.feature.as_str().to_string(),
                });
            }
            return None;
        }

        let generation = generation();
        debug!(feature = %self.feature, generation, "Feature slot acquired");
        if let Some(ref bus) = event_bus {
            bus.emit(Event::FeatureStarted {
                feature: self.feature.as_str().to_string(),
                generation,
            });
        }

        Some(FeaturePermit {
            guard: Arc::clone(self),
            generation,
            event_bus,
            finished: false,
        })
    }
}

/// Holds a feature slot until dropped.
///
/// Dropping an unfinished permit publishes a failure so subscribers never
/// see a feature stuck in its loading state.
pub struct FeaturePermit {
    guard: Arc<FeatureGuard>,
    generation: u64,
    event_bus: Option<EventBus>,
    finished: bool,
}

impl FeaturePermit {
    pub fn feature(&self) -> Feature {
        self.guard.feature
    }

    /// Generation the call was started under
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn mark_completed(&mut self) {
        debug!(feature = %self.feature(), "Feature completed");
        self.publish(Event::FeatureCompleted {
            feature: self.feature().as_str().to_string(),
            generation: self.generation,
        });
        self.finished = true;
    }

    pub fn mark_failed(&mut self, message: &str, authorization: bool) {
        debug!(feature = %self.feature(), error = %message, "Feature failed");
        self.publish(Event::FeatureFailed {
            feature: self.feature().as_str().to_string(),
            message: message.to_string(),
            authorization,
        });
        self.finished = true;
    }

    /// The result arrived after a newer topic started
    pub fn mark_superseded(&mut self) {
        debug!(
            feature = %self.feature(),
            generation = self.generation,
            "Feature result superseded"
        );
        self.publish(Event::FeatureSuperseded {
            feature: self.feature().as_str().to_string(),
            generation: self.generation,
        });
        self.finished = true;
    }

    fn publish(&self, event: Event) {
        if let Some(ref bus) = self.event_bus {
            bus.emit(event);
        }
    }
}

impl Drop for FeaturePermit {
    fn drop(&mut self) {
        if !self.finished {
            warn!(
                feature = %self.feature(),
                generation = self.generation,
                "Feature permit dropped without completion"
            );
            self.publish(Event::FeatureFailed {
                feature: self.feature().as_str().to_string(),
                message: "Feature call terminated unexpectedly".to_string(),
                authorization: false,
            });
        }
        self.guard.busy.store(false, Ordering::Release);
    }
}

/// One guard per [`Feature`]
#[derive(Debug)]
pub struct FeatureGuards {
    guards: Vec<Arc<FeatureGuard>>,
}

impl FeatureGuards {
    pub fn new() -> Self {
        Self {
            guards: Feature::ALL
                .iter()
                .map(|&f| Arc::new(FeatureGuard::new(f)))
                .collect(),
        }
    }

    pub fn get(&self, feature: Feature) -> Arc<FeatureGuard> {
        Arc::clone(&self.guards[feature.index()])
    }

    pub fn is_busy(&self, feature: Feature) -> bool {
        self.guards[feature.index()].is_busy()
    }

    /// Features with a call in flight
    pub fn busy(&self) -> Vec<Feature> {
        self.guards
            .iter()
            .filter(|g| g.is_busy())
            .map(|g| g.feature)
            .collect()
    }
}

impl Default for FeatureGuards {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_is_single_slot() {
        let guard = Arc::new(FeatureGuard::new(Feature::Risk));

        let permit = guard.try_acquire(1, None);
        assert!(permit.is_some());
        assert!(guard.is_busy());
        assert!(guard.try_acquire(1, None).is_none());

        drop(permit);
        assert!(!guard.is_busy());
        assert!(guard.try_acquire(2, None).is_some());
    }

    #[test]
    fn test_permit_lifecycle_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let guard = Arc::new(FeatureGuard::new(Feature::Pitch));

        let mut permit = guard.try_acquire(3, Some(bus.clone())).unwrap();
        assert!(guard.try_acquire(3, Some(bus.clone())).is_none());
        permit.mark_completed();
        drop(permit);

        let kinds: Vec<Event> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.event)
            .collect();
        assert!(matches!(&kinds[0], Event::FeatureStarted { feature, generation: 3 } if feature == "pitch"));
        assert!(matches!(&kinds[1], Event::FeatureSkipped { .. }));
        assert!(matches!(&kinds[2], Event::FeatureCompleted { .. }));
        assert_eq!(kinds.len(), 3);
    }

    #[test]
    fn test_busy_guard_never_produces_a_generation() {
        let guard = Arc::new(FeatureGuard::new(Feature::Research));
        let bumps = std::cell::Cell::new(0u64);
        let bump = || {
            bumps.set(bumps.get() + 1);
            bumps.get()
        };

        let permit = guard.try_acquire_with(None, bump).unwrap();
        assert_eq!(permit.generation(), 1);

        assert!(guard.try_acquire_with(None, bump).is_none());
        assert_eq!(bumps.get(), 1);
    }

    #[test]
    fn test_unfinished_permit_reports_failure() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let guard = Arc::new(FeatureGuard::new(Feature::Mockup));

        drop(guard.try_acquire(1, Some(bus.clone())));

        let _started = rx.try_recv().unwrap();
        let failed = rx.try_recv().unwrap();
        assert!(matches!(
            failed.event,
            Event::FeatureFailed { authorization: false, .. }
        ));
        assert!(!guard.is_busy());
    }

    #[test]
    fn test_table_covers_every_feature() {
        let guards = FeatureGuards::new();
        for feature in Feature::ALL {
            assert_eq!(guards.get(feature).feature(), feature);
        }

        let _permit = guards.get(Feature::Board).try_acquire(0, None);
        assert_eq!(guards.busy(), vec![Feature::Board]);
        assert!(!guards.is_busy(Feature::BoardChat));
    }
}

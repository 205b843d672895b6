//! Facade the shell drives: one guarded entry point per feature.
//!
//! Every call runs under a [`FeatureGuard`](crate::resources::FeatureGuard)
//! and is tagged with the topic generation it started under. Starting a new
//! topic bumps the generation, so results of older calls come back as
//! [`Dispatch::Superseded`].

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use events::{Event, EventBus};
use gemini::{ModelGateway, DEFAULT_VOICE};
use lens_core::{
    AudioBrief, BoardMeeting, BoardMessage, BusinessStage, CompetitorAnalysis, EncodedImage,
    FinancialModel, GeneratedImage, MockupType, PitchKit, ProductMockup, RequestConfiguration,
    ResearchResult, RiskAnalysis, StrategyMapData,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::board_room::BoardRoom;
use crate::dispatch::Dispatch;
use crate::error::Result;
use crate::layout::{JitterSource, RandJitter};
use crate::resources::{AudioSlot, Feature, FeatureGuards, FeaturePermit, Playback};
use crate::services;

pub type SharedGeneration = Arc<AtomicU64>;

/// Research plus the infographic rendered from it
#[derive(Debug, Clone)]
pub struct TopicArtifacts {
    pub research: ResearchResult,
    /// Outcome of the infographic call.
    ///
    /// [`Dispatch::InFlight`] when an earlier infographic was still
    /// rendering; `None` when research was superseded and no image was
    /// requested.
    pub image: Option<Dispatch<GeneratedImage>>,
}

impl TopicArtifacts {
    /// The rendered infographic, if this topic produced one
    pub fn infographic(&self) -> Option<&GeneratedImage> {
        match self.image {
            Some(Dispatch::Completed(ref image)) => Some(image),
            _ => None,
        }
    }
}

pub struct Studio<G: ModelGateway> {
    gateway: G,
    guards: FeatureGuards,
    generation: SharedGeneration,
    event_bus: Option<EventBus>,
    board: BoardRoom,
    jitter: Mutex<Box<dyn JitterSource>>,
    audio: Mutex<AudioSlot<Box<dyn Playback>>>,
    voice: String,
}

impl<G: ModelGateway> Studio<G> {
    pub fn new(gateway: G) -> Self {
        let guards = FeatureGuards::new();
        Self {
            board: BoardRoom::new(guards.get(Feature::BoardChat), None),
            gateway,
            guards,
            generation: Arc::new(AtomicU64::new(0)),
            event_bus: None,
            jitter: Mutex::new(Box::new(RandJitter::new())),
            audio: Mutex::new(AudioSlot::new(None)),
            voice: DEFAULT_VOICE.to_string(),
        }
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.board = BoardRoom::new(
            self.guards.get(Feature::BoardChat),
            Some(event_bus.clone()),
        );
        self.audio = Mutex::new(AudioSlot::new(Some(event_bus.clone())));
        self.event_bus = Some(event_bus);
        self
    }

    pub fn with_jitter(mut self, jitter: impl JitterSource + 'static) -> Self {
        self.jitter = Mutex::new(Box::new(jitter));
        self
    }

    /// Narrator voice for audio briefs
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn guards(&self) -> &FeatureGuards {
        &self.guards
    }

    pub fn board(&self) -> &BoardRoom {
        &self.board
    }

    pub fn event_bus(&self) -> Option<&EventBus> {
        self.event_bus.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Marks every call in flight as stale
    pub fn invalidate(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "Generation bumped");
        generation
    }

    /// Runs `call` under the feature's guard.
    ///
    /// `call` is only polled once the slot is acquired, so a busy feature
    /// never reaches the backend.
    async fn run<T, F>(&self, feature: Feature, call: F) -> Result<Dispatch<T>>
    where
        F: Future<Output = Result<T>>,
    {
        let generation = self.generation();
        match self
            .guards
            .get(feature)
            .try_acquire(generation, self.event_bus.clone())
        {
            Some(permit) => self.finish(permit, call).await,
            None => Ok(Dispatch::InFlight),
        }
    }

    /// Awaits `call` and settles `permit` against the current generation
    async fn finish<T, F>(&self, mut permit: FeaturePermit, call: F) -> Result<Dispatch<T>>
    where
        F: Future<Output = Result<T>>,
    {
        match call.await {
            Ok(value) if self.is_current(permit.generation()) => {
                permit.mark_completed();
                Ok(Dispatch::Completed(value))
            }
            Ok(value) => {
                permit.mark_superseded();
                Ok(Dispatch::Superseded(value))
            }
            Err(e) => {
                permit.mark_failed(&e.to_string(), e.is_authorization());
                Err(e)
            }
        }
    }

    /// Starts a new topic: research, then the infographic built from it.
    ///
    /// While a topic is still being researched a second start is a no-op
    /// and returns [`Dispatch::InFlight`]. Otherwise the generation is
    /// bumped, narration stops and the board is dismissed before research
    /// begins.
    pub async fn start_topic(
        &self,
        config: &RequestConfiguration,
    ) -> Result<Dispatch<TopicArtifacts>> {
        config.validate()?;

        let Some(permit) = self
            .guards
            .get(Feature::Research)
            .try_acquire_with(self.event_bus.clone(), || self.invalidate())
        else {
            debug!(topic = %config.topic(), "Topic already being researched, ignoring");
            return Ok(Dispatch::InFlight);
        };

        let generation = permit.generation();
        if let Some(ref bus) = self.event_bus {
            bus.emit(Event::TopicStarted {
                generation,
                topic: config.topic().to_string(),
            });
        }
        self.audio.lock().await.stop();
        self.board.clear().await;
        info!(generation, topic = %config.topic(), "Topic started");

        let research = self
            .finish(permit, services::research_topic(&self.gateway, config))
            .await?;
        let research = match research {
            Dispatch::Completed(research) => research,
            Dispatch::Superseded(research) => {
                return Ok(Dispatch::Superseded(TopicArtifacts {
                    research,
                    image: None,
                }))
            }
            Dispatch::InFlight => return Ok(Dispatch::InFlight),
        };

        let image = self.infographic(&research.image_prompt, config).await?;
        let superseded = image.is_superseded();
        let artifacts = TopicArtifacts {
            research,
            image: Some(image),
        };
        Ok(if superseded {
            Dispatch::Superseded(artifacts)
        } else {
            Dispatch::Completed(artifacts)
        })
    }

    pub async fn research(&self, config: &RequestConfiguration) -> Result<Dispatch<ResearchResult>> {
        self.run(Feature::Research, services::research_topic(&self.gateway, config))
            .await
    }

    pub async fn infographic(
        &self,
        image_prompt: &str,
        config: &RequestConfiguration,
    ) -> Result<Dispatch<GeneratedImage>> {
        self.run(
            Feature::Infographic,
            services::generate_infographic(&self.gateway, image_prompt, config),
        )
        .await
    }

    pub async fn edit_infographic(
        &self,
        source: &GeneratedImage,
        instruction: &str,
    ) -> Result<Dispatch<GeneratedImage>> {
        self.run(
            Feature::Edit,
            services::edit_infographic(&self.gateway, source, instruction),
        )
        .await
    }

    pub async fn edit_image(
        &self,
        data_url: &str,
        instruction: &str,
    ) -> Result<Dispatch<EncodedImage>> {
        self.run(
            Feature::Edit,
            services::edit_image_data_url(&self.gateway, data_url, instruction),
        )
        .await
    }

    pub async fn optimize(&self, input: &str, stage: BusinessStage) -> Result<Dispatch<String>> {
        self.run(
            Feature::Optimize,
            services::optimize_prompt(&self.gateway, input, stage),
        )
        .await
    }

    pub async fn risk(&self, config: &RequestConfiguration) -> Result<Dispatch<RiskAnalysis>> {
        self.run(Feature::Risk, services::analyze_risk(&self.gateway, config))
            .await
    }

    /// Convenes a new board, replacing the current meeting
    pub async fn convene_board(
        &self,
        config: &RequestConfiguration,
    ) -> Result<Dispatch<BoardMeeting>> {
        let dispatch = self
            .run(Feature::Board, services::convene_board(&self.gateway, config))
            .await?;
        if let Dispatch::Completed(ref meeting) = dispatch {
            self.board.install(meeting.clone()).await;
        }
        Ok(dispatch)
    }

    pub async fn ask_board(&self, question: &str) -> Result<Dispatch<Vec<BoardMessage>>> {
        self.board
            .ask(&self.gateway, question, self.generation())
            .await
    }

    pub async fn strategy_map(
        &self,
        config: &RequestConfiguration,
    ) -> Result<Dispatch<StrategyMapData>> {
        self.run(Feature::StrategyMap, async {
            let mut jitter = self.jitter.lock().await;
            services::generate_strategy_map(&self.gateway, config, &mut **jitter).await
        })
        .await
    }

    pub async fn pitch_kit(&self, config: &RequestConfiguration) -> Result<Dispatch<PitchKit>> {
        self.run(Feature::Pitch, services::generate_pitch_kit(&self.gateway, config))
            .await
    }

    pub async fn competitors(
        &self,
        config: &RequestConfiguration,
    ) -> Result<Dispatch<CompetitorAnalysis>> {
        self.run(
            Feature::Competitors,
            services::analyze_competitors(&self.gateway, config),
        )
        .await
    }

    pub async fn financial_model(
        &self,
        config: &RequestConfiguration,
    ) -> Result<Dispatch<FinancialModel>> {
        self.run(
            Feature::Financials,
            services::generate_financial_model(&self.gateway, config),
        )
        .await
    }

    pub async fn product_mockup(
        &self,
        config: &RequestConfiguration,
        mockup: MockupType,
    ) -> Result<Dispatch<ProductMockup>> {
        self.run(
            Feature::Mockup,
            services::generate_product_mockup(&self.gateway, config, mockup),
        )
        .await
    }

    pub async fn audio_brief(
        &self,
        topic: &str,
        research: &ResearchResult,
    ) -> Result<Dispatch<AudioBrief>> {
        self.run(
            Feature::AudioBrief,
            services::generate_audio_brief(&self.gateway, topic, research, &self.voice),
        )
        .await
    }

    /// Starts playback, stopping whatever was playing
    pub async fn play(&self, playback: Box<dyn Playback>) {
        self.audio.lock().await.start(playback);
    }

    pub async fn stop_audio(&self) -> bool {
        self.audio.lock().await.stop()
    }

    pub async fn is_playing(&self) -> bool {
        self.audio.lock().await.is_playing()
    }
}

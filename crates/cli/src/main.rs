mod config;
mod output;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use events::{Event, EventBus};
use gemini::{CredentialSource, EnvCredentials, GeminiGateway, StaticCredentials};
use lens_core::{
    BusinessFocus, BusinessStage, EncodedImage, FinancialModel, MockupType, Profile,
    RequestConfiguration, RiskAnalysis, VisualStyle,
};
use orchestrator::{Dispatch, LensStore, OrchestratorError, StrategyReport, Studio};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LensConfig;
use crate::output::{
    bullets, field, heading, saved, Artifacts, SavedResearch, FINANCIALS_FILE, RESEARCH_FILE,
    RISK_FILE,
};

const ACCESS_DENIED: &str = "Access denied. The selected API key does not have access to the required models. Please select a project with billing enabled.";
const GENERIC_FAILURE: &str = "Something went wrong while talking to the model. Please try again.";

#[derive(Parser)]
#[command(name = "solopreneur-lens")]
#[command(about = "AI business strategy visualization for solo founders", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project directory holding `.solopreneur-lens/`
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Directory for generated artifacts (overrides the config file)
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Args)]
struct TopicArgs {
    /// Business idea to analyze
    topic: String,

    #[arg(long, value_parser = parse_stage)]
    stage: Option<BusinessStage>,

    #[arg(long, value_parser = parse_style)]
    style: Option<VisualStyle>,

    #[arg(long, value_parser = parse_focus)]
    focus: Option<BusinessFocus>,
}

#[derive(Subcommand)]
enum Commands {
    /// Market research and infographic for a topic
    Research(TopicArgs),
    /// Rewrite a rough idea into a sharper description
    Optimize {
        input: String,
        #[arg(long, value_parser = parse_stage)]
        stage: Option<BusinessStage>,
    },
    /// Fatal flaws, mitigations and a viability score
    Risk(TopicArgs),
    /// Convene the advisory board and optionally ask follow-up questions
    Board {
        #[command(flatten)]
        topic: TopicArgs,
        /// Question for the board; repeat to ask several in turn
        #[arg(long = "ask")]
        questions: Vec<String>,
    },
    /// Strategy map of the business, saved for the map editor
    Map(TopicArgs),
    /// Launch copy
    Pitch(TopicArgs),
    /// Three real competitors and the market gap
    Competitors(TopicArgs),
    /// Napkin-math unit economics
    Financials(TopicArgs),
    /// Product visualization
    Mockup {
        #[command(flatten)]
        topic: TopicArgs,
        #[arg(long, value_parser = parse_mockup, default_value = "Mobile App")]
        kind: MockupType,
    },
    /// Apply a natural-language edit to an image file
    Edit { image: PathBuf, instruction: String },
    /// Narrated executive summary of the latest research
    Audio(TopicArgs),
    /// Show or update the saved stage/style/focus preferences
    Profile {
        #[arg(long, value_parser = parse_stage)]
        stage: Option<BusinessStage>,
        #[arg(long, value_parser = parse_style)]
        style: Option<VisualStyle>,
        #[arg(long, value_parser = parse_focus)]
        focus: Option<BusinessFocus>,
    },
    /// Markdown strategy report from saved artifacts
    Report,
}

fn parse_stage(s: &str) -> std::result::Result<BusinessStage, String> {
    BusinessStage::parse(s).ok_or_else(|| format!("unknown stage '{}'", s))
}

fn parse_style(s: &str) -> std::result::Result<VisualStyle, String> {
    VisualStyle::parse(s).ok_or_else(|| format!("unknown style '{}'", s))
}

fn parse_focus(s: &str) -> std::result::Result<BusinessFocus, String> {
    BusinessFocus::parse(s).ok_or_else(|| format!("unknown focus '{}'", s))
}

fn parse_mockup(s: &str) -> std::result::Result<MockupType, String> {
    MockupType::parse(s).ok_or_else(|| format!("unknown mockup type '{}'", s))
}

/// Everything a command needs
struct Session {
    studio: Studio<GeminiGateway>,
    store: LensStore,
    artifacts: Artifacts,
    profile: Profile,
}

impl TopicArgs {
    fn configuration(&self, profile: Profile) -> RequestConfiguration {
        RequestConfiguration {
            topic: self.topic.clone(),
            stage: self.stage.unwrap_or(profile.stage),
            style: self.style.unwrap_or(profile.style),
            focus: self.focus.unwrap_or(profile.focus),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<OrchestratorError>() {
            Some(err) if err.is_authorization() => eprintln!("{}", ACCESS_DENIED.red()),
            Some(err) if err.kind().is_some() => {
                debug!(error = %err, "Backend call failed");
                eprintln!("{} ({})", GENERIC_FAILURE.red(), err);
            }
            _ => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let config = LensConfig::read(&root).await;
    let store = LensStore::new(&root);
    let profile = store.load_profile().await?.unwrap_or_default();

    // Commands that never reach the backend
    match &cli.command {
        Commands::Profile {
            stage,
            style,
            focus,
        } => return update_profile(&store, profile, *stage, *style, *focus).await,
        Commands::Report => {
            let artifacts = Artifacts::open(out_dir(&cli.out, &config, &root)).await?;
            return report(&artifacts).await;
        }
        _ => {}
    }

    let credentials: Arc<dyn CredentialSource> = match cli.api_key {
        Some(ref key) => Arc::new(StaticCredentials::new(key.clone())),
        None => Arc::new(EnvCredentials::new()),
    };
    if credentials.api_key().is_none() {
        bail!("No API key found. Set GEMINI_API_KEY (or API_KEY) or pass --api-key.");
    }

    let gateway = GeminiGateway::new(config.gemini.clone(), credentials)
        .map_err(OrchestratorError::from)?;
    let bus = EventBus::new();
    spawn_event_logger(&bus);

    let session = Session {
        studio: Studio::new(gateway)
            .with_event_bus(bus)
            .with_voice(config.gemini.voice.clone()),
        store,
        artifacts: Artifacts::open(out_dir(&cli.out, &config, &root)).await?,
        profile,
    };

    match cli.command {
        Commands::Research(args) => research(&session, &args).await,
        Commands::Optimize { input, stage } => {
            let stage = stage.unwrap_or(session.profile.stage);
            let optimized = settle(session.studio.optimize(&input, stage).await?)?;
            println!("{}", optimized);
            Ok(())
        }
        Commands::Risk(args) => risk(&session, &args).await,
        Commands::Board { topic, questions } => board(&session, &topic, &questions).await,
        Commands::Map(args) => strategy_map(&session, &args).await,
        Commands::Pitch(args) => pitch(&session, &args).await,
        Commands::Competitors(args) => competitors(&session, &args).await,
        Commands::Financials(args) => financials(&session, &args).await,
        Commands::Mockup { topic, kind } => mockup(&session, &topic, kind).await,
        Commands::Edit { image, instruction } => edit(&session, &image, &instruction).await,
        Commands::Audio(args) => audio(&session, &args).await,
        Commands::Profile { .. } | Commands::Report => Ok(()),
    }
}

fn out_dir(flag: &Option<PathBuf>, config: &LensConfig, root: &Path) -> PathBuf {
    flag.clone().unwrap_or_else(|| config.output_dir(root))
}

/// A one-shot CLI never races itself, so only completed results are expected
fn settle<T>(dispatch: Dispatch<T>) -> Result<T> {
    match dispatch {
        Dispatch::Completed(value) => Ok(value),
        Dispatch::InFlight => Err(anyhow!("Another request for this feature is still running")),
        Dispatch::Superseded(_) => Err(anyhow!("The topic changed before the result arrived")),
    }
}

fn spawn_event_logger(bus: &EventBus) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        while let Ok(envelope) = rx.recv().await {
            match envelope.event {
                Event::FeatureFailed {
                    feature, message, ..
                } => debug!(feature = %feature, error = %message, "Feature failed"),
                event => debug!(event = ?event, "Event"),
            }
        }
    });
}

async fn research(session: &Session, args: &TopicArgs) -> Result<()> {
    let config = args.configuration(session.profile);
    let generated = settle(session.studio.start_topic(&config).await?)?;
    let research = &generated.research;

    heading(&format!("Research: {}", config.topic()));
    field("Trend", format!("{} ({})", research.trend.label, research.trend.value));
    heading("Key Facts");
    bullets(&research.facts);
    heading("Strengths");
    bullets(&research.insights.swot.strengths);
    heading("Opportunities");
    bullets(&research.insights.swot.opportunities);
    heading("Pivots");
    bullets(&research.insights.pivots);
    if !research.search_results.is_empty() {
        heading("Sources");
        for source in &research.search_results {
            println!("  • {} {}", source.title, source.url.dimmed());
        }
    }

    let path = session
        .artifacts
        .write_json(
            RESEARCH_FILE,
            &SavedResearch {
                config: config.clone(),
                research: generated.research.clone(),
            },
        )
        .await?;
    saved(&path);

    match generated.infographic() {
        Some(image) => {
            let name = format!("infographic-{}.{}", image.timestamp, image.data.extension());
            saved(&session.artifacts.write_bytes(&name, &image.data.bytes).await?);
        }
        None => println!("{}", "Infographic is still rendering from an earlier request.".dimmed()),
    }
    Ok(())
}

async fn risk(session: &Session, args: &TopicArgs) -> Result<()> {
    let config = args.configuration(session.profile);
    let risk = settle(session.studio.risk(&config).await?)?;

    heading(risk.tier().headline());
    field("Viability Score", format!("{}/100", risk.viability_score));
    heading("Fatal Flaws");
    bullets(&risk.fatal_flaws);
    heading("Mitigations");
    bullets(&risk.mitigations);

    saved(&session.artifacts.write_json(RISK_FILE, &risk).await?);
    Ok(())
}

async fn board(session: &Session, args: &TopicArgs, questions: &[String]) -> Result<()> {
    let config = args.configuration(session.profile);
    let meeting = settle(session.studio.convene_board(&config).await?)?;

    heading("Board Meeting");
    for advisor in &meeting.advisors {
        println!(
            "  {} ({}) - {}",
            advisor.name.bold(),
            advisor.role.as_str(),
            advisor.verdict.as_str()
        );
        println!("    Advice:  {}", advisor.advice);
        println!("    Concern: {}", advisor.concern);
    }
    field("Synthesis", &meeting.synthesis);

    for question in questions {
        println!();
        println!("{} {}", "You:".bold(), question);
        for reply in settle(session.studio.ask_board(question).await?)? {
            println!("{} {}", format!("{}:", reply.name).bold(), reply.text);
        }
    }

    let meeting = session.studio.board().meeting().await.unwrap_or(meeting);
    saved(&session.artifacts.write_json("board.json", &meeting).await?);
    Ok(())
}

async fn strategy_map(session: &Session, args: &TopicArgs) -> Result<()> {
    let config = args.configuration(session.profile);
    let map = settle(session.studio.strategy_map(&config).await?)?;

    heading("Strategy Map");
    for node in &map.nodes {
        println!(
            "  [{}] {} ({:.0}, {:.0})",
            node.category.as_str(),
            node.label,
            node.x,
            node.y
        );
    }
    for edge in &map.edges {
        println!(
            "  {} -> {} {}",
            edge.from,
            edge.to,
            edge.label.as_deref().unwrap_or("").dimmed()
        );
    }

    session.store.save_strategy_map(&map).await?;
    saved(&session.artifacts.write_json("strategy_map.json", &map).await?);
    Ok(())
}

async fn pitch(session: &Session, args: &TopicArgs) -> Result<()> {
    let config = args.configuration(session.profile);
    let kit = settle(session.studio.pitch_kit(&config).await?)?;

    heading("Pitch Kit");
    field("One-liner", &kit.one_liner);
    field("Value Proposition", &kit.value_proposition);
    field("Elevator Pitch", &kit.elevator_pitch);
    heading("Cold Email");
    println!("{}", kit.email_template);
    heading("Social Post");
    println!("{}", kit.social_post);

    saved(&session.artifacts.write_json("pitch.json", &kit).await?);
    Ok(())
}

async fn competitors(session: &Session, args: &TopicArgs) -> Result<()> {
    let config = args.configuration(session.profile);
    let analysis = settle(session.studio.competitors(&config).await?)?;

    heading("Competitors");
    for competitor in &analysis.competitors {
        println!("  {} - {}", competitor.name.bold(), competitor.description);
        println!("    Their edge: {}", competitor.their_edge);
        println!("    Your edge:  {}", competitor.your_edge);
    }
    field("Market Gap", &analysis.market_gap);

    saved(&session.artifacts.write_json("competitors.json", &analysis).await?);
    Ok(())
}

async fn financials(session: &Session, args: &TopicArgs) -> Result<()> {
    let config = args.configuration(session.profile);
    let model = settle(session.studio.financial_model(&config).await?)?;
    let symbol = model.currency.symbol();

    heading("Financial Model");
    field("Pricing", &model.pricing_model);
    field("Price", format!("{}{}", symbol, model.metrics.price));
    field("CAC", format!("{}{}", symbol, model.metrics.cac));
    field("COGS", format!("{}{}", symbol, model.metrics.cogs));
    field("Users (month 12)", model.metrics.users);
    field("Insight", &model.insight);

    saved(&session.artifacts.write_json(FINANCIALS_FILE, &model).await?);
    Ok(())
}

async fn mockup(session: &Session, args: &TopicArgs, kind: MockupType) -> Result<()> {
    let config = args.configuration(session.profile);
    let mockup = settle(session.studio.product_mockup(&config, kind).await?)?;

    println!("{}", mockup.caption);
    let name = format!(
        "mockup-{}.{}",
        kind.as_str().to_lowercase().replace(' ', "-"),
        mockup.image_data.extension()
    );
    saved(&session.artifacts.write_bytes(&name, &mockup.image_data.bytes).await?);
    Ok(())
}

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

async fn edit(session: &Session, image: &Path, instruction: &str) -> Result<()> {
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read {}", image.display()))?;
    let source = EncodedImage::new(mime_for(image), bytes);

    let edited = settle(
        session.studio
            .edit_image(&source.to_data_url(), instruction)
            .await?,
    )?;

    let name = format!(
        "edited-{}.{}",
        chrono::Utc::now().timestamp_millis(),
        edited.extension()
    );
    saved(&session.artifacts.write_bytes(&name, &edited.bytes).await?);
    Ok(())
}

async fn audio(session: &Session, args: &TopicArgs) -> Result<()> {
    let saved_research = session
        .artifacts
        .read_json::<SavedResearch>(RESEARCH_FILE)
        .await?
        .filter(|s| s.config.topic() == args.topic.trim());

    let research = match saved_research {
        Some(snapshot) => {
            info!(topic = %snapshot.config.topic(), "Using saved research");
            snapshot.research
        }
        None => {
            let config = args.configuration(session.profile);
            settle(session.studio.research(&config).await?)?
        }
    };

    let brief = settle(session.studio.audio_brief(&args.topic, &research).await?)?;
    field("Duration", format!("{:.1}s", brief.duration_secs()));
    saved(&session.artifacts.write_bytes("audio-brief.wav", &brief.to_wav()).await?);
    Ok(())
}

async fn update_profile(
    store: &LensStore,
    mut profile: Profile,
    stage: Option<BusinessStage>,
    style: Option<VisualStyle>,
    focus: Option<BusinessFocus>,
) -> Result<()> {
    let changed = stage.is_some() || style.is_some() || focus.is_some();
    profile.stage = stage.unwrap_or(profile.stage);
    profile.style = style.unwrap_or(profile.style);
    profile.focus = focus.unwrap_or(profile.focus);

    if changed {
        store.save_profile(&profile).await?;
    }

    heading("Profile");
    field("Stage", profile.stage.as_str());
    field("Style", profile.style.as_str());
    field("Focus", profile.focus.as_str());
    Ok(())
}

async fn report(artifacts: &Artifacts) -> Result<()> {
    let Some(snapshot) = artifacts.read_json::<SavedResearch>(RESEARCH_FILE).await? else {
        bail!("No research found. Run `solopreneur-lens research <topic>` first.");
    };
    let risk: Option<RiskAnalysis> = artifacts.read_json(RISK_FILE).await?;
    let financials: Option<FinancialModel> = artifacts.read_json(FINANCIALS_FILE).await?;

    let mut report = StrategyReport::new(
        snapshot.config.topic(),
        snapshot.config.stage,
        snapshot.config.focus,
        &snapshot.research,
    );
    if let Some(ref risk) = risk {
        report = report.with_risk(risk);
    }
    if let Some(ref financials) = financials {
        report = report.with_financials(financials);
    }

    let markdown = report.to_markdown();
    println!("{}", markdown);
    saved(&artifacts.write_bytes("strategy-report.md", markdown.as_bytes()).await?);
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let default_filter = format!(
        "solopreneur_lens={level},orchestrator={level},gemini={level}",
        level = default_level
    );

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

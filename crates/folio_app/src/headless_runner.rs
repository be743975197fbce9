//! Scenario runner that drives a mounted page headlessly.

use crate::app::FolioApp;
use crate::config::FolioConfig;
use crate::contact::{
    ContactMessage, ContactSubmitter, HttpSubmitter, LogSubmitter, ScriptedSubmitter,
};
use crate::content::Content;
use crate::error::SubmitError;
use crate::headless_assert::{
    evaluate_assert_active_region, evaluate_assert_expanded, evaluate_assert_fired,
    evaluate_assert_notice, evaluate_assert_theme, AssertionResult,
};
use crate::headless_report::{HeadlessReport, StepFailure};
use crate::headless_runtime::{wait_frames, HeadlessRunConfig, HeadlessRuntime};
use crate::headless_scenario::{HeadlessScenario, ScenarioStep};
use anyhow::{bail, Context, Result};
use folio_core::events::event_types;
use folio_core::{ContentItemId, Event, RegionKey};
use folio_theme::{DocumentRoot, MemoryStorage, PreferenceStorage, RootClassList, ThemePreference};
use std::sync::Arc;
use std::time::Duration;

/// Everything a run needs besides the scenario
pub struct RunEnvironment {
    pub config: FolioConfig,
    pub content: Content,
    pub storage: Box<dyn PreferenceStorage>,
    pub root: Box<dyn DocumentRoot>,
    pub submitter: Arc<dyn ContactSubmitter>,
    /// Set when `submitter` is scripted; `submit_contact` steps may queue
    /// failures on it
    pub scripted: Option<Arc<ScriptedSubmitter>>,
}

impl RunEnvironment {
    /// Defaults, sample content, memory storage, scripted submissions
    pub fn in_memory() -> Self {
        let scripted = Arc::new(ScriptedSubmitter::new());
        Self {
            config: FolioConfig::default(),
            content: Content::sample(),
            storage: Box::new(MemoryStorage::new()),
            root: Box::new(RootClassList::new()),
            submitter: scripted.clone(),
            scripted: Some(scripted),
        }
    }

    /// Environment described by a config file
    ///
    /// Content comes from `[content].path` (sample content when unset) and
    /// submissions go to `[contact].endpoint` (logged only when unset).
    pub fn from_config(config: FolioConfig) -> Result<Self> {
        let content = match &config.content.path {
            Some(path) => Content::load(path).context("failed to load page content")?,
            None => Content::sample(),
        };
        let submitter: Arc<dyn ContactSubmitter> = match &config.contact.endpoint {
            Some(endpoint) => Arc::new(
                HttpSubmitter::new(endpoint.clone(), Duration::from_millis(config.contact.timeout_ms))
                    .context("failed to build contact client")?,
            ),
            None => Arc::new(LogSubmitter),
        };
        Ok(Self {
            storage: config.storage.open(),
            root: Box::new(RootClassList::new()),
            content,
            submitter,
            scripted: None,
            config,
        })
    }

    pub fn with_config(mut self, config: FolioConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_storage(mut self, storage: Box<dyn PreferenceStorage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }
}

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON against a freshly mounted page.
pub fn run_scenario(input: &str, env: RunEnvironment) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    run_loaded_scenario(&scenario, env)
}

/// Execute a pre-loaded scenario.
///
/// Input steps take effect immediately (a zero-length frame); `wait` and
/// `tick` advance logical time frame by frame. A failed assertion ends the
/// run with a failed report; malformed steps are errors.
pub fn run_loaded_scenario(scenario: &HeadlessScenario, env: RunEnvironment) -> Result<RunOutcome> {
    let RunEnvironment {
        config,
        content,
        storage,
        root,
        submitter,
        scripted,
    } = env;
    let runtime_cfg = HeadlessRunConfig::from_config(&config);
    let async_rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let mut app = FolioApp::new(&config, &content, storage, root, submitter)
        .context("failed to mount page")?;
    let mut elapsed_frames: u64 = 0;
    let mut now_ms: u64 = 0;
    app.frame(now_ms)?;

    tracing::info!(
        scenario = scenario.name.as_deref().unwrap_or("<unnamed>"),
        steps = scenario.steps.len(),
        "running scenario"
    );

    for (step_index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!(step_index, kind = step.kind(), now_ms, "scenario step");
        let check = match step {
            ScenarioStep::Scroll { y } => {
                input(&mut app, Event::scroll(*y, now_ms), now_ms)?;
                None
            }
            ScenarioStep::Resize { width, height } => {
                input(&mut app, Event::resize(*width, *height, now_ms), now_ms)?;
                None
            }
            ScenarioStep::PointerEnter { region, x, y } => {
                let event = Event::pointer(event_types::POINTER_ENTER, RegionKey::parse(region), *x, *y, now_ms);
                input(&mut app, event, now_ms)?;
                None
            }
            ScenarioStep::PointerMove { region, x, y } => {
                let event = Event::pointer(event_types::POINTER_MOVE, RegionKey::parse(region), *x, *y, now_ms);
                input(&mut app, event, now_ms)?;
                None
            }
            ScenarioStep::PointerLeave { region } => {
                let event = Event::pointer(event_types::POINTER_LEAVE, RegionKey::parse(region), 0.0, 0.0, now_ms);
                input(&mut app, event, now_ms)?;
                None
            }
            ScenarioStep::ToggleExpand { id, exclusive } => {
                app.toggle_expand(ContentItemId::parse(id), *exclusive);
                None
            }
            ScenarioStep::SetTheme { value } => {
                let preference: ThemePreference = value
                    .parse()
                    .with_context(|| format!("step {step_index}: bad theme value"))?;
                app.set_theme(preference);
                app.frame(now_ms)?;
                None
            }
            ScenarioStep::ToggleTheme => {
                app.toggle_theme();
                app.frame(now_ms)?;
                None
            }
            ScenarioStep::SubmitContact {
                name,
                email,
                message,
                fail,
            } => {
                if let Some(reason) = fail {
                    let Some(scripted) = &scripted else {
                        bail!("step {step_index}: scripted failure needs a scripted submitter");
                    };
                    scripted.push_outcome(Err(SubmitError::Network(reason.clone())));
                }
                let message = ContactMessage::new(name.clone(), email.clone(), message.clone());
                if let Err(err) = async_rt.block_on(app.submit_contact(message)) {
                    tracing::debug!(%err, "scenario submission failed");
                }
                app.frame(now_ms)?;
                None
            }
            ScenarioStep::Wait { ms } => {
                let mut remaining_ms = *ms;
                run_frames(
                    &mut app,
                    runtime_cfg,
                    wait_frames(*ms, runtime_cfg.tick_ms),
                    &mut elapsed_frames,
                    &mut now_ms,
                    || {
                        let step_ms = remaining_ms.min(runtime_cfg.tick_ms);
                        remaining_ms = remaining_ms.saturating_sub(step_ms);
                        step_ms
                    },
                )?;
                None
            }
            ScenarioStep::Tick { frames } => {
                run_frames(
                    &mut app,
                    runtime_cfg,
                    *frames,
                    &mut elapsed_frames,
                    &mut now_ms,
                    || runtime_cfg.tick_ms,
                )?;
                None
            }
            ScenarioStep::AssertFired { region, count } => {
                Some(evaluate_assert_fired(region, *count, &app.snapshot()))
            }
            ScenarioStep::AssertTheme { value } => Some(evaluate_assert_theme(value, &app.snapshot())),
            ScenarioStep::AssertExpanded { id, expanded } => {
                Some(evaluate_assert_expanded(id, *expanded, &app.snapshot()))
            }
            ScenarioStep::AssertActiveRegion { region } => Some(evaluate_assert_active_region(
                region.as_deref(),
                &app.snapshot(),
            )),
            ScenarioStep::AssertNotice { value } => Some(evaluate_assert_notice(value, &app.snapshot())),
        };

        if let Some(AssertionResult::Failed { message, .. }) = check {
            tracing::info!(step_index, assertion = step.kind(), %message, "scenario failed");
            let failure = StepFailure {
                step_index,
                assertion: step.kind(),
                message,
            };
            let report = HeadlessReport::failed(
                failure,
                elapsed_frames,
                now_ms,
                app.snapshot(),
            );
            return Ok(RunOutcome::Failed { report });
        }
    }

    let report = HeadlessReport::passed(elapsed_frames, now_ms, app.snapshot());
    app.unmount();
    tracing::info!(elapsed_frames, elapsed_ms = now_ms, "scenario passed");
    Ok(RunOutcome::Passed { report })
}

fn input(app: &mut FolioApp, event: Event, now_ms: u64) -> Result<()> {
    app.dispatch(event);
    app.frame(now_ms)?;
    Ok(())
}

fn run_frames<A>(
    app: &mut FolioApp,
    runtime_cfg: HeadlessRunConfig,
    frames: u32,
    elapsed_frames: &mut u64,
    now_ms: &mut u64,
    mut advance_ms: A,
) -> Result<()>
where
    A: FnMut() -> u64,
{
    if frames == 0 {
        return Ok(());
    }

    HeadlessRuntime::run(runtime_cfg.with_frames(frames), |_| {
        *elapsed_frames = (*elapsed_frames).saturating_add(1);
        *now_ms = (*now_ms).saturating_add(advance_ms());
        app.frame(*now_ms)?;
        Ok(())
    })
}

//! Questline demo entry point.
//!
//! Loads a quest manifest, starts one quest, and drives it from a tokio
//! interval while a scripted schedule raises world flags. Journal events are
//! printed to stdout as JSON lines.

use std::error::Error;
use std::sync::Arc;

use questline_core::clock::SystemClock;
use questline_core::error::QuestError;
use questline_core::id::{QuestId, QuestInstanceId};
use questline_core::state::QuestState;
use questline_core::tick::{ManualTickSource, TickSource};
use questline_engine::application::manifest::{QuestManifest, WorldFlags};
use questline_engine::application::registry::QuestRegistry;
use questline_engine::application::runtime::QuestRuntime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod script;

use config::DemoConfig;
use error::DemoError;
use script::DemoScript;

const BUNDLED_MANIFEST: &str = include_str!("../../../demos/key_quest.yaml");

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Questline demo");

    let config = DemoConfig::from_env()?;
    run(config).await?;

    Ok(())
}

async fn run(config: DemoConfig) -> Result<(), DemoError> {
    let source_text = match &config.manifest {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => BUNDLED_MANIFEST.to_owned(),
    };
    let manifest = QuestManifest::from_yaml(&source_text)?;
    let script = DemoScript::from_yaml(&source_text)?;
    let quest_id = match &config.quest {
        Some(id) => QuestId::new(id.clone()),
        None => manifest
            .quests
            .first()
            .map(|quest| QuestId::new(quest.id.clone()))
            .ok_or_else(|| DemoError::Config("manifest defines no quests".to_owned()))?,
    };
    info!(
        quest = %quest_id,
        quests = manifest.quests.len(),
        scheduled = script.len(),
        "manifest loaded"
    );

    let flags = WorldFlags::new();
    let catalog = manifest.into_catalog(&flags);
    let registry = QuestRegistry::new(Arc::new(catalog), Arc::new(SystemClock));
    let source = Arc::new(ManualTickSource::new());
    let mut runtime = QuestRuntime::new(registry, Arc::clone(&source) as Arc<dyn TickSource>);

    let delta_time = config.tick_interval.as_secs_f32();
    let mut interval = tokio::time::interval(config.tick_interval);
    let mut instance: Option<QuestInstanceId> = None;
    let mut outcome = None;

    for tick in 1..=config.max_ticks {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }

        for change in script.due(tick) {
            if let Some(flag) = &change.set {
                flags.set(flag.clone());
                info!(tick, flag = %flag, "flag raised");
            }
            if let Some(flag) = &change.clear {
                flags.clear(flag);
                info!(tick, flag = %flag, "flag lowered");
            }
        }

        if instance.is_none() {
            match runtime.start_quest(&quest_id) {
                Ok(id) => instance = Some(id),
                Err(QuestError::StartDenied { denial, .. }) => {
                    info!(tick, %denial, "quest not startable yet");
                }
                Err(e) => return Err(e.into()),
            }
        }

        source.tick(delta_time);

        for event in runtime.drain_events()? {
            let line = serde_json::json!({
                "event_type": event.event_type(),
                "quest_id": event.metadata.quest_id,
                "instance_id": event.metadata.instance_id,
                "sequence_number": event.metadata.sequence_number,
                "occurred_at": event.metadata.occurred_at,
                "payload": event.to_payload(),
            });
            println!("{line}");
        }

        if let Some(id) = instance {
            let state = runtime.with_registry(|r| r.instance(id).map(|i| i.state()))?;
            if state.is_some_and(QuestState::is_terminal) {
                outcome = state;
                break;
            }
        }
    }

    match outcome {
        Some(state) => info!(quest = %quest_id, %state, "quest finished"),
        None => warn!(quest = %quest_id, max_ticks = config.max_ticks, "quest did not finish"),
    }
    runtime.teardown();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_manifest_and_schedule_are_valid() {
        let manifest = QuestManifest::from_yaml(BUNDLED_MANIFEST).unwrap();
        let script = DemoScript::from_yaml(BUNDLED_MANIFEST).unwrap();

        assert_eq!(manifest.quests[0].id, "key_quest");
        assert_eq!(script.due(3)[0].set.as_deref(), Some("key_a"));
    }
}

use std::fmt;

#[derive(Debug, Clone)]
pub enum StageEvent {
    AssetLoaded { key: String },
    AssetFailed { key: String, reason: String },
    AllAssetsReady { loaded: usize, failed: usize },
    ClipMissing { model: String, clip: String },
    InteractionStarted,
    MediaStarted { source: String },
}

impl fmt::Display for StageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageEvent::AssetLoaded { key } => write!(f, "AssetLoaded key={key}"),
            StageEvent::AssetFailed { key, reason } => {
                write!(f, "AssetFailed key={key} reason={reason}")
            }
            StageEvent::AllAssetsReady { loaded, failed } => {
                write!(f, "AllAssetsReady loaded={loaded} failed={failed}")
            }
            StageEvent::ClipMissing { model, clip } => {
                write!(f, "ClipMissing model={model} clip={clip}")
            }
            StageEvent::InteractionStarted => write!(f, "InteractionStarted"),
            StageEvent::MediaStarted { source } => write!(f, "MediaStarted source={source}"),
        }
    }
}

#[derive(Default)]
pub struct EventBus {
    events: Vec<StageEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<StageEvent> {
        self.events.drain(..).collect()
    }
}

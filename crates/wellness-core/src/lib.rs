pub mod app;
pub mod config;
pub mod crisis;
pub mod fallback;
pub mod insight;
pub mod mood;
pub mod persona;
pub mod resolver;
pub mod resources;

pub use app::{reduce, Action, AppState, Effect};
pub use config::{load_config, ProviderSettings, WellnessConfig};
pub use crisis::detect_crisis;
pub use fallback::fallback_reply;
pub use insight::generate_insight;
pub use mood::MoodLog;
pub use persona::{load_persona, Persona};
pub use resolver::{Reply, ReplySource, ResponseResolver};

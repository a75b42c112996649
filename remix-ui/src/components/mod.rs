mod analysis_display;
mod error_display;
mod loading_spinner;
mod script_display;
mod topic_selector;
mod transcript_input;

pub use analysis_display::AnalysisDisplay;
pub use error_display::ErrorDisplay;
pub use loading_spinner::LoadingSpinner;
pub use script_display::ScriptDisplay;
pub use topic_selector::TopicSelector;
pub use transcript_input::TranscriptInput;

mod analyze_transcript;
mod generate_script;
mod wizard;

pub use analyze_transcript::AnalyzeTranscript;
pub use generate_script::GenerateScript;
pub use wizard::{SessionId, Wizard};

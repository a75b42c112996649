mod home;

pub use home::{AnalyzeTranscriptFn, GenerateScriptFn, HomePage};

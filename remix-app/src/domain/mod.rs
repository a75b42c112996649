mod analysis;
mod pipeline;
mod script;
mod transcript;

pub use analysis::{Analysis, SUGGESTED_TOPIC_COUNT};
pub use pipeline::{
    Applied, GenerationRequest, Phase, PhaseTicket, Pipeline, PipelineState, Stage, TopicChoice,
};
pub use script::{Script, ScriptSection};
pub use transcript::{Topic, Transcript};

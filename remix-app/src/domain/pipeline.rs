use super::{Analysis, Script, Topic, Transcript};
use remix_errors::AppError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Analysis,
    Generation,
}

/// Issued when a phase starts. A result is only applied while its ticket is
/// still current, so responses that arrive after a reset are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTicket {
    generation: u64,
    phase: Phase,
}

impl PhaseTicket {
    pub fn phase(&self) -> Phase {
        self.phase
    }
}

/// Outcome of handing a phase result to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Idle,
    Analyzing,
    AwaitingTopic,
    GeneratingScript,
    Complete,
    Error,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::AwaitingTopic => "awaiting-topic",
            Self::GeneratingScript => "generating-script",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Analyzing | Self::GeneratingScript)
    }

    /// Stages in which the transcript form is shown.
    pub fn accepts_transcript(&self) -> bool {
        matches!(self, Self::Idle | Self::Analyzing | Self::Error)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Idle,
    Analyzing {
        transcript: Transcript,
    },
    AwaitingTopic {
        transcript: Transcript,
        analysis: Analysis,
        notice: Option<String>,
    },
    GeneratingScript {
        transcript: Transcript,
        analysis: Analysis,
        topic: Topic,
    },
    Complete {
        transcript: Transcript,
        analysis: Analysis,
        topic: Topic,
        script: Script,
    },
    Error {
        transcript: Transcript,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopicChoice {
    Suggested(usize),
    Custom(String),
}

/// Everything the script generator needs, detached from the pipeline so the
/// call can run without holding the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub transcript: Transcript,
    pub topic: Topic,
    pub analysis: Analysis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    generation: u64,
    state: PipelineState,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            generation: 0,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        match &self.state {
            PipelineState::Idle => Stage::Idle,
            PipelineState::Analyzing { .. } => Stage::Analyzing,
            PipelineState::AwaitingTopic { .. } => Stage::AwaitingTopic,
            PipelineState::GeneratingScript { .. } => Stage::GeneratingScript,
            PipelineState::Complete { .. } => Stage::Complete,
            PipelineState::Error { .. } => Stage::Error,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.stage().is_busy()
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        match &self.state {
            PipelineState::Idle => None,
            PipelineState::Analyzing { transcript }
            | PipelineState::AwaitingTopic { transcript, .. }
            | PipelineState::GeneratingScript { transcript, .. }
            | PipelineState::Complete { transcript, .. }
            | PipelineState::Error { transcript, .. } => Some(transcript),
        }
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match &self.state {
            PipelineState::AwaitingTopic { analysis, .. }
            | PipelineState::GeneratingScript { analysis, .. }
            | PipelineState::Complete { analysis, .. } => Some(analysis),
            _ => None,
        }
    }

    pub fn topic(&self) -> Option<&Topic> {
        match &self.state {
            PipelineState::GeneratingScript { topic, .. } | PipelineState::Complete { topic, .. } => {
                Some(topic)
            }
            _ => None,
        }
    }

    pub fn script(&self) -> Option<&Script> {
        match &self.state {
            PipelineState::Complete { script, .. } => Some(script),
            _ => None,
        }
    }

    /// Localized message of the last failed phase, if it is still on screen.
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            PipelineState::Error { message, .. } => Some(message),
            PipelineState::AwaitingTopic { notice, .. } => notice.as_deref(),
            _ => None,
        }
    }

    pub fn can_begin_analysis(&self) -> Result<(), AppError> {
        match self.stage() {
            Stage::Idle | Stage::Error => Ok(()),
            stage => Err(AppError::invalid_transition("analyze", stage.as_str())),
        }
    }

    /// idle | error -> analyzing
    pub fn begin_analysis(&mut self, transcript: Transcript) -> Result<PhaseTicket, AppError> {
        self.can_begin_analysis()?;

        self.state = PipelineState::Analyzing { transcript };
        Ok(self.issue(Phase::Analysis))
    }

    /// analyzing -> awaiting-topic on success, analyzing -> error on failure.
    pub fn finish_analysis(
        &mut self,
        ticket: PhaseTicket,
        result: Result<Analysis, AppError>,
    ) -> Applied {
        if !self.is_current(ticket, Stage::Analyzing) {
            return Applied::Stale;
        }

        let state = std::mem::replace(&mut self.state, PipelineState::Idle);
        let transcript = match state {
            PipelineState::Analyzing { transcript } => transcript,
            other => {
                self.state = other;
                return Applied::Stale;
            }
        };

        self.state = match result {
            Ok(analysis) => PipelineState::AwaitingTopic {
                transcript,
                analysis,
                notice: None,
            },
            Err(err) => PipelineState::Error {
                transcript,
                message: err.user_message().to_string(),
            },
        };
        Applied::Applied
    }

    /// Resolves a topic choice against the current analysis. Nothing changes;
    /// fails when no analysis is available or the choice is unusable.
    pub fn generation_request(&self, choice: &TopicChoice) -> Result<GenerationRequest, AppError> {
        let (transcript, analysis) = match &self.state {
            PipelineState::AwaitingTopic {
                transcript,
                analysis,
                ..
            }
            | PipelineState::Complete {
                transcript,
                analysis,
                ..
            } => (transcript, analysis),
            _ => return Err(AppError::invalid_transition("generate", self.stage().as_str())),
        };

        let topic = match choice {
            TopicChoice::Suggested(index) => {
                let suggested = analysis.topic(*index).ok_or_else(|| {
                    AppError::InvalidInput("선택한 추천 주제를 찾을 수 없습니다.".to_string())
                })?;
                Topic::parse(suggested)?
            }
            TopicChoice::Custom(raw) => Topic::parse(raw)?,
        };

        Ok(GenerationRequest {
            transcript: transcript.clone(),
            topic,
            analysis: analysis.clone(),
        })
    }

    /// awaiting-topic | complete -> generating-script. A previous script is
    /// dropped here; it is replaced, never merged.
    pub fn begin_generation(
        &mut self,
        choice: TopicChoice,
    ) -> Result<(PhaseTicket, GenerationRequest), AppError> {
        let request = self.generation_request(&choice)?;

        self.state = PipelineState::GeneratingScript {
            transcript: request.transcript.clone(),
            analysis: request.analysis.clone(),
            topic: request.topic.clone(),
        };
        Ok((self.issue(Phase::Generation), request))
    }

    /// generating-script -> complete on success, back to awaiting-topic on
    /// failure with the analysis kept.
    pub fn finish_generation(
        &mut self,
        ticket: PhaseTicket,
        result: Result<Script, AppError>,
    ) -> Applied {
        if !self.is_current(ticket, Stage::GeneratingScript) {
            return Applied::Stale;
        }

        let state = std::mem::replace(&mut self.state, PipelineState::Idle);
        let (transcript, analysis, topic) = match state {
            PipelineState::GeneratingScript {
                transcript,
                analysis,
                topic,
            } => (transcript, analysis, topic),
            other => {
                self.state = other;
                return Applied::Stale;
            }
        };

        self.state = match result {
            Ok(script) => PipelineState::Complete {
                transcript,
                analysis,
                topic,
                script,
            },
            Err(err) => PipelineState::AwaitingTopic {
                transcript,
                analysis,
                notice: Some(err.user_message().to_string()),
            },
        };
        Applied::Applied
    }

    /// complete -> awaiting-topic, discarding the script.
    pub fn choose_another_topic(&mut self) -> Result<(), AppError> {
        let state = std::mem::replace(&mut self.state, PipelineState::Idle);
        match state {
            PipelineState::Complete {
                transcript,
                analysis,
                ..
            } => {
                self.state = PipelineState::AwaitingTopic {
                    transcript,
                    analysis,
                    notice: None,
                };
                Ok(())
            }
            other => {
                self.state = other;
                Err(AppError::invalid_transition(
                    "choose another topic",
                    self.stage().as_str(),
                ))
            }
        }
    }

    /// Puts back `previous` when a started phase was refused before any model
    /// call ran. The generation counter is not rolled back.
    pub fn withdraw(&mut self, ticket: PhaseTicket, previous: PipelineState) -> Applied {
        let expected = match ticket.phase {
            Phase::Analysis => Stage::Analyzing,
            Phase::Generation => Stage::GeneratingScript,
        };
        if !self.is_current(ticket, expected) {
            return Applied::Stale;
        }

        self.state = previous;
        Applied::Applied
    }

    /// Any state -> idle. Outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = PipelineState::Idle;
    }

    fn issue(&mut self, phase: Phase) -> PhaseTicket {
        self.generation += 1;
        PhaseTicket {
            generation: self.generation,
            phase,
        }
    }

    fn is_current(&self, ticket: PhaseTicket, expected: Stage) -> bool {
        let phase_matches = match ticket.phase {
            Phase::Analysis => expected == Stage::Analyzing,
            Phase::Generation => expected == Stage::GeneratingScript,
        };
        phase_matches && ticket.generation == self.generation && self.stage() == expected
    }
}

mod app_error;
mod model_error;

pub use app_error::{AppError, ANALYSIS_FAILED_MESSAGE, GENERATION_FAILED_MESSAGE};
pub use model_error::ModelError;

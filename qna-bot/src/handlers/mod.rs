//! Handler implementations: logging, state persistence, and the QnA bot itself.

mod logging;
mod qna_bot;
mod state_handler;

pub use logging::LoggingHandler;
pub use qna_bot::{QnABot, DIALOG_STATE_PROPERTY, WELCOME_TEXT};
pub use state_handler::StateHandler;

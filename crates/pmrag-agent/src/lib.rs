//! Query-routing agent for pmrag
//!
//! Per question, [`QueryAgent`] asks the chat model for a SQL or Cypher statement, runs it,
//! and falls back to threshold similarity search when the statement finds nothing. The
//! answer is phrased by the model from whichever evidence was found, or replaced by a fixed
//! "cannot answer" text.
//!
//! ```rust,ignore
//! let agent = QueryAgent::new(chat, embedder, store, &config.agent);
//! let response = agent.run("Which epics belong to goal GOAL-3?").await?;
//! println!("{}", response.answer);
//! ```

pub mod agent;
pub mod error;
pub mod parse;
pub mod prompts;
pub mod similarity;

pub use agent::{AgentResponse, AgentStep, Outcome, QueryAgent};
pub use error::{AgentError, AgentResult};
pub use parse::{extract_query, parse_final_answer};
pub use similarity::SimilaritySearch;

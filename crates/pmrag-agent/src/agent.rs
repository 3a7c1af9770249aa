//! The query-routing agent
//!
//! One run walks a small state machine:
//!
//! ```text
//! GenerateQuery -> Execute --rows--> Answer
//!                     \--empty/error--> SimilaritySearch --matches--> Answer
//!                                           \--none--> next cycle, or GiveUp after the last
//! ```
//!
//! Store failures never end a run; they count as "nothing found". Model failures do.

use async_trait::async_trait;
use pmrag_config::AgentConfig;
use pmrag_core::{
    ChatProvider, ChatRequest, EmbeddingProvider, Match, QueryDialect, QuestionAnswerer, Record,
    RecordStore,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::{AgentError, AgentResult};
use crate::parse::{extract_query, parse_final_answer};
use crate::prompts;
use crate::similarity::SimilaritySearch;

/// How a run found (or failed to find) its answer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The generated query returned rows
    Structured {
        /// Statement that produced the rows
        query: String,
        /// Returned rows, embedding field removed
        rows: Vec<Record>,
    },
    /// Similarity search supplied the evidence
    Similarity {
        /// Records above the threshold, best first
        matches: Vec<Match>,
    },
    /// Nothing was found within the cycle bound
    GaveUp,
}

/// A state the agent passed through
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum AgentStep {
    /// Asked the model for a statement
    GenerateQuery {
        /// Cycle number, starting at 1
        cycle: u32,
        /// Extracted statement, `None` when the output held none
        query: Option<String>,
    },
    /// Ran the statement
    Execute {
        /// Cycle number
        cycle: u32,
        /// Rows returned
        rows: usize,
        /// Store error, downgraded to an empty result
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// Ranked stored embeddings against the question
    SimilaritySearch {
        /// Cycle number
        cycle: u32,
        /// Matches above the threshold
        matches: usize,
        /// Store error, downgraded to an empty result
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// Asked the model to phrase the answer
    Answer {
        /// Cycle number
        cycle: u32,
    },
    /// Returned the fixed fallback text
    GiveUp,
}

/// Result of one agent run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentResponse {
    /// Id shared with the run's tracing span
    pub correlation_id: Uuid,
    /// Final natural-language answer
    pub answer: String,
    /// Where the evidence came from
    pub outcome: Outcome,
    /// Cycles used
    pub cycles: u32,
    /// States visited, in order
    pub steps: Vec<AgentStep>,
}

impl AgentResponse {
    /// Whether the run fell back to the fixed "cannot answer" text
    pub fn gave_up(&self) -> bool {
        matches!(self.outcome, Outcome::GaveUp)
    }
}

/// Answers questions from one store
///
/// The store's dialect picks the prompts and the similarity threshold.
pub struct QueryAgent {
    chat: Arc<dyn ChatProvider>,
    store: Arc<dyn RecordStore>,
    search: SimilaritySearch,
    max_cycles: u32,
    cannot_answer: String,
}

impl QueryAgent {
    /// Build an agent over `store`
    pub fn new(
        chat: Arc<dyn ChatProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn RecordStore>,
        config: &AgentConfig,
    ) -> Self {
        let threshold = match store.dialect() {
            QueryDialect::Sql => config.sql_threshold,
            QueryDialect::Cypher => config.graph_threshold,
        };
        Self {
            chat,
            store,
            search: SimilaritySearch::new(embedder, threshold),
            max_cycles: config.max_cycles.max(1),
            cannot_answer: config.cannot_answer.clone(),
        }
    }

    /// Dialect of the underlying store
    pub fn dialect(&self) -> QueryDialect {
        self.store.dialect()
    }

    /// Similarity search used for the fallback
    pub fn similarity(&self) -> &SimilaritySearch {
        &self.search
    }

    /// Answer `question`
    ///
    /// Ends in an error only when the chat or embedding model fails.
    pub async fn run(&self, question: &str) -> AgentResult<AgentResponse> {
        let correlation_id = Uuid::new_v4();
        let span = info_span!(
            "agent_run",
            correlation_id = %correlation_id,
            dialect = %self.store.dialect()
        );
        self.run_cycles(question, correlation_id)
            .instrument(span)
            .await
    }

    async fn run_cycles(&self, question: &str, correlation_id: Uuid) -> AgentResult<AgentResponse> {
        info!(question, "agent run started");
        let mut steps = Vec::new();
        let schema = match self.store.schema().await {
            Ok(schema) => Some(schema),
            Err(e) => {
                warn!(error = %e, "schema unavailable, skipping query generation");
                None
            }
        };

        let mut failed_query: Option<String> = None;
        for cycle in 1..=self.max_cycles {
            if let Some(schema) = schema.as_deref() {
                let query = self
                    .generate_query(question, schema, failed_query.as_deref())
                    .await?;
                steps.push(AgentStep::GenerateQuery {
                    cycle,
                    query: query.clone(),
                });

                if let Some(query) = query {
                    let (rows, error) = match self.store.execute(&query).await {
                        Ok(rows) => (rows, None),
                        Err(e) => {
                            warn!(cycle, error = %e, "query failed, treating as empty");
                            (Vec::new(), Some(e.to_string()))
                        }
                    };
                    steps.push(AgentStep::Execute {
                        cycle,
                        rows: rows.len(),
                        error,
                    });

                    if !rows.is_empty() {
                        let embedding_field = self.store.embedding_field();
                        let rows: Vec<Record> =
                            rows.iter().map(|r| r.without_field(embedding_field)).collect();
                        let prompt = prompts::structured_evidence(question, &query, &rows);
                        let answer = self.synthesize(prompt).await?;
                        steps.push(AgentStep::Answer { cycle });
                        info!(cycle, rows = rows.len(), "answered from query");
                        return Ok(AgentResponse {
                            correlation_id,
                            answer,
                            outcome: Outcome::Structured { query, rows },
                            cycles: cycle,
                            steps,
                        });
                    }
                    failed_query = Some(query);
                }
            }

            let (matches, error) = match self.search.search(self.store.as_ref(), question).await {
                Ok(matches) => (matches, None),
                Err(AgentError::Store(e)) => {
                    warn!(cycle, error = %e, "similarity candidates unavailable, treating as empty");
                    (Vec::new(), Some(e.to_string()))
                }
                Err(e) => return Err(e),
            };
            steps.push(AgentStep::SimilaritySearch {
                cycle,
                matches: matches.len(),
                error,
            });

            if !matches.is_empty() {
                let prompt = prompts::similarity_evidence(question, &matches);
                let answer = self.synthesize(prompt).await?;
                steps.push(AgentStep::Answer { cycle });
                info!(cycle, matches = matches.len(), "answered from similarity search");
                return Ok(AgentResponse {
                    correlation_id,
                    answer,
                    outcome: Outcome::Similarity { matches },
                    cycles: cycle,
                    steps,
                });
            }
            debug!(cycle, "cycle found nothing");
        }

        steps.push(AgentStep::GiveUp);
        info!(cycles = self.max_cycles, "no answer found");
        Ok(AgentResponse {
            correlation_id,
            answer: self.cannot_answer.clone(),
            outcome: Outcome::GaveUp,
            cycles: self.max_cycles,
            steps,
        })
    }

    async fn generate_query(
        &self,
        question: &str,
        schema: &str,
        failed: Option<&str>,
    ) -> AgentResult<Option<String>> {
        let request = ChatRequest::new(
            prompts::generation_system(self.store.dialect(), schema),
            prompts::generation_user(question, failed),
        );
        let response = self.chat.chat(request).await?;
        let query = extract_query(&response.content);
        debug!(query = query.as_deref().unwrap_or(""), "generated query");
        Ok(query)
    }

    async fn synthesize(&self, evidence: String) -> AgentResult<String> {
        debug!(prompt_chars = evidence.len(), "synthesizing answer");
        let request = ChatRequest::new(prompts::answer_system(), evidence);
        let response = self.chat.chat(request).await?;
        Ok(parse_final_answer(&response.content))
    }
}

#[async_trait]
impl QuestionAnswerer for QueryAgent {
    type Error = AgentError;

    async fn answer(&self, question: &str) -> Result<String, Self::Error> {
        Ok(self.run(question).await?.answer)
    }
}

//! Prompt templates for query generation and answer synthesis

use pmrag_core::{Match, QueryDialect, Record};

/// Rows beyond this are summarized instead of sent to the model
pub const MAX_EVIDENCE_ROWS: usize = 50;

const SQL_GENERATION: &str = "\
You translate questions about a project-management dataset into PostgreSQL.
Write one syntactically correct PostgreSQL query that answers the question.
Only query the columns you need and never select every column of a table.
Wrap every column name in double quotes and use only columns that appear in the table \
description below. Pay attention to which column belongs to which table.
When the question asks about today, use CURRENT_DATE.

Reply in this format:
SQLQuery: <the query>

Only use the following tables:
{schema}";

const CYPHER_GENERATION: &str = "\
You translate questions about a project-management graph into Cypher for Neo4j.
Use only the node labels, relationship types and properties listed in the schema.
Every node has a pyid property of the form <objclass>-<id>, where objclass is one of \
UserStory, Epic, Goal, Project or Backlog; the class is also stored in pxobjclass.
Properties named <objclass>id hold the pyid of the associated node, for example \
epicid = \"EPIC-1\".
Reply with the Cypher statement only. No explanations, no apologies, no other text.

Schema:
{schema}";

const ANSWER: &str = "\
You answer questions about a project-management dataset using only the evidence provided.
If the evidence does not contain the answer, say that you do not know.
Finish your reply with a line of the form:
Final Answer: <the answer>";

/// System prompt asking for a statement in `dialect`
pub fn generation_system(dialect: QueryDialect, schema: &str) -> String {
    let template = match dialect {
        QueryDialect::Sql => SQL_GENERATION,
        QueryDialect::Cypher => CYPHER_GENERATION,
    };
    template.replace("{schema}", schema)
}

/// User prompt for query generation; `failed` is the statement a previous cycle got nothing from
pub fn generation_user(question: &str, failed: Option<&str>) -> String {
    match failed {
        Some(query) => format!(
            "Question: {question}\n\n\
             A previous attempt ran the query below and it returned no results or failed. \
             Write a different query.\n{query}"
        ),
        None => format!("Question: {question}"),
    }
}

/// System prompt for answer synthesis
pub fn answer_system() -> &'static str {
    ANSWER
}

/// User prompt carrying the rows returned by `query`; embeddings must already be stripped
pub fn structured_evidence(question: &str, query: &str, rows: &[Record]) -> String {
    let mut out = format!("Question: {question}\n\nQuery:\n{query}\n\nResult:\n");
    for row in rows.iter().take(MAX_EVIDENCE_ROWS) {
        out.push_str(&row.to_json().to_string());
        out.push('\n');
    }
    if rows.len() > MAX_EVIDENCE_ROWS {
        out.push_str(&format!("... {} more rows\n", rows.len() - MAX_EVIDENCE_ROWS));
    }
    out
}

/// User prompt carrying similarity matches
pub fn similarity_evidence(question: &str, matches: &[Match]) -> String {
    let mut out = format!(
        "Question: {question}\n\n\
         No query answered the question directly. These records are the most similar to it:\n"
    );
    for m in matches.iter().take(MAX_EVIDENCE_ROWS) {
        out.push_str(&format!(
            "- {} ({}) similarity {:.3}\n",
            m.id,
            m.label.as_deref().unwrap_or("no label"),
            m.score
        ));
    }
    if matches.len() > MAX_EVIDENCE_ROWS {
        out.push_str(&format!("... {} more records\n", matches.len() - MAX_EVIDENCE_ROWS));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_system_embeds_schema() {
        let sql = generation_system(QueryDialect::Sql, "CREATE TABLE public.data_filtered ()");
        assert!(sql.contains("SQLQuery:"));
        assert!(sql.ends_with("CREATE TABLE public.data_filtered ()"));

        let cypher = generation_system(QueryDialect::Cypher, "(:UserStory)-[:IS_STORY_OF_EPIC]->(:Epic)");
        assert!(cypher.contains("pxobjclass"));
        assert!(cypher.contains("(:UserStory)-[:IS_STORY_OF_EPIC]->(:Epic)"));
        assert!(!cypher.contains("{schema}"));
    }

    #[test]
    fn test_generation_user_names_failed_query() {
        assert_eq!(generation_user("How many epics?", None), "Question: How many epics?");
        let retry = generation_user("How many epics?", Some("SELECT 1"));
        assert!(retry.contains("SELECT 1"));
        assert!(retry.contains("different query"));
    }

    #[test]
    fn test_structured_evidence_renders_rows_as_json() {
        let rows = vec![Record::new()
            .with("pyid", "US-1")
            .with("points", pmrag_core::Value::List(vec![3i64.into(), 5i64.into()]))];
        let text = structured_evidence("q", "SELECT \"pyid\"", &rows);
        assert!(text.contains(r#"{"pyid":"US-1","points":[3,5]}"#));
    }

    #[test]
    fn test_evidence_is_capped() {
        let rows: Vec<Record> = (0..MAX_EVIDENCE_ROWS + 3)
            .map(|i| Record::new().with("n", i as i64))
            .collect();
        let text = structured_evidence("q", "SELECT n", &rows);
        assert!(text.ends_with("... 3 more rows\n"));
    }

    #[test]
    fn test_similarity_evidence() {
        let matches = vec![Match {
            id: "EPIC-1".into(),
            label: Some("Accounts".into()),
            score: 0.91234,
        }];
        let text = similarity_evidence("q", &matches);
        assert!(text.contains("- EPIC-1 (Accounts) similarity 0.912"));
    }
}

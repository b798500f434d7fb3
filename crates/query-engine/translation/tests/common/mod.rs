use serde::Deserialize;

use query_engine_metadata::metadata;
use query_engine_sql::sql;
use query_engine_translation::translation;

/// A golden translation request: the source, the already parsed clauses, and the options.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Request {
    source: Source,
    #[serde(default)]
    count: bool,
    #[serde(default = "default_try_parse_dates")]
    try_parse_dates: bool,
    #[serde(default)]
    metadata: metadata::Metadata,
    clauses: translation::parser::ParsedClauses,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum Source {
    Table(String),
    RawSql(String),
}

fn default_try_parse_dates() -> bool {
    true
}

/// Translate `tests/goldenfiles/<testname>/request.json`, and render the SQL with its parameters
/// for comparison against the snapshot.
pub fn test_translation(testname: &str) -> anyhow::Result<String> {
    let select = translate_request(testname)?;
    let query = sql::convert::select_to_sql(&select, sql::dialect::Dialect::SqlServer);
    let params: Vec<String> = query
        .params
        .iter()
        .map(|(name, param)| format!("{name} = {param:?}"))
        .collect();
    if params.is_empty() {
        Ok(query.sql)
    } else {
        Ok(format!("{}\n\n{}", query.sql, params.join("\n")))
    }
}

/// Translate a golden request, expecting an error, and render the error.
pub fn test_error(testname: &str) -> String {
    match translate_request(testname) {
        Ok(select) => panic!("expected an error, got: {select:?}"),
        Err(err) => err.to_string(),
    }
}

/// Translate a golden request into the query model.
pub fn translate_request(testname: &str) -> anyhow::Result<sql::ast::Select> {
    let directory = tests_common::goldenfiles::goldenfile_dir(testname);
    let request: Request = tests_common::goldenfiles::read_json(&directory, "request.json")?;

    let settings = translation::helpers::Settings {
        try_parse_dates: request.try_parse_dates,
        ..translation::helpers::Settings::default()
    };
    let env = translation::helpers::Env::new(&request.metadata, settings);
    let source = match request.source {
        Source::Table(name) => translation::query::QuerySource::Table(name),
        Source::RawSql(raw_sql) => translation::query::QuerySource::RawSql(raw_sql),
    };

    Ok(translation::query::translate(
        &env,
        &request.clauses,
        &source,
        &translation::parser::QueryParameters::new(),
        request.count,
    )?)
}

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use students_provider::contract::{CONTENT_AUTHORITY, DEFAULT_DATABASE_NAME};
use students_provider::{ProviderConfig, StudentsProvider};
use students_query::{QueryRequest, ResourceAddress};
use tracing::{debug, info};

/// Address and query options shared by `query` and `resolve`
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Resource address, e.g. content://<authority>/students/147221
    pub uri: String,

    /// Column to return; repeat for several (default: all columns)
    #[arg(long = "projection", short = 'p')]
    pub projection: Vec<String>,

    /// Filter with `?` placeholders, ignored for single-student addresses
    #[arg(long, short = 's')]
    pub selection: Option<String>,

    /// Value for the next `?` in the selection; repeat in order
    #[arg(long = "arg", short = 'a')]
    pub selection_args: Vec<String>,

    /// Ordering clause, e.g. "nombre ASC"
    #[arg(long)]
    pub sort: Option<String>,

    /// Authority the students templates are registered under
    #[arg(long, env = "STUDENTS_AUTHORITY", default_value = CONTENT_AUTHORITY)]
    pub authority: String,
}

impl QueryArgs {
    pub fn address(&self) -> anyhow::Result<ResourceAddress> {
        ResourceAddress::parse(&self.uri).with_context(|| format!("Invalid address {}", self.uri))
    }

    pub fn to_request(&self) -> QueryRequest {
        QueryRequest {
            projection: (!self.projection.is_empty()).then(|| self.projection.clone()),
            filter_predicate: self.selection.clone(),
            filter_arguments: (!self.selection_args.is_empty())
                .then(|| self.selection_args.clone()),
            sort_order: self.sort.clone(),
        }
    }
}

#[derive(Args)]
pub struct QueryCommand {
    #[command(flatten)]
    pub query: QueryArgs,

    /// SQLite database file
    #[arg(long, env = "STUDENTS_DATABASE", default_value = DEFAULT_DATABASE_NAME)]
    pub database: PathBuf,

    /// Open the database without write access
    #[arg(long)]
    pub read_only: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl QueryCommand {
    fn config(&self) -> ProviderConfig {
        ProviderConfig::new(self.database.clone())
            .with_authority(self.query.authority.clone())
            .with_read_only(self.read_only)
    }

    async fn run(&self) -> anyhow::Result<String> {
        let address = self.query.address()?;
        let provider = StudentsProvider::open(&self.config())?;

        debug!("Querying {}", address);
        let outcome = provider.query(&address, self.query.to_request()).await;
        provider.shutdown().await?;
        let result = outcome?;

        info!(
            "{} row(s) in {}ms",
            result.stats.row_count, result.stats.execution_ms
        );

        let output = if self.pretty {
            serde_json::to_string_pretty(&result.rows)?
        } else {
            serde_json::to_string(&result.rows)?
        };
        Ok(output)
    }

    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        let output = rt.block_on(self.run())?;
        println!("{}", output);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use students_query::{ProviderError, QueryExecutor, RoutingErrorKind};
    use students_query_sqlite::SqliteSource;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        query: QueryArgs,
    }

    #[test]
    fn test_query_args_to_request() {
        let cli = TestCli::try_parse_from([
            "test",
            "content://org.school/students",
            "-p",
            "nombre",
            "--projection",
            "puntos_extra",
            "--selection",
            "puntos_extra > ? AND nombre <> ?",
            "-a",
            "2",
            "--arg",
            "Ana",
            "--sort",
            "nombre",
        ])
        .unwrap();

        let request = cli.query.to_request();
        assert_eq!(
            request,
            QueryRequest::new()
                .with_projection(["nombre", "puntos_extra"])
                .with_filter("puntos_extra > ? AND nombre <> ?", ["2", "Ana"])
                .with_sort_order("nombre")
        );
        assert_eq!(cli.query.address().unwrap().authority(), "org.school");
    }

    #[test]
    fn test_empty_options_become_none() {
        let cli = TestCli::try_parse_from(["test", "content://org.school/students"]).unwrap();

        assert_eq!(cli.query.to_request(), QueryRequest::new());
        assert_eq!(cli.query.authority, CONTENT_AUTHORITY);
    }

    #[test]
    fn test_invalid_uri_is_reported() {
        let cli = TestCli::try_parse_from(["test", "students/1"]).unwrap();
        assert!(cli.query.address().is_err());
    }

    #[derive(Parser)]
    struct TestQueryCli {
        #[command(flatten)]
        command: QueryCommand,
    }

    const FIXTURE: &str = "
        CREATE TABLE student (
            num_control INTEGER PRIMARY KEY,
            nombre TEXT NOT NULL,
            puntos_extra REAL
        );
        INSERT INTO student VALUES (147221, 'Ana', 1.5);
        INSERT INTO student VALUES (147222, 'Luis', NULL);
    ";

    async fn seeded_database(dir: &tempfile::TempDir, journal_mode: &str) -> PathBuf {
        let path = dir.path().join(DEFAULT_DATABASE_NAME);
        let source = SqliteSource::open(&path).unwrap();
        source
            .execute_batch(&format!("PRAGMA journal_mode = {};", journal_mode))
            .await
            .unwrap();
        source.execute_batch(FIXTURE).await.unwrap();
        source.close().await.unwrap();
        path
    }

    fn command(database: &std::path::Path, args: &[&str]) -> QueryCommand {
        let mut argv = vec!["test", "--database", database.to_str().unwrap()];
        argv.extend_from_slice(args);
        TestQueryCli::try_parse_from(argv).unwrap().command
    }

    /// SQLite removes the WAL file when the last connection closes
    fn assert_database_closed(path: &std::path::Path) {
        let mut wal = path.as_os_str().to_owned();
        wal.push("-wal");
        assert!(!PathBuf::from(wal).exists());
    }

    #[tokio::test]
    async fn test_run_prints_rows_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded_database(&dir, "WAL").await;
        let uri = format!("content://{}/students", CONTENT_AUTHORITY);

        let cmd = command(&path, &[uri.as_str(), "-p", "nombre", "--sort", "nombre DESC"]);
        let output = cmd.run().await.unwrap();

        let rows: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(rows, json!([{ "nombre": "Luis" }, { "nombre": "Ana" }]));
        assert_database_closed(&path);
    }

    #[tokio::test]
    async fn test_run_item_address_ignores_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded_database(&dir, "DELETE").await;
        let uri = format!("content://{}/students/147221", CONTENT_AUTHORITY);

        let cmd = command(
            &path,
            &[uri.as_str(), "--read-only", "--pretty", "-s", "nombre = ?", "-a", "Luis"],
        );
        let output = cmd.run().await.unwrap();
        assert!(output.contains('\n'));

        let rows: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            rows,
            json!([{ "num_control": 147221, "nombre": "Ana", "puntos_extra": 1.5 }])
        );
    }

    #[tokio::test]
    async fn test_run_unknown_address_still_closes_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded_database(&dir, "WAL").await;
        let uri = format!("content://{}/unknown", CONTENT_AUTHORITY);

        let err = command(&path, &[uri.as_str()]).run().await.unwrap_err();
        let provider_err = err.downcast_ref::<ProviderError>().unwrap();
        assert!(provider_err.is_routing(RoutingErrorKind::Unmatched));
        assert_database_closed(&path);
    }
}

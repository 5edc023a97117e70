//! Integration tests for the `import-tlds` command.

use designate_core::{ApiError, ApiResult, BoxFuture, RequestContext, Tld, TldService, TldValues};
use designate_manage::{admin_context, ImportError, ImportTlds, MemoryTldStore};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn input_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn importer(store: &Arc<MemoryTldStore>) -> ImportTlds<MemoryTldStore> {
    ImportTlds::new(Arc::clone(store), admin_context(None))
}

#[tokio::test]
async fn imports_valid_lines() {
    let store = Arc::new(MemoryTldStore::new());
    let file = input_file("com,Commercial\norg\n\nco.uk,\"United Kingdom, commercial\"\n");

    let report = importer(&store).import_file(file.path()).await.unwrap();

    assert_eq!(report.added, 3);
    assert!(report.error_lines.is_empty());
    assert!(store.contains("com"));
    assert!(store.contains("org"));

    let tlds = store.tlds();
    let co_uk = tlds.iter().find(|t| t.name == "co.uk").unwrap();
    assert_eq!(co_uk.description.as_deref(), Some("United Kingdom, commercial"));
}

#[tokio::test]
async fn reports_every_kind_of_bad_line_and_continues() {
    let store = Arc::new(MemoryTldStore::with_existing(["net"]));
    let long_description = "x".repeat(161);
    let content = format!(
        "com,Commercial\n\
         net,Network\n\
         -bad,Invalid name\n\
         org,{long_description}\n\
         info,Information,extra\n\
         biz\n"
    );
    let file = input_file(&content);

    let report = importer(&store).import_file(file.path()).await.unwrap();

    assert_eq!(report.added, 2);
    assert_eq!(report.error_count(), 4);
    assert_eq!(
        report.error_lines,
        vec![
            "DuplicateTLD --> {'name': 'net', 'description': 'Network'}".to_string(),
            format!(
                "InvalidDescription --> {{'name': 'org', 'description': '{long_description}'}}"
            ),
            concat!(
                "InvalidLine --> {'name': 'info', 'description': 'Information', ",
                "'extra_fields': '['extra']'}"
            )
            .to_string(),
            "InvalidTLD --> {'name': '-bad', 'description': 'Invalid name'}".to_string(),
        ]
    );
    assert!(store.contains("biz"));
    assert!(!store.contains("org"));
}

#[tokio::test]
async fn honours_custom_delimiter() {
    let store = Arc::new(MemoryTldStore::new());
    let file = input_file("com|Commercial, mostly\nedu|Education|extra\n");

    let report = importer(&store)
        .with_delimiter('|')
        .import_file(file.path())
        .await
        .unwrap();

    assert_eq!(report.added, 1);
    assert_eq!(
        report.error_lines,
        vec![concat!(
            "InvalidLine --> {'name': 'edu', 'description': 'Education', ",
            "'extra_fields': '['extra']'}"
        )]
    );
    assert_eq!(store.tlds()[0].description.as_deref(), Some("Commercial, mostly"));
}

#[tokio::test]
async fn missing_input_file_is_an_error() {
    let store = Arc::new(MemoryTldStore::new());
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.csv");

    let err = importer(&store).import_file(&missing).await.unwrap_err();
    assert!(matches!(err, ImportError::InputNotFound(path) if path == missing));
}

struct BrokenService;

impl TldService for BrokenService {
    fn create_tld<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        _values: TldValues,
    ) -> BoxFuture<'a, ApiResult<Tld>> {
        Box::pin(async { Err(ApiError::timeout("central did not answer")) })
    }
}

#[tokio::test]
async fn other_service_errors_abort_the_import() {
    let command = ImportTlds::new(Arc::new(BrokenService), admin_context(Some("token")));

    let err = command.import_str("com\norg\n").await.unwrap_err();
    assert!(matches!(err, ImportError::Service(ApiError::MessagingTimeout(_))));

    // Lines rejected before reaching the service do not need it.
    let report = command.import_str("-bad\n").await.unwrap();
    assert_eq!(report.added, 0);
    assert_eq!(report.error_count(), 1);
}

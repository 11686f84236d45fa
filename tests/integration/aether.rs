//! Facade behavior: transports, failures, recovery and locking.

use crate::common::{JUNIT, aether, central, universe};
use anyhow::Result;
use mvn_classpath::artifact::Artifact;
use mvn_classpath::config::ResolverSettings;
use mvn_classpath::core::ResolveError;
use mvn_classpath::repository::{Authentication, RemoteRepository};
use mvn_classpath::resolver::Aether;
use mvn_classpath::test_utils::capture_logs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tracing::Level;

fn junit() -> Artifact {
    JUNIT.parse().unwrap()
}

#[tokio::test]
async fn test_finds_and_loads_artifacts() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let aether = aether(&service, temp.path());

    let deps = aether.resolve(&junit(), "runtime").await?;
    let names: Vec<&str> = deps.iter().map(Artifact::artifact_id).collect();
    assert_eq!(names, vec!["junit", "hamcrest-core"]);
    for artifact in &deps {
        let file = artifact.file().unwrap();
        assert!(file.starts_with(temp.path()));
        assert!(file.exists());
    }
    assert_eq!(service.resolve_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_unsupported_transport_is_skipped() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let repositories = [
        RemoteRepository::new("broken", "default", "s3-invalid-scheme://bucket/release"),
        central(),
        RemoteRepository::new("aws", "default", "s3://aether-test.jcabi.com/release"),
        RemoteRepository::new("disk", "default", "file:///var/maven/repository"),
    ];
    let aether = Aether::new(
        service.clone(),
        &repositories,
        temp.path(),
        &ResolverSettings::default(),
    )?;

    let (logs, _guard) = capture_logs(Level::WARN);
    aether.resolve(&junit(), "test").await?;
    let requests = service.requests().await;
    let ids: Vec<&str> = requests[0].repositories.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["central", "aws", "disk"]);
    assert_eq!(aether.repositories().len(), 4);

    let warnings = logs.contents();
    assert!(warnings.contains("WARN"));
    assert!(warnings.contains("s3-invalid-scheme://bucket/release"));
    assert!(warnings.contains("ignored (only S3, HTTP/S, and FILE are supported)"));
    assert!(!warnings.contains("repo1.maven.org"));
    Ok(())
}

#[tokio::test]
async fn test_failure_message_names_repositories_without_secrets() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let private = RemoteRepository::new("private", "default", "https://repo.example.com/private/")
        .with_authentication(Authentication::new("deployer", "hunter2"));
    let aether = Aether::new(
        service.clone(),
        &[central(), private],
        temp.path(),
        &ResolverSettings::default(),
    )?;

    let absent: Artifact = "com.jcabi:jcabi-absent:0.0.1".parse()?;
    let err = aether.resolve(&absent, "runtime").await.unwrap_err();
    assert!(err.is_resolution_failure());

    let message = err.to_string();
    assert!(message.starts_with("failed to load 'com.jcabi:jcabi-absent:jar:0.0.1 (runtime)' from ["));
    assert!(message.contains(
        "central (http://repo1.maven.org/maven2/, default, releases+snapshots) without authentication"
    ));
    assert!(message.contains("with username=deployer, password=***"));
    assert!(message.contains(&temp.path().display().to_string()));
    assert!(!message.contains("hunter2"));
    assert!(!format!("{err:?}").contains("hunter2"));

    match err {
        ResolveError::DependencyResolutionFailure {
            repositories,
            local_repository,
            ..
        } => {
            assert_eq!(repositories.len(), 2);
            assert_eq!(local_repository, temp.path());
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_recovers_after_failure() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let aether = aether(&service, temp.path());

    service.fail_on("org.hamcrest:hamcrest-core:1.1");
    let err = aether.resolve(&junit(), "test").await.unwrap_err();
    assert!(format!("{:#}", anyhow::Error::from(err)).contains("connection refused"));

    service.recover("org.hamcrest:hamcrest-core:1.1");
    let deps = aether.resolve(&junit(), "test").await?;
    assert_eq!(deps.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_scope_gates_transitive_dependencies() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(
        universe().with_dependency(
            "com.example:app:1.0",
            "junit:junit:4.8",
            mvn_classpath::artifact::Scope::Test,
        ),
    );
    let aether = aether(&service, temp.path());
    let app: Artifact = "com.example:app:1.0".parse()?;

    let compile = aether.resolve(&app, "compile").await?;
    assert_eq!(compile.len(), 1);
    let test = aether.resolve(&app, "test").await?;
    assert_eq!(test.len(), 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_local_repository_is_serialized() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe().with_delay(Duration::from_millis(50)));
    let aether = aether(&service, temp.path());

    let mut handles = Vec::new();
    for _ in 0..4 {
        let aether = aether.clone();
        handles.push(tokio::spawn(async move { aether.resolve(&junit(), "runtime").await }));
    }
    for handle in handles {
        let deps = handle.await??;
        assert_eq!(deps.len(), 2);
    }
    assert_eq!(service.collect_count(), 4);
    assert_eq!(service.peak_concurrency(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_different_local_repositories_overlap() -> Result<()> {
    let service = Arc::new(universe().with_delay(Duration::from_millis(200)));
    let dirs = [TempDir::new()?, TempDir::new()?, TempDir::new()?];

    let mut handles = Vec::new();
    for dir in &dirs {
        let aether = aether(&service, dir.path());
        handles.push(tokio::spawn(async move { aether.resolve(&junit(), "runtime").await }));
    }
    for handle in handles {
        handle.await??;
    }
    assert!(service.peak_concurrency() > 1);
    Ok(())
}

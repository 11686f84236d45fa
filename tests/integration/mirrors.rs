//! Mirror, proxy and credential selection applied by the facade.

use crate::common::{JUNIT, central, universe};
use anyhow::Result;
use mvn_classpath::config::ResolverSettings;
use mvn_classpath::repository::{Mirror, ProxySettings, RemoteRepository, Secret, ServerSettings};
use mvn_classpath::resolver::Aether;
use std::sync::Arc;
use tempfile::TempDir;

fn settings() -> ResolverSettings {
    ResolverSettings {
        mirrors: vec![Mirror::new(
            "corp",
            "https://nexus.corp/repository/maven-public/",
            "external:*,!snapshots",
        )],
        proxies: vec![ProxySettings {
            id: Some("corp-proxy".to_string()),
            active: true,
            protocol: "https".to_string(),
            host: "proxy.corp".to_string(),
            port: 3128,
            username: Some("proxyuser".to_string()),
            password: Some(Secret::new("proxypass")),
            non_proxy_hosts: Some("*.internal".to_string()),
        }],
        servers: vec![ServerSettings {
            id: "corp".to_string(),
            username: Some("reader".to_string()),
            password: Some(Secret::new("reader-secret")),
            private_key: None,
            passphrase: None,
        }],
        ..ResolverSettings::default()
    }
}

#[tokio::test]
async fn test_requests_go_through_mirror() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let snapshots = RemoteRepository::new("snapshots", "default", "https://snapshots.example.com/");
    let local = RemoteRepository::new("local", "default", "file:///var/maven/repository");
    let aether = Aether::new(
        service.clone(),
        &[central(), snapshots, local],
        temp.path(),
        &settings(),
    )?;

    aether.resolve(&JUNIT.parse()?, "test").await?;
    let requests = service.requests().await;
    let repositories = &requests[0].repositories;
    let ids: Vec<&str> = repositories.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["corp", "snapshots", "local"]);

    let corp = &repositories[0];
    assert_eq!(corp.mirrored_repositories[0].id, "central");
    let proxy = corp.proxy.as_ref().unwrap();
    assert_eq!((proxy.host.as_str(), proxy.port), ("proxy.corp", 3128));
    let auth = corp.authentication.as_ref().unwrap();
    assert_eq!(auth.password.as_ref().map(Secret::expose), Some("reader-secret"));

    assert!(repositories[2].proxy.is_none());
    Ok(())
}

#[tokio::test]
async fn test_descriptors_do_not_follow_live_objects() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let mut repositories = vec![central()];
    let aether = Aether::new(
        service.clone(),
        &repositories,
        temp.path(),
        &ResolverSettings::default(),
    )?;

    repositories[0].url = "s3-invalid-scheme://elsewhere/".to_string();
    aether.resolve(&JUNIT.parse()?, "test").await?;

    let requests = service.requests().await;
    assert_eq!(requests[0].repositories[0].url, "http://repo1.maven.org/maven2/");
    Ok(())
}

#[tokio::test]
async fn test_failure_mentions_mirror_credentials_masked() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let aether = Aether::new(service, &[central()], temp.path(), &settings())?;

    let err = aether
        .resolve(&"com.example:missing:1.0".parse()?, "compile")
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("corp (https://nexus.corp/repository/maven-public/"));
    assert!(message.contains("with username=reader, password=***"));
    assert!(!message.contains("reader-secret"));
    assert!(!message.contains("proxypass"));
    Ok(())
}

//! Shared fixtures for the integration suite.

use mvn_classpath::artifact::{Dependency, Exclusion, Scope};
use mvn_classpath::classpath::ProjectModel;
use mvn_classpath::config::ResolverSettings;
use mvn_classpath::repository::RemoteRepository;
use mvn_classpath::resolver::Aether;
use mvn_classpath::test_utils::{MockResolver, init_test_logging};
use std::path::Path;
use std::sync::Arc;

pub const JUNIT: &str = "junit:junit:4.10";
pub const VALIDATOR: &str = "commons-validator:commons-validator:1.3.1";

pub fn central() -> RemoteRepository {
    RemoteRepository::new("central", "default", "http://repo1.maven.org/maven2/")
}

/// junit 4.8, 4.8.2 and 4.10 (with hamcrest), plus commons-validator and its tree.
pub fn universe() -> MockResolver {
    init_test_logging(None);
    MockResolver::new()
        .with_dependencies(JUNIT, &["org.hamcrest:hamcrest-core:1.1"])
        .with_artifact("junit:junit:4.8")
        .with_artifact("junit:junit:4.8.2")
        .with_dependencies(
            VALIDATOR,
            &[
                "commons-beanutils:commons-beanutils:1.7.0",
                "commons-digester:commons-digester:1.6",
                "commons-logging:commons-logging:1.0.4",
                "oro:oro:2.0.8",
            ],
        )
        .with_optional(VALIDATOR, "xml-apis:xml-apis:2.0.2")
        .with_dependencies(
            "commons-digester:commons-digester:1.6",
            &["commons-logging:commons-logging:1.1"],
        )
}

pub fn dependency(coords: &str, scope: Scope) -> Dependency {
    Dependency::new(coords.parse().unwrap(), scope)
}

pub fn project(dependencies: Vec<Dependency>) -> ProjectModel {
    ProjectModel {
        dependencies,
        test_classpath_elements: vec!["/some/path/as/directory".into()],
        remote_repositories: vec![central()],
        ..ProjectModel::default()
    }
}

pub fn validator_without_oro() -> Dependency {
    dependency(VALIDATOR, Scope::Compile).with_exclusion(Exclusion::new("oro", "oro"))
}

pub fn aether(service: &Arc<MockResolver>, local: &Path) -> Aether<MockResolver> {
    Aether::new(
        service.clone(),
        &[central()],
        local,
        &ResolverSettings::default(),
    )
    .unwrap()
}

pub fn file_names(files: &[std::path::PathBuf]) -> Vec<String> {
    files
        .iter()
        .filter_map(|f| f.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect()
}

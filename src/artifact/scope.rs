//! Dependency scopes.
//!
//! A scope decides on which classpaths a dependency appears. The names follow Maven:
//! `compile`, `provided`, `runtime`, `test`, `system` and `import`.

use crate::core::{ResolveError, Result};
use std::fmt;
use std::str::FromStr;

/// A named dependency visibility class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Scope {
    /// Available on every classpath; the default.
    #[default]
    Compile,
    /// Supplied by the runtime container; compile and test classpaths only.
    Provided,
    /// Needed at runtime and for tests, not for compilation.
    Runtime,
    /// Test compilation and execution only.
    Test,
    /// Like `provided`, but pointing at an explicit file on the system.
    System,
    /// Dependency-management import; never part of a classpath.
    Import,
}

impl Scope {
    /// All scopes, in declaration order.
    pub const ALL: [Scope; 6] = [
        Scope::Compile,
        Scope::Provided,
        Scope::Runtime,
        Scope::Test,
        Scope::System,
        Scope::Import,
    ];

    /// The scope name as it appears in a POM.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Provided => "provided",
            Self::Runtime => "runtime",
            Self::Test => "test",
            Self::System => "system",
            Self::Import => "import",
        }
    }

    /// Scopes whose dependencies belong on the classpath requested by `self`.
    ///
    /// Asking for the `test` classpath pulls in everything except `import`; `runtime` adds
    /// `runtime` dependencies to `compile` ones; `compile` also sees `provided` and `system`.
    ///
    /// # Errors
    ///
    /// `import` does not describe a classpath, so no filter can be derived for it and a
    /// [`ResolveError::ConfigurationError`] is returned.
    pub fn classpath_scopes(self) -> Result<&'static [Scope]> {
        match self {
            Self::Compile => Ok(&[Self::Compile, Self::Provided, Self::System]),
            Self::Runtime => Ok(&[Self::Compile, Self::Runtime]),
            Self::Test => Ok(&[
                Self::Compile,
                Self::Provided,
                Self::Runtime,
                Self::System,
                Self::Test,
            ]),
            Self::Provided => Ok(&[Self::Provided]),
            Self::System => Ok(&[Self::System]),
            Self::Import => Err(ResolveError::configuration(format!(
                "failed to create a classpath filter for '{self}'"
            ))),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| ResolveError::configuration(format!("unknown dependency scope '{s}'")))
    }
}

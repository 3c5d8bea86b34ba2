use crate::paths::DEFAULT_RUNTIME_CRATE;
use blockgen_config::Config;
use blockgen_schema::{DEFAULT_PLATFORM_SUPPORT, diagnostic::Diagnostic};
use convert_case::{Case, Casing};
use std::path::PathBuf;

///
/// Options
///
/// Resolved settings for one generation pass.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Options {
    pub base_package: String,
    pub module_name: String,
    pub runtime_crate: String,
    pub platform_support: String,
}

impl Options {
    /// Build options from the two required settings.
    pub fn new(
        base_package: impl Into<String>,
        module_name: impl Into<String>,
    ) -> Result<Self, Diagnostic> {
        let options = Self {
            base_package: base_package.into(),
            module_name: module_name.into(),
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            platform_support: DEFAULT_PLATFORM_SUPPORT.to_string(),
        };
        options.check()?;

        Ok(options)
    }

    #[must_use]
    pub fn with_runtime_crate(mut self, runtime_crate: impl Into<String>) -> Self {
        self.runtime_crate = runtime_crate.into();
        self
    }

    #[must_use]
    pub fn with_platform_support(mut self, platform_support: impl Into<String>) -> Self {
        self.platform_support = platform_support.into();
        self
    }

    /// Fail when a required setting is blank.
    pub fn check(&self) -> Result<(), Diagnostic> {
        if self.base_package.trim().is_empty() {
            return Err(Diagnostic::missing("base_package"));
        }
        if self.module_name.trim().is_empty() {
            return Err(Diagnostic::missing("module_name"));
        }

        Ok(())
    }

    /// Directory the base package maps to; `.` and `::` both separate
    /// segments.
    #[must_use]
    pub fn base_path(&self) -> PathBuf {
        self.base_package
            .split("::")
            .flat_map(|part| part.split('.'))
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    /// Module name as a type-name prefix.
    #[must_use]
    pub fn module_pascal(&self) -> String {
        self.module_name.trim().to_case(Case::Pascal)
    }

    /// Module name as a file-name prefix.
    #[must_use]
    pub fn module_snake(&self) -> String {
        self.module_name.trim().to_case(Case::Snake)
    }
}

impl TryFrom<Config> for Options {
    type Error = Diagnostic;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        let mut options = Self::new(
            config.base_package.unwrap_or_default(),
            config.module_name.unwrap_or_default(),
        )?;

        if let Some(runtime_crate) = config.runtime_crate {
            options = options.with_runtime_crate(runtime_crate);
        }
        if let Some(platform_support) = config.platform_support {
            options = options.with_platform_support(platform_support);
        }

        Ok(options)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_required_options_are_reported() {
        assert_eq!(
            Options::new("", "Demo"),
            Err(Diagnostic::missing("base_package"))
        );
        assert_eq!(
            Options::new("app", "  "),
            Err(Diagnostic::missing("module_name"))
        );
    }

    #[test]
    fn base_path_splits_dots_and_colons() {
        let dotted = Options::new("io.nativeblocks.sampleapp", "Demo").unwrap();
        let pathed = Options::new("io::nativeblocks::sampleapp", "Demo").unwrap();

        assert_eq!(
            dotted.base_path(),
            PathBuf::from("io").join("nativeblocks").join("sampleapp")
        );
        assert_eq!(dotted.base_path(), pathed.base_path());
    }

    #[test]
    fn config_fills_optional_settings() {
        let config = Config {
            base_package: Some("app".to_string()),
            module_name: Some("sample app".to_string()),
            runtime_crate: Some("my_runtime".to_string()),
            platform_support: None,
        };

        let options = Options::try_from(config).unwrap();

        assert_eq!(options.runtime_crate, "my_runtime");
        assert_eq!(options.platform_support, DEFAULT_PLATFORM_SUPPORT);
        assert_eq!(options.module_pascal(), "SampleApp");
        assert_eq!(options.module_snake(), "sample_app");
    }

    #[test]
    fn config_without_module_is_rejected() {
        let config = Config {
            base_package: Some("app".to_string()),
            ..Config::default()
        };

        assert_eq!(
            Options::try_from(config),
            Err(Diagnostic::missing("module_name"))
        );
    }
}

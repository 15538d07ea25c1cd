//! Per-format transform profiles.

use crate::format::ModuleFormat;
use crate::interop::ModuleInterop;

/// Environment target shared by every profile.
///
/// Output must run in every browser matching this browserslist query; the
/// transformer downlevels syntax accordingly before any module interop is
/// applied.
pub const DEFAULT_TARGETS: &str = "> 0.5%, not dead";

/// Transformer configuration for one target module format.
///
/// Profiles are plain immutable data: an environment target query plus at
/// most one module-interop adapter. `esm` carries no adapter, so module
/// syntax passes through the environment transform untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatProfile {
    /// The format this profile produces
    pub format: ModuleFormat,
    /// Browserslist-style target-support query
    pub targets: &'static str,
    /// Module-interop adapter, `None` for `esm`
    pub interop: Option<ModuleInterop>,
}

impl FormatProfile {
    fn new(format: ModuleFormat) -> Self {
        let interop = match format {
            ModuleFormat::Esm => None,
            ModuleFormat::Cjs => Some(ModuleInterop::CommonJs),
            ModuleFormat::Amd => Some(ModuleInterop::Amd),
            ModuleFormat::Umd => Some(ModuleInterop::Umd),
            ModuleFormat::Sysjs => Some(ModuleInterop::SystemJs),
        };
        Self {
            format,
            targets: DEFAULT_TARGETS,
            interop,
        }
    }
}

/// Immutable registry mapping every recognized format to its profile.
///
/// Constructed once at startup and passed by reference into the pipeline;
/// nothing is recomputed per file.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: [FormatProfile; 5],
}

impl ProfileRegistry {
    /// Build the registry with one profile per recognized format.
    pub fn new() -> Self {
        Self {
            profiles: ModuleFormat::ALL.map(FormatProfile::new),
        }
    }

    /// Look up the profile for a format.
    ///
    /// Total over `ModuleFormat`: unknown format keys are unrepresentable
    /// here and are rejected earlier, when parsing the key string.
    pub fn profile(&self, format: ModuleFormat) -> &FormatProfile {
        let index = match format {
            ModuleFormat::Esm => 0,
            ModuleFormat::Cjs => 1,
            ModuleFormat::Amd => 2,
            ModuleFormat::Umd => 3,
            ModuleFormat::Sysjs => 4,
        };
        &self.profiles[index]
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_format() {
        let registry = ProfileRegistry::new();
        for format in ModuleFormat::ALL {
            assert_eq!(registry.profile(format).format, format);
        }
    }

    #[test]
    fn test_esm_has_no_interop_adapter() {
        let registry = ProfileRegistry::new();
        assert!(registry.profile(ModuleFormat::Esm).interop.is_none());
    }

    #[test]
    fn test_non_esm_formats_have_one_adapter_each() {
        let registry = ProfileRegistry::new();
        assert_eq!(
            registry.profile(ModuleFormat::Cjs).interop,
            Some(ModuleInterop::CommonJs)
        );
        assert_eq!(
            registry.profile(ModuleFormat::Amd).interop,
            Some(ModuleInterop::Amd)
        );
        assert_eq!(
            registry.profile(ModuleFormat::Umd).interop,
            Some(ModuleInterop::Umd)
        );
        assert_eq!(
            registry.profile(ModuleFormat::Sysjs).interop,
            Some(ModuleInterop::SystemJs)
        );
    }

    #[test]
    fn test_profiles_share_the_target_policy() {
        let registry = ProfileRegistry::new();
        for format in ModuleFormat::ALL {
            assert_eq!(registry.profile(format).targets, DEFAULT_TARGETS);
        }
    }
}

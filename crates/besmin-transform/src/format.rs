//! Module format identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownFormat;

/// Target module format for emitted code.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ModuleFormat {
    /// ECMAScript modules (import/export syntax)
    ///
    /// Module syntax is left exactly as the environment-target transform
    /// emits it. Supported in modern browsers and Node.js 14+.
    Esm,

    /// CommonJS modules (require/module.exports)
    ///
    /// Traditional Node.js format. Use this for maximum compatibility with
    /// older Node.js versions and tools that don't support ESM.
    Cjs,

    /// Asynchronous Module Definition (define/require)
    ///
    /// Browser loader format used by RequireJS and compatible loaders.
    Amd,

    /// Universal Module Definition
    ///
    /// Wrapper that dispatches to AMD, CommonJS, or a global variable
    /// depending on the loading environment.
    Umd,

    /// SystemJS modules (System.register)
    ///
    /// Loader format for the SystemJS dynamic module loader.
    Sysjs,
}

impl ModuleFormat {
    /// Every recognized format, in canonical order.
    pub const ALL: [ModuleFormat; 5] = [
        ModuleFormat::Esm,
        ModuleFormat::Cjs,
        ModuleFormat::Amd,
        ModuleFormat::Umd,
        ModuleFormat::Sysjs,
    ];

    /// The format key as it appears on the command line and in output paths.
    pub fn key(&self) -> &'static str {
        match self {
            ModuleFormat::Esm => "esm",
            ModuleFormat::Cjs => "cjs",
            ModuleFormat::Amd => "amd",
            ModuleFormat::Umd => "umd",
            ModuleFormat::Sysjs => "sysjs",
        }
    }

    /// Whether output in this format is parsed as an ES module.
    ///
    /// Everything except `esm` is emitted as a classic script wrapped in a
    /// loader envelope.
    pub fn is_module(&self) -> bool {
        matches!(self, ModuleFormat::Esm)
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ModuleFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "esm" => Ok(ModuleFormat::Esm),
            "cjs" => Ok(ModuleFormat::Cjs),
            "amd" => Ok(ModuleFormat::Amd),
            "umd" => Ok(ModuleFormat::Umd),
            "sysjs" => Ok(ModuleFormat::Sysjs),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

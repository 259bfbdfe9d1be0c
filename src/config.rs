//! Build configuration report
//!
//! Every binding in this crate is decided when it is compiled. [`BuildConfig`]
//! collects those decisions in one serializable value so embedding
//! applications can log or assert on them.

use crate::diagnostics::{DefaultDiagnostics, Diagnostics};
use crate::remap::CompilerFamily;
use crate::VERSION;
use indexmap::IndexMap;
use serde::Serialize;
use smallvec::SmallVec;

/// Which string functions come from the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub strdup: bool,
    pub strlcpy: bool,
    pub snprintf: bool,
    pub vsnprintf: bool,
}

impl Capabilities {
    /// Markers enabled for this build
    pub const DETECTED: Self = Self {
        strdup: cfg!(feature = "have-strdup"),
        strlcpy: cfg!(feature = "have-strlcpy"),
        snprintf: cfg!(feature = "have-snprintf"),
        vsnprintf: cfg!(feature = "have-vsnprintf"),
    };

    /// Functions served by the internal fallbacks
    pub fn fallbacks(&self) -> SmallVec<[&'static str; 4]> {
        [
            ("strdup", self.strdup),
            ("strlcpy", self.strlcpy),
            ("snprintf", self.snprintf),
            ("vsnprintf", self.vsnprintf),
        ]
        .into_iter()
        .filter(|(_, native)| !native)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Snapshot of every build-time decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
    /// Library version string
    pub version: &'static str,
    /// Toolchain family the bindings were remapped for
    pub compiler_family: CompilerFamily,
    /// Runtime-provided string functions
    pub capabilities: Capabilities,
    /// Name of the diagnostic hook bound by default
    pub diagnostics: &'static str,
    /// Reserved wide-integer marker
    pub wide_integers: bool,
    /// Whether the C-ABI exports are compiled in
    pub c_api: bool,
}

impl BuildConfig {
    /// Configuration of this build
    pub const CURRENT: Self = Self {
        version: VERSION,
        compiler_family: CompilerFamily::CURRENT,
        capabilities: Capabilities::DETECTED,
        diagnostics: DefaultDiagnostics::NAME,
        wide_integers: cfg!(feature = "long-long"),
        c_api: cfg!(feature = "capi"),
    };

    /// Functions served by the internal fallbacks
    pub fn fallbacks(&self) -> SmallVec<[&'static str; 4]> {
        self.capabilities.fallbacks()
    }

    /// Maps each indirection point of the stock platform to its symbol
    ///
    /// Entries keep the order of the table: descriptor I/O, allocator,
    /// stream, diagnostics, then the string functions.
    pub fn symbol_table(&self) -> IndexMap<&'static str, String> {
        let family = self.compiler_family;
        let mut table = IndexMap::new();

        for point in ["open", "close", "read", "write"] {
            table.insert(point, family.resolve(point).to_string());
        }
        for point in ["malloc", "calloc", "realloc", "free", "getc"] {
            table.insert(point, point.to_string());
        }
        table.insert("log", format!("diagnostics::{}", self.diagnostics));

        let strings = [
            ("strdup", self.capabilities.strdup),
            ("strlcpy", self.capabilities.strlcpy),
            ("snprintf", self.capabilities.snprintf),
            ("vsnprintf", self.capabilities.vsnprintf),
        ];
        for (name, native) in strings {
            let symbol = match (native, name) {
                // the variable-argument binding renders through snprintf
                (true, "vsnprintf") => family.resolve("snprintf").to_string(),
                (true, _) => family.resolve(name).to_string(),
                (false, _) => format!("_mxml_{}", name),
            };
            table.insert(name, symbol);
        }
        table
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::CURRENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_config_reports_version() {
        assert_eq!(BuildConfig::CURRENT.version, "Mini-XML v2.12");
        assert_eq!(BuildConfig::default(), BuildConfig::CURRENT);
    }

    #[test]
    fn test_fallbacks_list_missing_functions() {
        let capabilities = Capabilities {
            strdup: true,
            strlcpy: false,
            snprintf: true,
            vsnprintf: false,
        };
        assert_eq!(capabilities.fallbacks().as_slice(), ["strlcpy", "vsnprintf"]);
    }

    #[cfg(not(any(
        feature = "have-strdup",
        feature = "have-strlcpy",
        feature = "have-snprintf",
        feature = "have-vsnprintf"
    )))]
    #[test]
    fn test_default_build_uses_every_fallback() {
        assert_eq!(
            BuildConfig::CURRENT.fallbacks().as_slice(),
            ["strdup", "strlcpy", "snprintf", "vsnprintf"]
        );
        let table = BuildConfig::CURRENT.symbol_table();
        assert_eq!(table["strdup"], "_mxml_strdup");
        assert_eq!(table["vsnprintf"], "_mxml_vsnprintf");
    }

    #[test]
    fn test_symbol_table_for_msvc_avoids_shims() {
        let config = BuildConfig {
            compiler_family: CompilerFamily::Msvc,
            capabilities: Capabilities {
                strdup: true,
                strlcpy: false,
                snprintf: true,
                vsnprintf: true,
            },
            ..BuildConfig::CURRENT
        };
        let table = config.symbol_table();
        for point in ["open", "close", "read", "write", "strdup", "snprintf"] {
            assert!(
                !CompilerFamily::Msvc.is_compat_shim(&table[point]),
                "{} bound to {}",
                point,
                table[point]
            );
        }
        assert_eq!(table["open"], "_open");
        assert_eq!(table["vsnprintf"], "_snprintf");
        assert_eq!(table["strlcpy"], "_mxml_strlcpy");
    }

    #[test]
    fn test_symbol_table_keeps_point_order() {
        let table = BuildConfig::CURRENT.symbol_table();
        let keys: Vec<_> = table.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                "open", "close", "read", "write", "malloc", "calloc", "realloc", "free", "getc",
                "log", "strdup", "strlcpy", "snprintf", "vsnprintf"
            ]
        );
    }
}

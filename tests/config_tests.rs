//! Integration tests for the build configuration report

use mxml_platform::{BuildConfig, Capabilities, CompilerFamily, SymbolRemap, VERSION};
use serde_json::{Value, json};

#[test]
fn test_build_config_serializes() {
    let value = serde_json::to_value(BuildConfig::CURRENT).unwrap();
    assert_eq!(value["version"], json!(VERSION));
    assert_eq!(value["compiler_family"], json!(CompilerFamily::CURRENT.as_str()));
    assert_eq!(
        value["capabilities"],
        json!({
            "strdup": cfg!(feature = "have-strdup"),
            "strlcpy": cfg!(feature = "have-strlcpy"),
            "snprintf": cfg!(feature = "have-snprintf"),
            "vsnprintf": cfg!(feature = "have-vsnprintf"),
        })
    );
    assert_eq!(value["c_api"], json!(cfg!(feature = "capi")));
    assert_eq!(value["wide_integers"], json!(cfg!(feature = "long-long")));
}

#[test]
fn test_version_string() {
    assert_eq!(VERSION, "Mini-XML v2.12");
}

#[test]
fn test_symbol_table_serializes_in_order() {
    let table = BuildConfig::CURRENT.symbol_table();
    let text = serde_json::to_string(&table).unwrap();
    let open = text.find("\"open\"").unwrap();
    let getc = text.find("\"getc\"").unwrap();
    let vsnprintf = text.find("\"vsnprintf\"").unwrap();
    assert!(open < getc && getc < vsnprintf);

    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value.as_object().unwrap().len(), 14);
}

#[test]
fn test_msvc_remaps_cover_every_shim() {
    let remapped: Vec<&str> = CompilerFamily::Msvc
        .remaps()
        .iter()
        .map(|SymbolRemap { standard, .. }| *standard)
        .collect();
    assert_eq!(
        remapped,
        vec!["close", "open", "read", "snprintf", "strdup", "vsnprintf", "write"]
    );
    for remap in CompilerFamily::Msvc.remaps() {
        assert_eq!(remap.actual, format!("_{}", remap.standard));
    }
    assert!(CompilerFamily::Gnu.remaps().is_empty());
}

#[test]
fn test_fallback_only_configuration() {
    let config = BuildConfig {
        compiler_family: CompilerFamily::Other,
        capabilities: Capabilities {
            strdup: false,
            strlcpy: false,
            snprintf: false,
            vsnprintf: false,
        },
        ..BuildConfig::CURRENT
    };
    let table = config.symbol_table();
    for name in ["strdup", "strlcpy", "snprintf", "vsnprintf"] {
        assert_eq!(table[name], format!("_mxml_{}", name));
    }
    assert_eq!(table["read"], "read");
    assert_eq!(config.fallbacks().len(), 4);
}

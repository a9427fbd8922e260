//! Identifier normalization.
//!
//! Wire names are hyphenated, sometimes start with a digit and sometimes
//! collide with Rust keywords. The [`Normalizer`] turns them into legal,
//! unique identifiers and remembers every mapping so the wire name can be
//! recovered from the code name.
//!
//! ## Rules
//!
//! Applied in order to field and module names:
//!
//! 1. ASCII-lowercase; every character outside `[a-z0-9_]` becomes `_`
//! 2. Reserved words get a trailing `_` (`type` → `type_`, `static` → `static_`)
//! 3. A leading digit gets an `n` prefix (`5g-modem` → `n5g_modem`)
//! 4. The pair is recorded per scope; a second wire name claiming the same
//!    code name is an [`IdentifierCollision`]
//!
//! Type names are the UpperCamelCase of code names and are registered in a
//! per-resource scope the same way.
//!
//! ## Concurrency
//!
//! One [`Normalizer`] is shared by every worker of a run. All reads and
//! writes go through a single mutex.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use heck::ToUpperCamelCase;

use crate::errors::IdentifierCollision;

/// Strict and reserved keywords of the 2024 edition, plus the bare `_`.
const RUST_KEYWORDS: &[&str] = &[
    "_", "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Field names taken by every generated client struct.
const FIELD_RESERVED: &[&str] = &["endpoint"];

/// Module names taken by generated artifacts or by crates a module could shadow.
const MODULE_RESERVED: &[&str] = &[
    "model",
    "client",
    "validators",
    "tests",
    "std",
    "core",
    "alloc",
];

/// Type names that would shadow prelude items used by generated code.
const TYPE_RESERVED: &[&str] = &["Self", "Option", "Result", "String", "Vec", "Box"];

/// What kind of identifier a scope holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeKind {
    /// Struct fields and child table attributes of one table.
    Fields,
    /// Child modules of one parent module.
    Modules,
    /// Generated type names of one resource.
    Types,
}

impl ScopeKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Fields => "fields",
            Self::Modules => "modules",
            Self::Types => "types",
        }
    }
}

/// A namespace in which code names must be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scope {
    pub kind: ScopeKind,
    pub path: String,
}

impl Scope {
    /// Fields of a table. Child tables use `<parent>><child wire name>`.
    pub fn fields(table: impl Into<String>) -> Self {
        Self {
            kind: ScopeKind::Fields,
            path: table.into(),
        }
    }

    /// Child modules of the module at `parent` (e.g. `config.firewall`).
    pub fn modules(parent: impl Into<String>) -> Self {
        Self {
            kind: ScopeKind::Modules,
            path: parent.into(),
        }
    }

    /// Type names generated for the resource at `dotted_path`.
    pub fn types(dotted_path: impl Into<String>) -> Self {
        Self {
            kind: ScopeKind::Types,
            path: dotted_path.into(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.path)
    }
}

#[derive(Debug, Default)]
struct NameTable {
    /// (scope, wire name) → code name
    forward: HashMap<(Scope, String), String>,
    /// (scope, code name) → wire name
    reverse: HashMap<(Scope, String), String>,
}

/// Process-wide, scope-keyed mapping between wire names and code names.
///
/// ## Examples
///
/// ```
/// use stencil_gen::naming::{Normalizer, Scope};
///
/// let normalizer = Normalizer::new();
/// let scope = Scope::fields("config.system.interface");
///
/// assert_eq!(normalizer.normalize("allow-access", &scope).unwrap(), "allow_access");
/// assert_eq!(normalizer.normalize("type", &scope).unwrap(), "type_");
/// assert_eq!(normalizer.denormalize("type_", &scope).as_deref(), Some("type"));
///
/// // A second spelling of the same identifier is refused
/// assert!(normalizer.normalize("allow_access", &scope).is_err());
/// ```
#[derive(Debug, Default)]
pub struct Normalizer {
    table: Mutex<NameTable>,
}

impl Normalizer {
    /// Creates an empty name table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the code name for `wire_name` in `scope`, recording the pair.
    ///
    /// Normalizing the same wire name again returns the same code name.
    ///
    /// ## Errors
    ///
    /// Returns [`IdentifierCollision`] if another wire name already owns the
    /// resulting code name in `scope`.
    pub fn normalize(&self, wire_name: &str, scope: &Scope) -> Result<String, IdentifierCollision> {
        let code_name = to_identifier(wire_name, scope.kind);
        self.record(scope, wire_name, code_name)
    }

    /// Registers a generated type name under `key` (e.g. `"model:srcintf"`).
    ///
    /// ## Errors
    ///
    /// Returns [`IdentifierCollision`] if another key already owns the name.
    pub fn register_type(
        &self,
        key: &str,
        type_name: String,
        scope: &Scope,
    ) -> Result<String, IdentifierCollision> {
        self.record(scope, key, type_name)
    }

    /// Returns the wire name recorded for `code_name` in `scope`.
    pub fn denormalize(&self, code_name: &str, scope: &Scope) -> Option<String> {
        self.lock()
            .reverse
            .get(&(scope.clone(), code_name.to_string()))
            .cloned()
    }

    /// Number of recorded pairs across all scopes.
    pub fn len(&self) -> usize {
        self.lock().forward.len()
    }

    /// Returns `true` if nothing was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(
        &self,
        scope: &Scope,
        wire_name: &str,
        code_name: String,
    ) -> Result<String, IdentifierCollision> {
        let mut table = self.lock();

        let forward_key = (scope.clone(), wire_name.to_string());
        if let Some(existing) = table.forward.get(&forward_key) {
            return Ok(existing.clone());
        }

        let reverse_key = (scope.clone(), code_name.clone());
        if let Some(existing) = table.reverse.get(&reverse_key) {
            return Err(IdentifierCollision {
                scope: scope.to_string(),
                code_name,
                existing: existing.clone(),
                incoming: wire_name.to_string(),
            });
        }

        table.forward.insert(forward_key, code_name.clone());
        table.reverse.insert(reverse_key, wire_name.to_string());
        Ok(code_name)
    }

    fn lock(&self) -> MutexGuard<'_, NameTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Applies the normalization rules without recording anything.
///
/// ## Examples
///
/// ```
/// use stencil_gen::naming::{to_identifier, ScopeKind};
///
/// assert_eq!(to_identifier("5g-modem", ScopeKind::Modules), "n5g_modem");
/// assert_eq!(to_identifier("global", ScopeKind::Modules), "global");
/// assert_eq!(to_identifier("static", ScopeKind::Modules), "static_");
/// assert_eq!(to_identifier("tests", ScopeKind::Modules), "tests_");
/// assert_eq!(to_identifier("tests", ScopeKind::Fields), "tests");
/// ```
pub fn to_identifier(wire_name: &str, kind: ScopeKind) -> String {
    let mut ident: String = wire_name
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if ident.is_empty() {
        ident.push('_');
    }

    if is_reserved(&ident, kind) {
        ident.push('_');
    }

    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, 'n');
    }

    ident
}

fn is_reserved(ident: &str, kind: ScopeKind) -> bool {
    RUST_KEYWORDS.contains(&ident)
        || match kind {
            ScopeKind::Fields => FIELD_RESERVED.contains(&ident),
            ScopeKind::Modules => MODULE_RESERVED.contains(&ident),
            ScopeKind::Types => false,
        }
}

/// Builds an UpperCamelCase type name from code name parts.
///
/// ## Examples
///
/// ```
/// use stencil_gen::naming::type_name;
///
/// assert_eq!(type_name(&["system", "n5g_modem"]), "SystemN5gModem");
/// assert_eq!(type_name(&["firewall", "policy", "srcintf"]), "FirewallPolicySrcintf");
/// assert_eq!(type_name(&["self_"]), "Self_");
/// ```
pub fn type_name<S: AsRef<str>>(parts: &[S]) -> String {
    let joined = parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("_");
    let mut name = joined.to_upper_camel_case();
    if name.is_empty() {
        name.push_str("Resource");
    }
    if TYPE_RESERVED.contains(&name.as_str()) {
        name.push('_');
    }
    name
}

/// Name of the constant holding a field's declared enum values.
pub fn enum_const_name(code_name: &str) -> String {
    format!("{}_VALUES", code_name.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphens_become_underscores() {
        assert_eq!(to_identifier("src-intf", ScopeKind::Fields), "src_intf");
        assert_eq!(to_identifier("Auth-Type", ScopeKind::Fields), "auth_type");
        assert_eq!(to_identifier("a.b c", ScopeKind::Fields), "a_b_c");
    }

    #[test]
    fn keywords_get_trailing_underscore() {
        for kw in ["type", "match", "static", "gen", "async", "self", "crate"] {
            assert_eq!(to_identifier(kw, ScopeKind::Fields), format!("{kw}_"));
            assert_eq!(to_identifier(kw, ScopeKind::Modules), format!("{kw}_"));
        }
        // Not a keyword: left alone everywhere
        assert_eq!(to_identifier("global", ScopeKind::Fields), "global");
    }

    #[test]
    fn scope_specific_reservations() {
        assert_eq!(to_identifier("endpoint", ScopeKind::Fields), "endpoint_");
        assert_eq!(to_identifier("endpoint", ScopeKind::Modules), "endpoint");
        assert_eq!(to_identifier("model", ScopeKind::Modules), "model_");
        assert_eq!(to_identifier("model", ScopeKind::Fields), "model");
        assert_eq!(to_identifier("std", ScopeKind::Modules), "std_");
    }

    #[test]
    fn leading_digit_gets_prefix() {
        assert_eq!(to_identifier("5g-modem", ScopeKind::Modules), "n5g_modem");
        assert_eq!(to_identifier("802-1x", ScopeKind::Fields), "n802_1x");
        assert_eq!(to_identifier("ipv6", ScopeKind::Fields), "ipv6");
    }

    #[test]
    fn empty_and_underscore_names_stay_legal() {
        assert_eq!(to_identifier("", ScopeKind::Fields), "__");
        assert_eq!(to_identifier("_", ScopeKind::Fields), "__");
        assert_eq!(to_identifier("-", ScopeKind::Fields), "__");
    }

    #[test]
    fn normalize_is_idempotent_per_wire_name() {
        let normalizer = Normalizer::new();
        let scope = Scope::fields("config.firewall.policy");
        let first = normalizer.normalize("srcintf", &scope).unwrap();
        let second = normalizer.normalize("srcintf", &scope).unwrap();
        assert_eq!(first, second);
        assert_eq!(normalizer.len(), 1);
    }

    #[test]
    fn collision_in_same_scope_is_refused() {
        let normalizer = Normalizer::new();
        let scope = Scope::fields("config.system.dns");
        normalizer.normalize("dns-over-tls", &scope).unwrap();
        match normalizer.normalize("dns_over_tls", &scope) {
            Err(collision) => {
                assert_eq!(collision.code_name, "dns_over_tls");
                assert_eq!(collision.existing, "dns-over-tls");
                assert_eq!(collision.incoming, "dns_over_tls");
                assert_eq!(collision.scope, "fields:config.system.dns");
            }
            Ok(name) => panic!("Expected collision, got: {}", name),
        }
    }

    #[test]
    fn same_name_in_other_scope_is_fine() {
        let normalizer = Normalizer::new();
        normalizer
            .normalize("a-b", &Scope::fields("config.x"))
            .unwrap();
        assert_eq!(
            normalizer.normalize("a_b", &Scope::fields("config.y")).unwrap(),
            "a_b"
        );
        // Same path, different kind
        assert_eq!(
            normalizer.normalize("a_b", &Scope::modules("config.x")).unwrap(),
            "a_b"
        );
    }

    #[test]
    fn denormalize_unknown_is_none() {
        let normalizer = Normalizer::new();
        assert!(normalizer.denormalize("x", &Scope::fields("t")).is_none());
        assert!(normalizer.is_empty());
    }

    #[test]
    fn type_registration_detects_clashes() {
        let normalizer = Normalizer::new();
        let scope = Scope::types("config.firewall.policy");
        normalizer
            .register_type("client:", "FirewallPolicyClient".to_string(), &scope)
            .unwrap();
        let clash = normalizer.register_type("model:client", "FirewallPolicyClient".to_string(), &scope);
        assert!(clash.is_err());
    }

    #[test]
    fn type_names_avoid_prelude() {
        assert_eq!(type_name(&["option"]), "Option_");
        assert_eq!(type_name(&["vec"]), "Vec_");
        assert_eq!(type_name(&["static_"]), "Static");
        assert_eq!(type_name::<&str>(&[]), "Resource");
    }

    #[test]
    fn enum_constant_names() {
        assert_eq!(enum_const_name("action"), "ACTION_VALUES");
        assert_eq!(enum_const_name("type_"), "TYPE__VALUES");
        assert_eq!(enum_const_name("n5g_mode"), "N5G_MODE_VALUES");
    }

    mod property_tests {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn name_round_trip(wire in "[A-Za-z0-9_.-]{0,24}") {
                let normalizer = Normalizer::new();
                let scope = Scope::fields("config.test");
                let code = normalizer.normalize(&wire, &scope).unwrap();
                prop_assert_eq!(normalizer.denormalize(&code, &scope), Some(wire));
            }

            #[test]
            fn normalized_names_are_identifiers(wire in "[A-Za-z0-9 _.-]{0,24}") {
                for kind in [ScopeKind::Fields, ScopeKind::Modules] {
                    let code = to_identifier(&wire, kind);
                    prop_assert!(syn::parse_str::<syn::Ident>(&code).is_ok(), "not an identifier: {}", code);
                }
            }

            #[test]
            fn normalization_is_deterministic(wire in "[a-z0-9-]{1,16}") {
                let a = Normalizer::new().normalize(&wire, &Scope::modules("config")).unwrap();
                let b = Normalizer::new().normalize(&wire, &Scope::modules("config")).unwrap();
                prop_assert_eq!(a, b);
            }
        }
    }
}

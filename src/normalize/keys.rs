//! Key vocabulary shared by the readers, the normalizer and the writers

/// Singular block-format keys and their plural schema form
const PLURALS: &[(&str, &str)] = &[
    ("access-address", "access-addresses"),
    ("address", "addresses"),
    ("alternate-access-address", "alternate-access-addresses"),
    ("tls-access-address", "tls-access-addresses"),
    ("tls-address", "tls-addresses"),
    ("tls-alternate-access-address", "tls-alternate-access-addresses"),
    ("mesh-seed-address-port", "mesh-seed-address-ports"),
    ("tls-mesh-seed-address-port", "tls-mesh-seed-address-ports"),
    ("multicast-group", "multicast-groups"),
    ("node-address-port", "node-address-ports"),
    ("dc-node-address-port", "dc-node-address-ports"),
    ("http-url", "http-urls"),
    ("role-query-pattern", "role-query-patterns"),
    ("report-data-op-role", "report-data-op-roles"),
    ("report-data-op-user", "report-data-op-users"),
    ("ignore-bin", "ignore-bins"),
    ("ignore-set", "ignore-sets"),
    ("ship-bin", "ship-bins"),
    ("ship-set", "ship-sets"),
    ("device", "devices"),
    ("file", "files"),
    ("mount", "mounts"),
    ("namespace", "namespaces"),
    ("set", "sets"),
    ("datacenter", "datacenters"),
    ("dc", "dcs"),
    ("feature-key-file", "feature-key-files"),
    ("tls-authenticate-client", "tls-authenticate-client"),
    ("logging", "logging"),
    ("tls", "tls"),
    ("dc-int-ext-ipmap", "dc-int-ext-ipmap"),
    ("report-data-op", "report-data-op"),
];

/// Keys that hold either a bare type token or a full typed section
pub const TYPED_CONTEXTS: &[&str] = &["storage-engine", "index-type", "sindex-type"];

/// Keys accepted either as a single scalar or as a list
pub const DUAL_CARDINALITY: &[&str] = &["feature-key-file", "tls-authenticate-client"];

/// The block key opening the logging sinks
pub const LOGGING: &str = "logging";

/// Block directive carrying a `CONTEXT LEVEL` pair inside a logging sink
pub const LOGGING_CONTEXT: &str = "context";

/// Sink keywords that open a logging section without an identifier
pub const LOGGING_SINKS: &[&str] = &["console", "syslog"];

/// Logging sink directive that takes an identifier (the log file path)
pub const LOGGING_FILE: &str = "file";

/// Directives of a logging sink that are not `context` levels
pub const LOGGING_SINK_DIRECTIVES: &[&str] = &["facility", "path", "tag"];

/// Plural form of a key, if the key takes part in the singular/plural rewrite
#[must_use]
#[inline]
pub fn plural_of(key: &str) -> Option<&'static str> {
    PLURALS
        .iter()
        .find(|(singular, _)| *singular == key)
        .map(|(_, plural)| *plural)
}

/// Singular form of a plural key
#[must_use]
#[inline]
pub fn singular_of(key: &str) -> Option<&'static str> {
    PLURALS
        .iter()
        .find(|(_, plural)| *plural == key)
        .map(|(singular, _)| *singular)
}

/// Whether a key is in the singular column of the table
#[must_use]
#[inline]
pub fn is_listed(key: &str) -> bool {
    plural_of(key).is_some()
}

/// Whether a key is a singular form that must not survive normalization
#[must_use]
#[inline]
pub fn is_renamed_singular(key: &str) -> bool {
    plural_of(key).is_some_and(|plural| plural != key)
}

#[must_use]
#[inline]
pub fn is_typed_context(key: &str) -> bool {
    TYPED_CONTEXTS.contains(&key)
}

#[must_use]
#[inline]
pub fn is_dual_cardinality(key: &str) -> bool {
    DUAL_CARDINALITY.contains(&key)
}

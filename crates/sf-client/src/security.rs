//! Input safety helpers for building Salesforce requests.
//!
//! Record operations splice type names, field names and identifiers into
//! URL paths; SOAP login splices credentials into XML. Everything that
//! crosses those boundaries goes through one of the helpers below.
//!
//! ```rust
//! use busbar_sf_client::security::{soql, url};
//!
//! assert!(soql::is_safe_sobject_name("Case"));
//! assert!(!soql::is_safe_sobject_name("Case/../../limits"));
//!
//! let encoded = url::encode_param("ext id/1");
//! assert_eq!(encoded, "ext%20id%2F1");
//! ```

/// SOQL name validation.
pub mod soql {
    /// Validate that a field name contains only safe characters.
    ///
    /// Field names start with a letter and continue with ASCII alphanumerics
    /// or underscores, which covers the `__c` / `__r` custom suffixes.
    ///
    /// ```rust
    /// use busbar_sf_client::security::soql;
    ///
    /// assert!(soql::is_safe_field_name("External_Key__c"));
    /// assert!(!soql::is_safe_field_name("Bad'; DROP TABLE--"));
    /// ```
    #[must_use]
    pub fn is_safe_field_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {}
            _ => return false,
        }
        chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    }

    /// Validate that a SObject name is safe.
    ///
    /// SObject names follow the same rules as field names.
    #[must_use]
    pub fn is_safe_sobject_name(name: &str) -> bool {
        is_safe_field_name(name)
    }
}

/// URL encoding utilities for parameter safety.
pub mod url {
    /// URL-encode a path segment or query value.
    ///
    /// User-provided values cannot break out of the path or add parameters
    /// once encoded.
    ///
    /// ```rust
    /// use busbar_sf_client::security::url;
    ///
    /// assert_eq!(url::encode_param("001/../../secret"), "001%2F..%2F..%2Fsecret");
    /// ```
    #[must_use]
    pub fn encode_param(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }
}

/// XML escaping utilities for SOAP envelopes.
pub mod xml {
    /// Escape a string for safe inclusion in XML content.
    ///
    /// ```rust
    /// use busbar_sf_client::security::xml;
    ///
    /// let safe = xml::escape("p<ss>&'word\"");
    /// assert_eq!(safe, "p&lt;ss&gt;&amp;&apos;word&quot;");
    /// ```
    #[must_use]
    pub fn escape(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 16);
        for ch in value.chars() {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }
}

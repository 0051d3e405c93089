//! URL-encoded sign-in form.

use std::collections::HashMap;

/// Credential fields posted by the sign-in page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigninForm {
    pub token: Option<String>,
    pub url: Option<String>,
}

impl SigninForm {
    /// Parse an `application/x-www-form-urlencoded` body.
    /// Unknown fields are ignored; a repeated field keeps its last value.
    pub fn parse(body: &[u8]) -> Self {
        let fields: HashMap<String, String> = url::form_urlencoded::parse(body)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Self {
            token: fields.get("token").cloned(),
            url: fields.get("url").cloned(),
        }
    }
}

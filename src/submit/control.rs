//! Control field extraction.
//!
//! Fields whose names start with an underscore steer the relay itself and
//! are never forwarded upstream. Three of them are read here: `_portalId`
//! and `_formId` (required) and `_region` (optional).

use super::form::SubmittedForm;

pub const PORTAL_ID_FIELD: &str = "_portalId";
pub const FORM_ID_FIELD: &str = "_formId";
pub const REGION_FIELD: &str = "_region";

pub const DEFAULT_REGION: &str = "na2";

#[must_use]
pub fn is_control_field(name: &str) -> bool {
    name.starts_with('_')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlParameters {
    pub portal_id: String,
    pub form_id: String,
    pub region: String,
}

pub const MISSING_IDENTIFIERS: &str = "Missing _portalId or _formId";

impl ControlParameters {
    /// Read the control parameters out of a parsed form.
    ///
    /// Empty values count as absent; `None` means a required identifier
    /// is missing. The region falls back to [`DEFAULT_REGION`] and is
    /// lowercased but otherwise taken as sent.
    #[must_use]
    pub fn extract(form: &SubmittedForm) -> Option<Self> {
        let non_empty = |name: &str| form.field(name).filter(|v| !v.is_empty());

        let portal_id = non_empty(PORTAL_ID_FIELD)?;
        let form_id = non_empty(FORM_ID_FIELD)?;
        let region = non_empty(REGION_FIELD)
            .unwrap_or(DEFAULT_REGION)
            .to_lowercase();

        Some(Self {
            portal_id: portal_id.to_string(),
            form_id: form_id.to_string(),
            region,
        })
    }
}

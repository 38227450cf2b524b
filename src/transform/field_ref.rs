//! Custom-field references inside condition and action field names.
//!
//! The API addresses a custom field by a synthesized name such as
//! `custom_fields_360012345`. Configuration spells the same thing as
//! `field = "custom_field"` plus a separate numeric id.

use crate::error::DeskError;

/// Logical name for a custom ticket field reference.
pub const CUSTOM_FIELD: &str = "custom_field";

/// Logical name for the alternate ticket-field reference (conditions only).
pub const TICKET_FIELD: &str = "ticket_field";

/// Wire prefix for [`CUSTOM_FIELD`].
pub const CUSTOM_FIELD_PREFIX: &str = "custom_fields_";

/// Wire prefix for [`TICKET_FIELD`].
pub const TICKET_FIELD_PREFIX: &str = "ticket_fields_";

/// Which prefixes a field name may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefScope {
    /// Conditions accept both `custom_fields_` and `ticket_fields_`.
    Condition,
    /// Actions accept only `custom_fields_`.
    Action,
}

impl RefScope {
    fn prefixes(self) -> &'static [(&'static str, &'static str)] {
        match self {
            RefScope::Condition => &[
                (CUSTOM_FIELD_PREFIX, CUSTOM_FIELD),
                (TICKET_FIELD_PREFIX, TICKET_FIELD),
            ],
            RefScope::Action => &[(CUSTOM_FIELD_PREFIX, CUSTOM_FIELD)],
        }
    }
}

/// A resolved condition/action field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRef {
    /// A business field used as-is (`status`, `priority`, ...).
    Named(String),
    /// A custom ticket field by id.
    CustomField(i64),
    /// The alternate ticket-field spelling by id.
    TicketField(i64),
}

impl FieldRef {
    /// Resolves the configuration spelling of a field.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::Validation` when the name is empty or a custom
    /// field reference has no id.
    pub fn from_config(
        name: &str,
        custom_field_id: Option<i64>,
        scope: RefScope,
    ) -> Result<Self, DeskError> {
        if name.is_empty() {
            return Err(DeskError::validation("field must not be empty"));
        }

        let needs_id = |logical: &str| {
            custom_field_id.ok_or_else(|| {
                DeskError::validation(format!(
                    "custom_field_id is required when field is {logical:?}"
                ))
            })
        };

        match (name, scope) {
            (CUSTOM_FIELD, _) => Ok(FieldRef::CustomField(needs_id(CUSTOM_FIELD)?)),
            (TICKET_FIELD, RefScope::Condition) => {
                Ok(FieldRef::TicketField(needs_id(TICKET_FIELD)?))
            }
            _ => Ok(FieldRef::Named(name.to_string())),
        }
    }

    /// Resolves a wire field name, recovering the custom-field id.
    ///
    /// Prefixes are tested in order; `custom_fields_` wins over
    /// `ticket_fields_`. Names without a known prefix pass through.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::FieldReference` when a prefixed name does not end
    /// in a base-10 id.
    pub fn from_wire(wire: &str, scope: RefScope) -> Result<Self, DeskError> {
        for (prefix, logical) in scope.prefixes() {
            if let Some(rest) = wire.strip_prefix(prefix) {
                let id = rest.parse::<i64>().map_err(|e| {
                    DeskError::field_reference(wire, format!("id {rest:?} is not an integer: {e}"))
                })?;
                return Ok(if *logical == CUSTOM_FIELD {
                    FieldRef::CustomField(id)
                } else {
                    FieldRef::TicketField(id)
                });
            }
        }
        Ok(FieldRef::Named(wire.to_string()))
    }

    /// Wire spelling of the field.
    pub fn to_wire(&self) -> String {
        match self {
            FieldRef::Named(name) => name.clone(),
            FieldRef::CustomField(id) => format!("{CUSTOM_FIELD_PREFIX}{id}"),
            FieldRef::TicketField(id) => format!("{TICKET_FIELD_PREFIX}{id}"),
        }
    }

    /// Configuration spelling of the field name.
    pub fn logical_name(&self) -> &str {
        match self {
            FieldRef::Named(name) => name,
            FieldRef::CustomField(_) => CUSTOM_FIELD,
            FieldRef::TicketField(_) => TICKET_FIELD,
        }
    }

    /// The custom-field id, for prefixed references.
    pub fn custom_field_id(&self) -> Option<i64> {
        match self {
            FieldRef::Named(_) => None,
            FieldRef::CustomField(id) | FieldRef::TicketField(id) => Some(*id),
        }
    }
}

//! Form fields, the UI boundary and the per-attempt form snapshot.
//!
//! The UI is reached only through [`FormView`]. At the start of an attempt the pipeline
//! reads every field once into a [`FormInput`] and never touches the view again until the
//! result is presented.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;

/// A field of the registration form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    FamilyName,
    Gender,
    BirthDate,
    IdentifierSystem,
    IdentifierValue,
    CellPhone,
    Email,
    Address,
    City,
    PostalCode,
}

impl FormField {
    /// Every field, in the order the form displays them.
    pub const ALL: [FormField; 11] = [
        FormField::Name,
        FormField::FamilyName,
        FormField::Gender,
        FormField::BirthDate,
        FormField::IdentifierSystem,
        FormField::IdentifierValue,
        FormField::CellPhone,
        FormField::Email,
        FormField::Address,
        FormField::City,
        FormField::PostalCode,
    ];

    /// Stable field id, as used by the form markup and JSON form files.
    pub fn id(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::FamilyName => "familyName",
            FormField::Gender => "gender",
            FormField::BirthDate => "birthDate",
            FormField::IdentifierSystem => "identifierSystem",
            FormField::IdentifierValue => "identifierValue",
            FormField::CellPhone => "cellPhone",
            FormField::Email => "email",
            FormField::Address => "address",
            FormField::City => "city",
            FormField::PostalCode => "postalCode",
        }
    }

    /// Human-readable label used in prompts and messages.
    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Given name",
            FormField::FamilyName => "Family name",
            FormField::Gender => "Gender",
            FormField::BirthDate => "Date of birth",
            FormField::IdentifierSystem => "Identification type",
            FormField::IdentifierValue => "Identification number",
            FormField::CellPhone => "Phone",
            FormField::Email => "Email",
            FormField::Address => "Address",
            FormField::City => "City",
            FormField::PostalCode => "Postal code",
        }
    }

    /// Look a field up by its id.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The UI side of the form.
///
/// Implemented by whatever renders the form (terminal prompt, test double, ...).
pub trait FormView {
    /// Current raw value of a field, or `None` if the UI has no such field.
    fn value(&self, field: FormField) -> Option<String>;

    /// Clear every field back to its empty default.
    fn reset(&mut self);

    /// Move input focus to a field.
    fn focus(&mut self, field: FormField);

    /// Drop any focus left by an earlier attempt.
    fn clear_focus(&mut self);

    /// Enable or disable the submit control.
    fn set_submit_enabled(&mut self, enabled: bool);
}

/// Trimmed snapshot of the form taken at the start of one attempt.
///
/// Also deserialisable from a camelCase JSON object; missing keys read as empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FormInput {
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    #[serde(deserialize_with = "trimmed")]
    pub family_name: String,
    #[serde(deserialize_with = "trimmed")]
    pub gender: String,
    #[serde(deserialize_with = "trimmed")]
    pub birth_date: String,
    #[serde(deserialize_with = "trimmed")]
    pub identifier_system: String,
    #[serde(deserialize_with = "trimmed")]
    pub identifier_value: String,
    #[serde(deserialize_with = "trimmed")]
    pub cell_phone: String,
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
    #[serde(deserialize_with = "trimmed")]
    pub address: String,
    #[serde(deserialize_with = "trimmed")]
    pub city: String,
    #[serde(deserialize_with = "trimmed")]
    pub postal_code: String,
}

fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s.trim().to_owned())
}

impl FormInput {
    /// Read every field from the view. Absent fields read as empty; never fails.
    pub fn read<V: FormView + ?Sized>(view: &V) -> Self {
        let get = |field: FormField| {
            view.value(field)
                .map(|v| v.trim().to_owned())
                .unwrap_or_default()
        };

        Self {
            name: get(FormField::Name),
            family_name: get(FormField::FamilyName),
            gender: get(FormField::Gender),
            birth_date: get(FormField::BirthDate),
            identifier_system: get(FormField::IdentifierSystem),
            identifier_value: get(FormField::IdentifierValue),
            cell_phone: get(FormField::CellPhone),
            email: get(FormField::Email),
            address: get(FormField::Address),
            city: get(FormField::City),
            postal_code: get(FormField::PostalCode),
        }
    }

    /// Value of a single field.
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::FamilyName => &self.family_name,
            FormField::Gender => &self.gender,
            FormField::BirthDate => &self.birth_date,
            FormField::IdentifierSystem => &self.identifier_system,
            FormField::IdentifierValue => &self.identifier_value,
            FormField::CellPhone => &self.cell_phone,
            FormField::Email => &self.email,
            FormField::Address => &self.address,
            FormField::City => &self.city,
            FormField::PostalCode => &self.postal_code,
        }
    }
}

/// In-memory form state.
///
/// Backs the terminal form and the CLI, and doubles as the UI in tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormState {
    values: BTreeMap<FormField, String>,
    focused: Option<FormField>,
    submit_enabled: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
            focused: None,
            submit_enabled: true,
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate a form from a snapshot, skipping empty values.
    pub fn from_input(input: &FormInput) -> Self {
        let mut state = Self::new();
        for field in FormField::ALL {
            let value = input.get(field);
            if !value.is_empty() {
                state.set(field, value);
            }
        }
        state
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn focused(&self) -> Option<FormField> {
        self.focused
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    /// True when no field holds a value.
    pub fn is_empty(&self) -> bool {
        self.values.values().all(|v| v.is_empty())
    }
}

impl FormView for FormState {
    fn value(&self, field: FormField) -> Option<String> {
        self.values.get(&field).cloned()
    }

    fn reset(&mut self) {
        self.values.clear();
        self.focused = None;
    }

    fn focus(&mut self, field: FormField) {
        self.focused = Some(field);
    }

    fn clear_focus(&mut self) {
        self.focused = None;
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }
}

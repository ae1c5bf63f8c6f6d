//! Descriptions of request body types and their properties.

use serde::{Deserialize, Serialize};

use crate::method::HttpMethod;
use crate::param::{InputConstraints, InputType};
use crate::suggest::PossibleValues;

/// Value type of a parameter or property, used to choose an input type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Free text.
    #[default]
    String,
    /// `true` / `false`.
    Boolean,
    /// Whole number.
    Integer,
    /// Decimal number.
    Decimal,
    /// Calendar date.
    Date,
    /// Date and time without zone.
    DateTime,
    /// Time of day.
    Time,
    /// E-mail address.
    Email,
    /// Absolute URL.
    Url,
    /// Nested object; see [`PropertyDescriptor::with_nested`].
    Object,
}

impl ValueType {
    /// Default HTML input type for values of this type.
    pub fn input_type(self) -> InputType {
        match self {
            Self::Boolean => InputType::Checkbox,
            Self::Integer | Self::Decimal => InputType::Number,
            Self::Date => InputType::Date,
            Self::DateTime => InputType::DatetimeLocal,
            Self::Time => InputType::Time,
            Self::Email => InputType::Email,
            Self::Url => InputType::Url,
            Self::String | Self::Object => InputType::Text,
        }
    }
}

/// How a body property may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyAccess {
    /// Writable on create and update.
    #[default]
    ReadWrite,
    /// Only settable when the resource is created (POST).
    CreateOnly,
    /// Never accepted as input.
    ReadOnly,
}

/// One declared property of a [`BeanType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub(crate) name: String,
    pub(crate) value_type: ValueType,
    pub(crate) access: PropertyAccess,
    pub(crate) required: bool,
    pub(crate) read_only: bool,
    pub(crate) collection: bool,
    pub(crate) input_type: Option<InputType>,
    pub(crate) possible_values: PossibleValues,
    pub(crate) constraints: InputConstraints,
    pub(crate) nested: Option<BeanType>,
    pub(crate) description: Option<String>,
}

impl PropertyDescriptor {
    /// Declare a writable property.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            access: PropertyAccess::ReadWrite,
            required: false,
            read_only: false,
            collection: false,
            input_type: None,
            possible_values: PossibleValues::None,
            constraints: InputConstraints::default(),
            nested: None,
            description: None,
        }
    }

    /// Declare a nested object property whose own properties are flattened
    /// into dotted names.
    pub fn nested(name: impl Into<String>, bean: BeanType) -> Self {
        Self::new(name, ValueType::Object).with_nested(bean)
    }

    /// Set write access.
    #[must_use]
    pub fn with_access(mut self, access: PropertyAccess) -> Self {
        self.access = access;
        self
    }

    /// Mark as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as read-only input: rendered, but not editable.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Mark as collection-valued.
    #[must_use]
    pub fn collection(mut self) -> Self {
        self.collection = true;
        self
    }

    /// Override the input type derived from the value type.
    #[must_use]
    pub fn with_input_type(mut self, input_type: InputType) -> Self {
        self.input_type = Some(input_type);
        self
    }

    /// Declare allowed values.
    #[must_use]
    pub fn with_possible_values(mut self, possible_values: PossibleValues) -> Self {
        self.possible_values = possible_values;
        self
    }

    /// Set constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: InputConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Attach the nested type.
    #[must_use]
    pub fn with_nested(mut self, bean: BeanType) -> Self {
        self.nested = Some(bean);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write access.
    pub fn access(&self) -> PropertyAccess {
        self.access
    }

    /// Whether the property can be written by the given method.
    pub fn is_writable_by(&self, method: HttpMethod) -> bool {
        match self.access {
            PropertyAccess::ReadWrite => true,
            PropertyAccess::CreateOnly => method == HttpMethod::Post,
            PropertyAccess::ReadOnly => false,
        }
    }

    /// Effective input type.
    pub fn input_type(&self) -> InputType {
        self.input_type.unwrap_or_else(|| self.value_type.input_type())
    }
}

/// A request body type: a name and its properties in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanType {
    name: String,
    properties: Vec<PropertyDescriptor>,
}

impl BeanType {
    /// Create an empty type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Add a property.
    #[must_use]
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_type_follows_value_type() {
        assert_eq!(ValueType::Boolean.input_type(), InputType::Checkbox);
        assert_eq!(ValueType::Decimal.input_type(), InputType::Number);
        assert_eq!(ValueType::DateTime.input_type(), InputType::DatetimeLocal);

        let overridden =
            PropertyDescriptor::new("secret", ValueType::String).with_input_type(InputType::Password);
        assert_eq!(overridden.input_type(), InputType::Password);
    }

    #[test]
    fn test_create_only_is_writable_by_post() {
        let p = PropertyDescriptor::new("performer", ValueType::String)
            .with_access(PropertyAccess::CreateOnly);
        assert!(p.is_writable_by(HttpMethod::Post));
        assert!(!p.is_writable_by(HttpMethod::Put));

        let r = PropertyDescriptor::new("id", ValueType::Integer).with_access(PropertyAccess::ReadOnly);
        assert!(!r.is_writable_by(HttpMethod::Post));
    }
}

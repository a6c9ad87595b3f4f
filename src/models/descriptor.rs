// Schema descriptor model
// Plain data describing the types an executable schema is built from

use serde::{Deserialize, Serialize};

/// Scalar types a descriptor field can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Boolean,
}

impl ScalarKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarKind::String => "String",
            ScalarKind::Int => "Int",
            ScalarKind::Float => "Float",
            ScalarKind::Boolean => "Boolean",
        }
    }
}

/// A GraphQL type reference: a scalar, optionally a list, optionally non-null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeShape {
    pub scalar: ScalarKind,
    #[serde(default)]
    pub list: bool,
    #[serde(default)]
    pub non_null: bool,
}

impl TypeShape {
    pub fn scalar(scalar: ScalarKind) -> Self {
        Self {
            scalar,
            list: false,
            non_null: false,
        }
    }

    pub fn non_null(mut self) -> Self {
        self.non_null = true;
        self
    }

    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }
}

/// Where a field's value comes from at execution time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSource {
    /// A fixed JSON value
    Constant { value: serde_json::Value },
    /// The value of one of the field's own arguments
    Argument { name: String },
    /// A key of the request's execution context
    Context { key: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeShape,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentDescriptor>,
    pub source: FieldSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDescriptor {
    pub fn constant(name: impl Into<String>, ty: TypeShape, value: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            ty,
            arguments: Vec::new(),
            source: FieldSource::Constant { value },
            description: None,
        }
    }

    /// A field that returns its single argument `argument`
    pub fn echo(name: impl Into<String>, argument: impl Into<String>, ty: TypeShape) -> Self {
        let argument = argument.into();
        Self {
            name: name.into(),
            ty: ty.clone(),
            arguments: vec![ArgumentDescriptor {
                name: argument.clone(),
                ty: TypeShape { non_null: false, ..ty },
            }],
            source: FieldSource::Argument { name: argument },
            description: None,
        }
    }

    pub fn from_context(name: impl Into<String>, key: impl Into<String>, ty: TypeShape) -> Self {
        Self {
            name: name.into(),
            ty,
            arguments: Vec::new(),
            source: FieldSource::Context { key: key.into() },
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An object type. The first descriptor handed to the builder is the query root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            description: None,
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

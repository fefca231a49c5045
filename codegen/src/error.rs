use thiserror::Error;

/// Structural problems found while walking the schema tree. Reported per
/// entry; the loader keeps whatever was already built.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema root must be an object of components")]
    RootNotObject,

    #[error("component `{component}`: malformed `{section}` entry: {detail}")]
    Malformed {
        component: String,
        section: String,
        detail: String,
    },
}

/// Generation-time failures, fatal for the affected component's repository.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GenError {
    #[error("component `{0}`: no stored procedure bound as `read`")]
    MissingReadBinding(String),

    #[error("component `{component}`: index `{alias}` references unknown field `{field}`")]
    UnknownKeyField {
        component: String,
        alias: String,
        field: String,
    },

    #[error("component `{component}`: index `{alias}`: field `{field}` cannot be an index key")]
    UnsupportedKeyType {
        component: String,
        alias: String,
        field: String,
    },
}

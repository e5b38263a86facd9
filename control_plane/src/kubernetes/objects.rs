use getset::Getters;
use kube::{Resource, ResourceExt};
use std::fmt::{Display, Formatter, Write};
use thiserror::Error;
use typed_builder::TypedBuilder;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ObjectRefError {
    #[error("Object is missing a name")]
    MissingName,
}

#[derive(TypedBuilder, Getters, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    #[getset(get = "pub")]
    #[builder(setter(into))]
    kind: String,

    #[getset(get = "pub")]
    #[builder(default, setter(into))]
    namespace: Option<String>,

    #[getset(get = "pub")]
    #[builder(setter(into))]
    name: String,
}

impl Display for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())?;
        f.write_char('/')?;
        if let Some(namespace) = self.namespace() {
            f.write_str(namespace)?;
            f.write_char('/')?;
        }
        f.write_str(self.name())
    }
}

impl ObjectRef {
    pub fn for_object<K>(object: &K) -> Result<Self, ObjectRefError>
    where
        K: Resource<DynamicType = ()>,
    {
        let name = object.meta().name.clone().ok_or(ObjectRefError::MissingName)?;

        Ok(Self::builder()
            .kind(K::kind(&()))
            .namespace(object.namespace())
            .name(name)
            .build())
    }

    /// Best effort reference for log lines; unnamed objects render as `<unnamed>`.
    pub fn describe<K>(object: &K) -> Self
    where
        K: Resource<DynamicType = ()>,
    {
        Self::for_object(object).unwrap_or_else(|_| {
            Self::builder()
                .kind(K::kind(&()))
                .namespace(object.namespace())
                .name("<unnamed>")
                .build()
        })
    }
}

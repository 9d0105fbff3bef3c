/// Documentation string attached to a type or descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentedObject {
    documentation: String,
}

impl DocumentedObject {
    pub fn new(documentation: impl Into<String>) -> Self {
        Self {
            documentation: documentation.into(),
        }
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    pub fn set_documentation(&mut self, documentation: impl Into<String>) {
        self.documentation = documentation.into();
    }
}

/// Anything carrying a [`DocumentedObject`].
pub trait Documented {
    fn documented(&self) -> &DocumentedObject;

    fn documented_mut(&mut self) -> &mut DocumentedObject;

    fn documentation(&self) -> &str {
        self.documented().documentation()
    }

    fn set_documentation(&mut self, documentation: impl Into<String>)
    where
        Self: Sized,
    {
        self.documented_mut().set_documentation(documentation);
    }
}

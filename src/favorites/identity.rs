/// Who is using the device right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated { uid: String },
}

impl Identity {
    pub fn authenticated(uid: impl Into<String>) -> Self {
        Identity::Authenticated { uid: uid.into() }
    }

    pub fn uid(&self) -> Option<&str> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated { uid } => Some(uid),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.uid().is_some()
    }
}

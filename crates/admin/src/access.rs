/// What the current session allows the views to do.
///
/// Derived from the session once and handed down explicitly, so every panel sees the
/// same answer and tests can pick either state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    Anonymous,
    Authenticated,
}

impl Access {
    pub fn from_session(active: bool) -> Self {
        if active {
            Access::Authenticated
        } else {
            Access::Anonymous
        }
    }

    pub fn can_mutate(self) -> bool {
        matches!(self, Access::Authenticated)
    }
}

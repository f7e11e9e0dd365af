//! Viewer capability for scoping proposal and engagement listings.
//!
//! Listings are scoped once per authenticated role instead of branching on
//! the role at every query site: an alumnus sees proposals targeting their
//! opportunities, a student sees proposals addressed to or sent by them.

use uuid::Uuid;

/// The capability a listing query is scoped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalViewer {
    /// An alumnus viewing through their alumni profile.
    Alumnus { profile_id: Uuid },
    /// A student viewing through their student profile.
    Student { profile_id: Uuid },
}

/// The filter a repository applies for one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalScope {
    /// Rows whose opportunity is owned by this alumni profile.
    ByOwner(Uuid),
    /// Rows addressed to / created by this student profile.
    ByStudent(Uuid),
}

impl ProposalViewer {
    /// Resolves the listing scope for this viewer.
    pub fn scope(&self) -> ProposalScope {
        match *self {
            ProposalViewer::Alumnus { profile_id } => ProposalScope::ByOwner(profile_id),
            ProposalViewer::Student { profile_id } => ProposalScope::ByStudent(profile_id),
        }
    }

    /// The profile id behind this viewer.
    pub fn profile_id(&self) -> Uuid {
        match *self {
            ProposalViewer::Alumnus { profile_id } | ProposalViewer::Student { profile_id } => {
                profile_id
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alumnus_scopes_by_owner() {
        let profile_id = Uuid::new_v4();
        let viewer = ProposalViewer::Alumnus { profile_id };
        assert_eq!(viewer.scope(), ProposalScope::ByOwner(profile_id));
        assert_eq!(viewer.profile_id(), profile_id);
    }

    #[test]
    fn test_student_scopes_by_student() {
        let profile_id = Uuid::new_v4();
        let viewer = ProposalViewer::Student { profile_id };
        assert_eq!(viewer.scope(), ProposalScope::ByStudent(profile_id));
    }
}

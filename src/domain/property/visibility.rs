//! Read gate for property listings.

use super::Property;
use crate::domain::foundation::{OwnedByPartner, PartnerId};

/// Who is looking at listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Administrator,
    Partner(PartnerId),
    Public,
}

impl Viewer {
    /// Administrators see everything, partners their own listings in any
    /// state, everyone else active listings only.
    pub fn can_see(&self, property: &Property) -> bool {
        match self {
            Viewer::Administrator => true,
            Viewer::Partner(partner_id) => property.is_owned_by_partner(*partner_id),
            Viewer::Public => property.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::property::aggregate::tests::details;

    #[test]
    fn public_sees_only_active() {
        let mut property = Property::create(PartnerId::new(), details(), Timestamp::now()).unwrap();
        assert!(Viewer::Public.can_see(&property));
        property.is_active = false;
        assert!(!Viewer::Public.can_see(&property));
        assert!(Viewer::Administrator.can_see(&property));
    }

    #[test]
    fn partner_sees_own_inactive_listing_but_not_others() {
        let owner = PartnerId::new();
        let mut property = Property::create(owner, details(), Timestamp::now()).unwrap();
        property.is_active = false;
        assert!(Viewer::Partner(owner).can_see(&property));
        assert!(!Viewer::Partner(PartnerId::new()).can_see(&property));
    }
}

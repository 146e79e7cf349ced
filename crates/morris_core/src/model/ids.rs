//! Identifiers for screening entities

use serde::{Deserialize, Serialize};

/// Identifier of a parameter group.
///
/// Parameters sharing a `GroupId` always move together and are screened as a
/// single effective input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "group_{}", self.0)
    }
}

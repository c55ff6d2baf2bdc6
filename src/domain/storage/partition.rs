//! Named partitions ("buckets") of the key-value store

use std::fmt;

/// A named, independently keyed region of the key-value store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    /// identity -> password hash
    Users,
    /// session token -> session record
    Cookies,
    /// blog name -> external address
    BlogMapping,
    /// identity -> JSON list of owned blogs
    UserToBlog,
    /// port -> blog name
    PortBucket,
}

impl Partition {
    /// Every partition, in creation order
    pub const ALL: [Partition; 5] = [
        Partition::Users,
        Partition::Cookies,
        Partition::BlogMapping,
        Partition::UserToBlog,
        Partition::PortBucket,
    ];

    /// On-disk bucket name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Users => "UsersBucket",
            Self::Cookies => "CookieBucket",
            Self::BlogMapping => "BlogMappingBucket",
            Self::UserToBlog => "UserToBlog",
            Self::PortBucket => "PortBucket",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

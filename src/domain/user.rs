use time::OffsetDateTime;

/// A user as it may leave the service layer. There is deliberately no password field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A user together with the stored password hash. Only used for credential checks.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub username: String,
    pub bio: Option<String>,
}

impl ProfileUpdate {
    /// Trims optional fields and turns blank ones into `None`, so what is stored is what is returned.
    #[must_use]
    pub fn normalized(self) -> Self {
        let clean = |field: Option<String>| field.map(|f| f.trim().to_string()).filter(|f| !f.is_empty());
        Self { name: clean(self.name), username: self.username, bio: clean(self.bio) }
    }
}

impl User {
    /// Applies a profile edit in place. Avatar and email are untouched.
    pub fn apply(&mut self, update: ProfileUpdate) {
        self.name = update.name;
        self.username = update.username;
        self.bio = update.bio;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: 7,
            name: Some("Old Name".into()),
            username: "old".into(),
            email: "old@example.com".into(),
            avatar: Some("avatar.png".into()),
            bio: Some("bio".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_normalized_blanks_become_none() {
        let update =
            ProfileUpdate { name: Some("   ".into()), username: "new".into(), bio: Some("  hello \n".into()) }
                .normalized();

        assert_eq!(update.name, None);
        assert_eq!(update.bio.as_deref(), Some("hello"));
        assert_eq!(update.username, "new");
    }

    #[test]
    fn test_apply_profile_update() {
        let mut u = user();
        u.apply(ProfileUpdate { name: None, username: "new".into(), bio: Some("hello".into()) });

        assert_eq!(u.name, None);
        assert_eq!(u.username, "new");
        assert_eq!(u.bio.as_deref(), Some("hello"));
        // Untouched by profile edits
        assert_eq!(u.email, "old@example.com");
        assert_eq!(u.avatar.as_deref(), Some("avatar.png"));
    }
}

/*
 * Responsibility
 * - the authenticated-request context as handlers see it
 * - the auth middleware verifies the token and stores this in request
 *   extensions; handlers only ever touch this type
 */
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
}

impl AuthCtx {
    pub fn new(user_id: Uuid, email: String, role: String) -> Self {
        Self {
            user_id,
            email,
            role,
        }
    }

    /// Role names are stored as entered by an admin; compare loosely.
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }

    /// True when the caller is `user_id` themselves or an admin.
    pub fn is_self_or_admin(&self, user_id: Uuid) -> bool {
        self.user_id == user_id || self.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_check_ignores_case() {
        let ctx = AuthCtx::new(Uuid::new_v4(), "a@b.co".into(), "ADMIN".into());
        assert!(ctx.is_admin());

        let ctx = AuthCtx::new(Uuid::new_v4(), "a@b.co".into(), "member".into());
        assert!(!ctx.is_admin());
    }

    #[test]
    fn self_or_admin() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let ctx = AuthCtx::new(me, "a@b.co".into(), "member".into());
        assert!(ctx.is_self_or_admin(me));
        assert!(!ctx.is_self_or_admin(other));
    }
}

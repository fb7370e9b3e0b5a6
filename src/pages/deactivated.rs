use log::warn;

use super::AppContext;
use crate::model::User;

/// Shown to an officer whose account was switched off. Whatever is left of
/// the session is cleared once the user has been read for the message.
pub struct DeactivatedPage {
    pub user: Option<User>,
}

impl DeactivatedPage {
    pub fn open(ctx: &AppContext) -> Self {
        let user = ctx.session().user();
        if let Err(e) = ctx.session().clear_session() {
            warn!("Failed to clear session: {e}");
        }
        Self { user }
    }

    pub fn message(&self) -> String {
        match &self.user {
            Some(user) => format!(
                "The account for {} ({}) has been deactivated. Please contact the election administrator.",
                user.name, user.email
            ),
            None => "This account has been deactivated. Please contact the election administrator."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiError;
    use crate::mock_backend;
    use crate::model::{Role, Session};
    use crate::router::Route;

    #[rocket::async_test]
    async fn names_the_user_then_forgets_them() {
        let (ctx, _) = mock_backend::context().await;
        let mut session = Session::example(Role::Officer);
        session.token = mock_backend::DEACTIVATED_TOKEN.into();
        ctx.session().save_session(&session).unwrap();
        ctx.navigator().push(Route::OfficerDashboard);

        let err = ctx.api().voters().await.unwrap_err();
        assert!(matches!(err, ApiError::Deactivated(_)));

        let page = DeactivatedPage::open(&ctx);
        assert!(page.message().contains("Otto Officer"));
        assert!(ctx.session().user().is_none());

        let page = DeactivatedPage::open(&ctx);
        assert!(page.message().starts_with("This account"));
    }
}

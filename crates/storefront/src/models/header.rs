//! Header view model.
//!
//! The header renders in one of three shapes depending on the page and on
//! whether someone is logged in.

use super::SessionContext;

/// What the header shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderView {
    /// Login and registration pages: logo and a "Back to explore" link.
    AuthPage,
    /// Catalog page, nobody logged in: Login and Register buttons.
    Guest,
    /// Catalog page for a logged-in user: avatar, username, wallet, Logout.
    SignedIn { username: String, balance: String },
}

impl HeaderView {
    /// Header for the catalog page given the current session.
    #[must_use]
    pub fn for_catalog(session: Option<&SessionContext>) -> Self {
        session.map_or(Self::Guest, |context| Self::SignedIn {
            username: context.username.clone(),
            balance: context.balance.clone(),
        })
    }

    /// Whether this is the stripped-down login/register header.
    #[must_use]
    pub const fn is_auth_page(&self) -> bool {
        matches!(self, Self::AuthPage)
    }

    /// Username shown in the header, if logged in.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::SignedIn { username, .. } => Some(username),
            Self::AuthPage | Self::Guest => None,
        }
    }

    /// Wallet balance shown in the header, if logged in.
    #[must_use]
    pub fn balance(&self) -> Option<&str> {
        match self {
            Self::SignedIn { balance, .. } => Some(balance),
            Self::AuthPage | Self::Guest => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_header_for_guest() {
        let header = HeaderView::for_catalog(None);
        assert_eq!(header, HeaderView::Guest);
        assert!(header.username().is_none());
        assert!(!header.is_auth_page());
    }

    #[test]
    fn test_catalog_header_for_signed_in_user() {
        let context = SessionContext::new("token", "criodo", "5000");
        let header = HeaderView::for_catalog(Some(&context));
        assert_eq!(header.username(), Some("criodo"));
        assert_eq!(header.balance(), Some("5000"));
    }

    #[test]
    fn test_auth_page_header() {
        assert!(HeaderView::AuthPage.is_auth_page());
        assert!(HeaderView::AuthPage.username().is_none());
    }
}

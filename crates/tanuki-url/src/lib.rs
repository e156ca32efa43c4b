use smol_str::SmolStr;
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Small "service" to centralise the creation of URLs
///
/// Every identifier this node stores is built through here, so stored IDs are
/// always scheme-qualified absolute URIs in a single canonical form.
#[derive(Clone, TypedBuilder)]
pub struct UrlService {
    #[builder(setter(into))]
    scheme: SmolStr,
    #[builder(setter(into))]
    domain: SmolStr,
}

impl UrlService {
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.domain)
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[must_use]
    pub fn acct_uri(&self, username: &str) -> String {
        format!("acct:{username}@{}", self.domain)
    }

    #[must_use]
    pub fn activity_url(&self, id: Uuid) -> String {
        format!("{}/activities/{id}", self.base_url())
    }

    #[must_use]
    pub fn followers_url(&self, username: &str) -> String {
        format!("{}/followers", self.user_url(username))
    }

    #[must_use]
    pub fn following_url(&self, username: &str) -> String {
        format!("{}/following", self.user_url(username))
    }

    #[must_use]
    pub fn inbox_url(&self, username: &str) -> String {
        format!("{}/inbox", self.user_url(username))
    }

    #[must_use]
    pub fn outbox_url(&self, username: &str) -> String {
        format!("{}/outbox", self.user_url(username))
    }

    #[must_use]
    pub fn public_key_id(&self, username: &str) -> String {
        format!("{}#main-key", self.user_url(username))
    }

    #[must_use]
    pub fn user_url(&self, username: &str) -> String {
        format!("{}/users/{username}", self.base_url())
    }
}

#[cfg(test)]
mod test {
    use super::UrlService;

    fn url_service() -> UrlService {
        UrlService::builder()
            .scheme("https")
            .domain("tanuki.example")
            .build()
    }

    #[test]
    fn user_urls() {
        let url_service = url_service();

        assert_eq!(
            url_service.user_url("kou"),
            "https://tanuki.example/users/kou"
        );
        assert_eq!(
            url_service.inbox_url("kou"),
            "https://tanuki.example/users/kou/inbox"
        );
        assert_eq!(
            url_service.public_key_id("kou"),
            "https://tanuki.example/users/kou#main-key"
        );
        assert_eq!(url_service.acct_uri("kou"), "acct:kou@tanuki.example");
    }
}

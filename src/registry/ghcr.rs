//! GitHub package-versions API client for GHCR container images

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Owner;
use crate::registry::error::RegistryError;

/// Default base URL for the GitHub API
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Page size for the versions endpoint
const PER_PAGE: u32 = 100;

/// One entry from the package versions API. A version carries zero or more
/// image tags under `metadata.container.tags`; untagged versions are common.
#[derive(Debug, Deserialize)]
struct PackageVersion {
    #[serde(default)]
    metadata: Metadata,
}

#[derive(Debug, Default, Deserialize)]
struct Metadata {
    #[serde(default)]
    container: Container,
}

#[derive(Debug, Default, Deserialize)]
struct Container {
    #[serde(default)]
    tags: Vec<String>,
}

/// Client for listing the tags of a container package on GHCR
pub struct GhcrRegistry {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl GhcrRegistry {
    /// Creates a new GhcrRegistry with a custom base URL
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("ghcr-next-tag")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
            token: token.to_string(),
        }
    }

    /// Creates a client against api.github.com
    pub fn github(token: &str) -> Self {
        Self::new(DEFAULT_BASE_URL, token)
    }

    fn versions_url(&self, owner: &Owner, image: &str) -> String {
        let encoded = encode_image_name(image);
        match owner {
            Owner::Org(org) => format!(
                "{}/orgs/{}/packages/container/{}/versions",
                self.base_url, org, encoded
            ),
            // The user endpoint always targets the authenticated user.
            Owner::User(_) => format!(
                "{}/user/packages/container/{}/versions",
                self.base_url, encoded
            ),
        }
    }

    /// Fetches every tag of the package, walking all pages of the versions
    /// endpoint until an empty page. Duplicate tags are kept; the selectors
    /// tolerate them.
    pub async fn fetch_tags(
        &self,
        owner: &Owner,
        image: &str,
    ) -> Result<Vec<String>, RegistryError> {
        let url = self.versions_url(owner, image);

        let mut tags = Vec::new();
        let mut page = 1u32;
        loop {
            let response = self
                .client
                .get(&url)
                .query(&[("per_page", PER_PAGE.to_string()), ("page", page.to_string())])
                .header("Authorization", format!("Bearer {}", self.token))
                .header("Accept", "application/vnd.github+json")
                .send()
                .await?;

            let status = response.status();

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(RegistryError::NotFound(format!(
                    "{}/{}",
                    owner.name(),
                    image
                )));
            }

            if !status.is_success() {
                warn!("package versions API returned status {}: {}", status, url);
                let body = response.text().await.unwrap_or_default();
                return Err(RegistryError::Status { status, body });
            }

            let versions: Vec<PackageVersion> = response.json().await.map_err(|e| {
                warn!("Failed to parse package versions response: {}", e);
                RegistryError::InvalidResponse(e.to_string())
            })?;

            if versions.is_empty() {
                break;
            }

            for version in versions {
                tags.extend(version.metadata.container.tags);
            }
            page += 1;
        }

        debug!("collected {} tags over {} page(s)", tags.len(), page);
        Ok(tags)
    }
}

/// Encode the image name for use in a URL path (names may contain '/').
fn encode_image_name(image: &str) -> String {
    image.replace('/', "%2F")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn page_query(page: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("per_page".into(), "100".into()),
            Matcher::UrlEncoded("page".into(), page.into()),
        ])
    }

    #[tokio::test]
    async fn fetch_tags_collects_tags_across_pages() {
        let mut server = Server::new_async().await;

        let page1 = server
            .mock("GET", "/orgs/acme/packages/container/widget/versions")
            .match_query(page_query("1"))
            .match_header("authorization", "Bearer test-token")
            .match_header("accept", "application/vnd.github+json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!([
                    {"metadata": {"container": {"tags": ["1.0.0", "latest"]}}},
                    {"metadata": {"container": {"tags": ["1.1.0-rc.0"]}}}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let page2 = server
            .mock("GET", "/orgs/acme/packages/container/widget/versions")
            .match_query(page_query("2"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"metadata": {"container": {"tags": ["0.9.0"]}}}]"#)
            .create_async()
            .await;

        let page3 = server
            .mock("GET", "/orgs/acme/packages/container/widget/versions")
            .match_query(page_query("3"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let registry = GhcrRegistry::new(&server.url(), "test-token");
        let owner = Owner::Org("acme".to_string());
        let tags = registry.fetch_tags(&owner, "widget").await.unwrap();

        page1.assert_async().await;
        page2.assert_async().await;
        page3.assert_async().await;
        assert_eq!(tags, vec!["1.0.0", "latest", "1.1.0-rc.0", "0.9.0"]);
    }

    #[tokio::test]
    async fn fetch_tags_uses_the_authenticated_user_endpoint_for_user_owners() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/user/packages/container/widget/versions")
            .match_query(page_query("1"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let registry = GhcrRegistry::new(&server.url(), "test-token");
        let owner = Owner::User("someone".to_string());
        let tags = registry.fetch_tags(&owner, "widget").await.unwrap();

        mock.assert_async().await;
        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn fetch_tags_tolerates_versions_without_container_metadata() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/orgs/acme/packages/container/widget/versions")
            .match_query(page_query("1"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!([
                    {},
                    {"metadata": {}},
                    {"metadata": {"container": {}}},
                    {"metadata": {"container": {"tags": ["2.0.0"]}}}
                ])
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/orgs/acme/packages/container/widget/versions")
            .match_query(page_query("2"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let registry = GhcrRegistry::new(&server.url(), "test-token");
        let owner = Owner::Org("acme".to_string());
        let tags = registry.fetch_tags(&owner, "widget").await.unwrap();

        assert_eq!(tags, vec!["2.0.0"]);
    }

    #[tokio::test]
    async fn fetch_tags_returns_not_found_for_unpublished_packages() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/orgs/acme/packages/container/widget/versions")
            .match_query(page_query("1"))
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let registry = GhcrRegistry::new(&server.url(), "test-token");
        let owner = Owner::Org("acme".to_string());
        let result = registry.fetch_tags(&owner, "widget").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::NotFound(p)) if p == "acme/widget"));
    }

    #[tokio::test]
    async fn fetch_tags_rejects_undecodable_bodies() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/orgs/acme/packages/container/widget/versions")
            .match_query(page_query("1"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("here be dragons, not JSON")
            .create_async()
            .await;

        let registry = GhcrRegistry::new(&server.url(), "test-token");
        let owner = Owner::Org("acme".to_string());
        let result = registry.fetch_tags(&owner, "widget").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn fetch_tags_surfaces_other_error_statuses() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/orgs/acme/packages/container/widget/versions")
            .match_query(page_query("1"))
            .with_status(401)
            .with_body(r#"{"message": "Bad credentials"}"#)
            .create_async()
            .await;

        let registry = GhcrRegistry::new(&server.url(), "bad-token");
        let owner = Owner::Org("acme".to_string());
        let result = registry.fetch_tags(&owner, "widget").await;

        assert!(matches!(
            result,
            Err(RegistryError::Status { status, .. }) if status == reqwest::StatusCode::UNAUTHORIZED
        ));
    }

    #[test]
    fn image_names_with_slashes_are_path_encoded() {
        assert_eq!(encode_image_name("team/widget"), "team%2Fwidget");
        assert_eq!(encode_image_name("widget"), "widget");
    }
}

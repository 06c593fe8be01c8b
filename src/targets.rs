//! Edge-function target URLs and the links around them.

use url::Url;

use crate::types::{EdgeFunction, ProjectContext};

pub const DEFAULT_TLD: &str = "co";

/// Last label of the REST URL's hostname (`co` for `abc.supabase.co`).
///
/// Falls back to `co` when the URL is missing, empty or has no host.
pub fn rest_url_tld(rest_url: Option<&str>) -> String {
    rest_url
        .filter(|url| !url.is_empty())
        .and_then(|url| Url::parse(url).ok())
        .and_then(|url| {
            url.host_str()
                .and_then(|host| host.rsplit('.').next())
                .filter(|label| !label.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_TLD.to_string())
}

/// `https://{ref}.supabase.{tld}/functions/v1/{slug}`
pub fn edge_function_url(project: &ProjectContext, slug: &str) -> String {
    format!(
        "https://{}.supabase.{}/functions/v1/{}",
        project.project_ref,
        rest_url_tld(project.rest_url.as_deref()),
        slug
    )
}

/// Where the empty state sends users to create their first function
pub fn create_function_href(project_ref: &str) -> String {
    format!("/project/{}/functions", project_ref)
}

/// One entry of the edge-function picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionOption {
    pub id: String,
    pub label: String,
    pub url: String,
}

pub fn function_options(
    project: &ProjectContext,
    functions: &[EdgeFunction],
) -> Vec<FunctionOption> {
    functions
        .iter()
        .map(|f| FunctionOption {
            id: f.id.clone(),
            label: f.name.clone(),
            url: edge_function_url(project, &f.slug),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(rest_url: Option<&str>) -> ProjectContext {
        ProjectContext {
            project_ref: "abcxyz".to_string(),
            rest_url: rest_url.map(str::to_string),
        }
    }

    #[test]
    fn test_function_url_from_rest_url() {
        assert_eq!(
            edge_function_url(&project(Some("https://abcxyz.supabase.co")), "hello-world"),
            "https://abcxyz.supabase.co/functions/v1/hello-world"
        );
    }

    #[test]
    fn test_tld_follows_rest_host() {
        assert_eq!(rest_url_tld(Some("https://abcxyz.supabase.red/rest/v1/")), "red");
        assert_eq!(
            edge_function_url(&project(Some("https://abcxyz.supabase.red")), "fn"),
            "https://abcxyz.supabase.red/functions/v1/fn"
        );
    }

    #[test]
    fn test_tld_defaults_to_co() {
        assert_eq!(rest_url_tld(None), "co");
        assert_eq!(rest_url_tld(Some("")), "co");
        assert_eq!(
            edge_function_url(&project(None), "hello-world"),
            "https://abcxyz.supabase.co/functions/v1/hello-world"
        );
    }

    #[test]
    fn test_tld_unparseable_rest_url() {
        assert_eq!(rest_url_tld(Some("not a url")), "co");
    }

    #[test]
    fn test_single_label_host() {
        assert_eq!(rest_url_tld(Some("http://localhost:54321")), "localhost");
    }

    #[test]
    fn test_create_function_href() {
        assert_eq!(create_function_href("abcxyz"), "/project/abcxyz/functions");
    }

    #[test]
    fn test_function_options_keep_order() {
        let functions = vec![
            EdgeFunction {
                id: "1".to_string(),
                slug: "hello-world".to_string(),
                name: "Hello World".to_string(),
            },
            EdgeFunction {
                id: "2".to_string(),
                slug: "notify".to_string(),
                name: "notify".to_string(),
            },
        ];
        let options = function_options(&project(None), &functions);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].label, "Hello World");
        assert_eq!(options[1].url, "https://abcxyz.supabase.co/functions/v1/notify");
    }
}

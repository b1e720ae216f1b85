use anyhow::Result;
use raven_protocol::{DocResponse, FrappeError, MethodResponse};
use serde::{de::DeserializeOwned, Serialize};

fn with_auth(request: reqwest::RequestBuilder, authorization: Option<&str>) -> reqwest::RequestBuilder {
    match authorization {
        Some(value) => request.header("Authorization", value),
        None => request,
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(FrappeError::from_body(status.as_u16(), &text).into());
    }

    Ok(response)
}

/// URL of a whitelisted method
pub fn method_url(server_url: &str, method: &str) -> String {
    format!("{}/api/method/{}", server_url, method)
}

/// URL of a doctype collection, or of one document when `name` is given
pub fn resource_url(server_url: &str, doctype: &str, name: Option<&str>) -> String {
    let base = format!("{}/api/resource/{}", server_url, urlencoding::encode(doctype));
    match name {
        Some(name) => format!("{}/{}", base, urlencoding::encode(name)),
        None => base,
    }
}

/// GET a whitelisted method and unwrap its `message`
pub async fn get_method<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
    authorization: Option<&str>,
) -> Result<T> {
    let request = with_auth(client.get(url).query(query), authorization);
    let response = check(request.send().await?).await?;
    let body: MethodResponse<T> = response.json().await?;
    Ok(body.message)
}

/// POST to a whitelisted method, ignoring its result
pub async fn post_method<B: Serialize>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
    authorization: Option<&str>,
) -> Result<()> {
    let request = with_auth(client.post(url).json(body), authorization);
    check(request.send().await?).await?;
    Ok(())
}

/// GET one document
pub async fn get_doc<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    authorization: Option<&str>,
) -> Result<T> {
    let request = with_auth(client.get(url), authorization);
    let response = check(request.send().await?).await?;
    let body: DocResponse<T> = response.json().await?;
    Ok(body.data)
}

/// POST a new document
pub async fn create_doc<B: Serialize>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
    authorization: Option<&str>,
) -> Result<()> {
    let request = with_auth(client.post(url).json(body), authorization);
    check(request.send().await?).await?;
    Ok(())
}

/// PUT changed fields of a document
pub async fn update_doc<B: Serialize>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
    authorization: Option<&str>,
) -> Result<()> {
    let request = with_auth(client.put(url).json(body), authorization);
    check(request.send().await?).await?;
    Ok(())
}

/// GET a file as raw bytes
pub async fn get_bytes(client: &reqwest::Client, url: &str, authorization: Option<&str>) -> Result<Vec<u8>> {
    let request = with_auth(client.get(url), authorization);
    let response = check(request.send().await?).await?;
    Ok(response.bytes().await?.to_vec())
}

pub async fn delete_doc(client: &reqwest::Client, url: &str, authorization: Option<&str>) -> Result<()> {
    let request = with_auth(client.delete(url), authorization);
    check(request.send().await?).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_url_encodes_doctype_and_name() {
        assert_eq!(
            resource_url("http://localhost:8000", "Raven Message", Some("MSG 1")),
            "http://localhost:8000/api/resource/Raven%20Message/MSG%201"
        );
        assert_eq!(
            resource_url("http://localhost:8000", "Raven Message Reaction", None),
            "http://localhost:8000/api/resource/Raven%20Message%20Reaction"
        );
    }

    #[test]
    fn test_method_url() {
        assert_eq!(
            method_url("https://chat.example.com", "frappe.desk.like.toggle_like"),
            "https://chat.example.com/api/method/frappe.desk.like.toggle_like"
        );
    }
}

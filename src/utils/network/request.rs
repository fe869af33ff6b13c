use crate::create_epgsieve_error_result;
use crate::epgsieve_error::{EpgsieveError, EpgsieveErrorKind};
use crate::model::Config;
use crate::utils::compression::compression_utils::{is_deflate, is_gzip};
use crate::utils::{decompress_deflate, decompress_gzip, CompressedFileReader, CONSTANTS, ENCODING_DEFLATE, ENCODING_GZIP};
use log::warn;
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::redirect::Policy;
use std::borrow::Cow;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT_SECS: u64 = 60;
const MAX_REDIRECTS: usize = 10;

pub fn sanitize_sensitive_info(query: &str) -> Cow<'_, str> {
    if !query.contains("://") && !CONSTANTS.re_credentials.is_match(query) {
        return Cow::Borrowed(query);
    }

    let mut result = query.to_owned();

    for (re, replacement) in &[
        (&CONSTANTS.re_credentials, "$1***"),
        (&CONSTANTS.re_url, "$1***/$2"),
    ] {
        result = re.replace_all(&result, *replacement).into_owned();
    }
    Cow::Owned(result)
}

pub fn create_client(cfg: &Config) -> ClientBuilder {
    Client::builder()
        .user_agent(cfg.user_agent.as_str())
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .redirect(Policy::limited(MAX_REDIRECTS))
}

fn get_local_file_content(file_path: &Path) -> Result<Vec<u8>, EpgsieveError> {
    match CompressedFileReader::new(file_path) {
        Ok(mut reader) => {
            let mut content = Vec::new();
            match reader.read_to_end(&mut content) {
                Ok(_) => Ok(content),
                Err(err) => create_epgsieve_error_result!(EpgsieveErrorKind::Transport,
                    "Failed to read file {}: {err}", file_path.display()),
            }
        }
        Err(err) => create_epgsieve_error_result!(EpgsieveErrorKind::Transport,
            "Failed to open file {}: {err}", file_path.display()),
    }
}

fn get_remote_content(client: &Client, url: &Url) -> Result<Vec<u8>, EpgsieveError> {
    match client.get(url.clone()).send() {
        Ok(response) => {
            if !response.status().is_success() {
                return create_epgsieve_error_result!(EpgsieveErrorKind::Transport,
                    "Request failed with status {} {}", response.status(), sanitize_sensitive_info(url.as_str()));
            }

            // encoding detection, weakest to strongest: url suffix, headers, payload magic bytes
            let mut encoding = url.path().ends_with(".gz").then(|| ENCODING_GZIP.to_string());
            let headers = response.headers();
            if let Some(header_value) = headers.get(CONTENT_ENCODING).or_else(|| headers.get(CONTENT_TYPE)) {
                if let Ok(value) = header_value.to_str() {
                    let value = value.to_lowercase();
                    if value.contains(ENCODING_GZIP) {
                        encoding = Some(ENCODING_GZIP.to_string());
                    } else if value.contains(ENCODING_DEFLATE) {
                        encoding = Some(ENCODING_DEFLATE.to_string());
                    }
                }
            }

            match response.bytes() {
                Ok(bytes) => {
                    let content = bytes.to_vec();
                    if content.len() >= 2 {
                        if is_gzip(&content[0..2]) {
                            encoding = Some(ENCODING_GZIP.to_string());
                        } else if is_deflate(&content[0..2]) {
                            encoding = Some(ENCODING_DEFLATE.to_string());
                        }
                    }
                    Ok(decode_content(content, encoding.as_deref(), url))
                }
                Err(err) => create_epgsieve_error_result!(EpgsieveErrorKind::Transport,
                    "Failed to read response from {}: {err}", sanitize_sensitive_info(url.as_str())),
            }
        }
        Err(err) => create_epgsieve_error_result!(EpgsieveErrorKind::Transport,
            "Request failed {}: {err}", sanitize_sensitive_info(url.as_str())),
    }
}

// decode failures keep the raw payload, a broken document surfaces as a parse error later
fn decode_content(content: Vec<u8>, encoding: Option<&str>, url: &Url) -> Vec<u8> {
    if encoding.is_some_and(|e| e.eq_ignore_ascii_case(ENCODING_GZIP)) {
        match decompress_gzip(&content) {
            Ok(decoded) => return decoded,
            Err(err) => warn!("Failed to decode gzip content from {}, using raw bytes: {err}",
                sanitize_sensitive_info(url.as_str())),
        }
    } else if encoding.is_some_and(|e| e.eq_ignore_ascii_case(ENCODING_DEFLATE)) {
        match decompress_deflate(&content) {
            Ok(decoded) => return decoded,
            Err(err) => warn!("Failed to decode deflate content from {}, using raw bytes: {err}",
                sanitize_sensitive_info(url.as_str())),
        }
    }
    content
}

/// Fetches the content behind `url_str`, which may be a http(s) url,
/// a `file://` url or a plain filesystem path. Compressed payloads are
/// decoded transparently.
pub fn download_content(client: &Client, url_str: &str) -> Result<Vec<u8>, EpgsieveError> {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() == "file" {
                url.to_file_path().map_or_else(
                    |()| create_epgsieve_error_result!(EpgsieveErrorKind::Config, "Unusable file url: {url_str}"),
                    |path| get_local_file_content(&path))
            } else {
                get_remote_content(client, &url)
            }
        }
        Err(_) => get_local_file_content(Path::new(url_str)),
    }
}

pub fn download_text_content(client: &Client, url_str: &str) -> Result<String, EpgsieveError> {
    download_content(client, url_str)
        .map(|content| String::from_utf8_lossy(&content).into_owned())
}

use regex::Regex;
use std::sync::LazyLock;

pub const ENCODING_GZIP: &str = "gzip";
pub const ENCODING_DEFLATE: &str = "deflate";

pub struct Constants {
    pub re_credentials: Regex,
    pub re_url: Regex,
    pub re_env_var: Regex,
    pub re_parentheses: Regex,
    pub re_non_alnum: Regex,
}

pub static CONSTANTS: LazyLock<Constants> = LazyLock::new(||
    Constants {
        re_credentials: Regex::new(r"((username|password|token)=)[^&]*").unwrap(),
        re_url: Regex::new(r"(.*://).*?/(.*)").unwrap(),
        re_env_var: Regex::new(r"\$\{env:(?P<var>[a-zA-Z_][a-zA-Z0-9_]*)}").unwrap(),
        re_parentheses: Regex::new(r"\([^)]*\)").unwrap(),
        re_non_alnum: Regex::new(r"[^a-z0-9]+").unwrap(),
    }
);

use crate::create_epgsieve_error_result;
use crate::epgsieve_error::{EpgsieveError, EpgsieveErrorKind};
use crate::model::ConfigDto;
use crate::utils::CONSTANTS;
use log::error;
use std::env;

pub fn resolve_env_var(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    CONSTANTS.re_env_var.replace_all(value, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_else(|e| {
            error!("Could not resolve env var '{var_name}': {e}");
            format!("${{env:{var_name}}}")
        })
    }).to_string()
}

pub fn read_config_file(config_file: &str) -> Result<ConfigDto, EpgsieveError> {
    match std::fs::read_to_string(config_file) {
        Ok(content) => {
            match serde_yaml::from_str::<ConfigDto>(&resolve_env_var(&content)) {
                Ok(config) => Ok(config),
                Err(err) => create_epgsieve_error_result!(EpgsieveErrorKind::Config,
                    "cant read config file {config_file}: {err}"),
            }
        }
        Err(err) => create_epgsieve_error_result!(EpgsieveErrorKind::Config,
            "cant open config file {config_file}: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve() {
        let resolved = resolve_env_var("${env:HOME}");
        assert_eq!(resolved, std::env::var("HOME").unwrap());
    }

    #[test]
    fn test_resolve_unknown_var_kept() {
        let resolved = resolve_env_var("${env:EPGSIEVE_DOES_NOT_EXIST}");
        assert_eq!(resolved, "${env:EPGSIEVE_DOES_NOT_EXIST}");
    }

    #[test]
    fn test_read_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "m3u_url: http://example.com/playlist.m3u").unwrap();
        writeln!(file, "region: UK").unwrap();
        let dto = read_config_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(dto.m3u_url.as_deref(), Some("http://example.com/playlist.m3u"));
        assert_eq!(dto.region.as_deref(), Some("UK"));
        assert!(dto.output.is_none());
    }

    #[test]
    fn test_read_config_file_env_placeholder() {
        std::env::set_var("EPGSIEVE_TEST_REGION", "MX");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "region: ${{env:EPGSIEVE_TEST_REGION}}").unwrap();
        let dto = read_config_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(dto.region.as_deref(), Some("MX"));
        std::env::remove_var("EPGSIEVE_TEST_REGION");
    }

    #[test]
    fn test_read_config_file_unknown_key_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "m3u_uri: http://example.com/playlist.m3u").unwrap();
        let result = read_config_file(file.path().to_str().unwrap());
        assert!(result.is_err_and(|err| err.kind == EpgsieveErrorKind::Config));
    }
}

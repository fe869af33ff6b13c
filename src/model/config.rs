use crate::create_epgsieve_error_result;
use crate::epgsieve_error::{EpgsieveError, EpgsieveErrorKind};
use log::warn;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const DEFAULT_USER_AGENT: &str = "VLC/3.0.16 LibVLC/3.0.16";
pub const DEFAULT_OUTPUT_PATH: &str = "epg/guide.xml";

pub const ENV_M3U_URL: &str = "M3U_URL";
pub const ENV_EPG_REGION: &str = "EPG_REGION";

/// Guide datasets published per region, `All` is the unrestricted export.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EpgRegion {
    All,
    #[default]
    Us,
    Ca,
    Uk,
    Au,
    Mx,
}

impl EpgRegion {
    pub const fn url(self) -> &'static str {
        match self {
            Self::All => "https://epg.pw/xmltv/epg.xml",
            Self::Us => "https://epg.pw/xmltv/epg_US.xml",
            Self::Ca => "https://epg.pw/xmltv/epg_CA.xml",
            Self::Uk => "https://epg.pw/xmltv/epg_UK.xml",
            Self::Au => "https://epg.pw/xmltv/epg_AU.xml",
            Self::Mx => "https://epg.pw/xmltv/epg_MX.xml",
        }
    }
}

impl FromStr for EpgRegion {
    type Err = EpgsieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "US" => Ok(Self::Us),
            "CA" => Ok(Self::Ca),
            "UK" => Ok(Self::Uk),
            "AU" => Ok(Self::Au),
            "MX" => Ok(Self::Mx),
            _ => create_epgsieve_error_result!(EpgsieveErrorKind::Config, "Unknown region: {}", s),
        }
    }
}

impl Display for EpgRegion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            Self::All => "ALL",
            Self::Us => "US",
            Self::Ca => "CA",
            Self::Uk => "UK",
            Self::Au => "AU",
            Self::Mx => "MX",
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDto {
    #[serde(default)]
    pub m3u_url: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// Relaxed view on the config file used before the logger is fully set up.
#[derive(Debug, Default, Deserialize)]
pub struct LogLevelConfig {
    #[serde(default)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub m3u_url: String,
    pub region: EpgRegion,
    /// Guide dataset for the configured region, resolved once at startup.
    pub guide_url: String,
    /// Unrestricted dataset consulted when the regional guide matches nothing.
    pub guide_fallback_url: String,
    pub output_path: String,
    pub user_agent: String,
}

impl Config {
    /// Merges the configuration sources, priority CLI argument, env var, config file, default.
    pub fn resolve(
        cli_m3u: Option<String>,
        cli_region: Option<String>,
        cli_output: Option<String>,
        file_config: Option<ConfigDto>,
    ) -> Result<Self, EpgsieveError> {
        let dto = file_config.unwrap_or_default();

        let m3u_url = cli_m3u
            .or_else(|| std::env::var(ENV_M3U_URL).ok())
            .or(dto.m3u_url)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        let Some(m3u_url) = m3u_url else {
            return create_epgsieve_error_result!(EpgsieveErrorKind::Config,
                "Playlist url not set, use --m3u or the {ENV_M3U_URL} env var");
        };

        let region = match cli_region
            .or_else(|| std::env::var(ENV_EPG_REGION).ok())
            .or(dto.region)
        {
            None => EpgRegion::default(),
            Some(value) => value.parse::<EpgRegion>().unwrap_or_else(|err| {
                warn!("{}, using {}", err.message, EpgRegion::default());
                EpgRegion::default()
            }),
        };

        let output_path = cli_output
            .or(dto.output)
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string());

        let user_agent = dto.user_agent
            .filter(|agent| !agent.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            m3u_url,
            region,
            guide_url: region.url().to_string(),
            guide_fallback_url: EpgRegion::All.url().to_string(),
            output_path,
            user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_from_str() {
        assert_eq!("us".parse::<EpgRegion>().ok(), Some(EpgRegion::Us));
        assert_eq!(" all ".parse::<EpgRegion>().ok(), Some(EpgRegion::All));
        assert_eq!("Mx".parse::<EpgRegion>().ok(), Some(EpgRegion::Mx));
        assert!("atlantis".parse::<EpgRegion>().is_err());
    }

    #[test]
    fn test_region_urls() {
        assert_eq!(EpgRegion::All.url(), "https://epg.pw/xmltv/epg.xml");
        assert_eq!(EpgRegion::Uk.url(), "https://epg.pw/xmltv/epg_UK.xml");
    }

    #[test]
    fn test_resolve_requires_m3u_url() {
        std::env::remove_var(ENV_M3U_URL);
        let result = Config::resolve(None, Some("US".to_string()), None, None);
        assert!(result.is_err_and(|err| err.kind == EpgsieveErrorKind::Config));
    }

    #[test]
    fn test_resolve_env_region() {
        std::env::set_var(ENV_EPG_REGION, "CA");
        let cfg = Config::resolve(
            Some("http://cli.example/playlist.m3u".to_string()),
            None,
            None,
            None,
        ).unwrap();
        assert_eq!(cfg.region, EpgRegion::Ca);
        std::env::remove_var(ENV_EPG_REGION);
    }

    #[test]
    fn test_resolve_cli_beats_file() {
        let dto = ConfigDto {
            m3u_url: Some("http://file.example/playlist.m3u".to_string()),
            region: Some("CA".to_string()),
            output: Some("out/from_file.xml".to_string()),
            ..ConfigDto::default()
        };
        let cfg = Config::resolve(
            Some("http://cli.example/playlist.m3u".to_string()),
            Some("UK".to_string()),
            None,
            Some(dto),
        ).unwrap();
        assert_eq!(cfg.m3u_url, "http://cli.example/playlist.m3u");
        assert_eq!(cfg.region, EpgRegion::Uk);
        assert_eq!(cfg.guide_url, EpgRegion::Uk.url());
        assert_eq!(cfg.guide_fallback_url, EpgRegion::All.url());
        assert_eq!(cfg.output_path, "out/from_file.xml");
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_resolve_unknown_region_falls_back() {
        let cfg = Config::resolve(
            Some("http://cli.example/playlist.m3u".to_string()),
            Some("atlantis".to_string()),
            None,
            None,
        ).unwrap();
        assert_eq!(cfg.region, EpgRegion::Us);
        assert_eq!(cfg.guide_url, EpgRegion::Us.url());
        assert_eq!(cfg.output_path, DEFAULT_OUTPUT_PATH);
    }
}
